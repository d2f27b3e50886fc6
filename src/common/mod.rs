pub mod comment;
pub mod env;
pub mod ids;
pub mod rating;

pub use comment::*;
pub use env::{EnvProvider, SystemEnvProvider};
pub use ids::*;
pub use rating::*;

#[cfg(test)]
pub use env::MockEnvProvider;
