pub mod document;
pub mod document_store;
pub mod errors;
pub mod file_store;
pub mod preferences;

#[cfg(test)]
pub mod test_helpers;

pub use document::{Acknowledgement, Collection, Document, Fields};
pub use document_store::DocumentStore;
pub use errors::{StoreError, StoreResult};
pub use file_store::FileDocumentStore;
pub use preferences::{Preferences, PreferenceStore};
