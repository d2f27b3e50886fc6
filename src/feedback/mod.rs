pub mod client;
pub mod view_model;

pub use client::{FeedbackClient, FeedbackError, FeedbackResult};
pub use view_model::{
    Diagnostic, FeedbackViewModel, PendingComment, PendingRating, SyncState, Tracked,
    WriteFailurePolicy,
};
