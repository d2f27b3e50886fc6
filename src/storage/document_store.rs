use async_trait::async_trait;

use super::document::{Acknowledgement, Collection, Document, Fields};
use super::errors::StoreResult;

/// Minimal interface to an append-only document store
///
/// Each call is a single round-trip. Implementations assign the document
/// identity and creation timestamp themselves; callers learn them only from
/// the returned [`Acknowledgement`]. `fetch_all` makes no promise about
/// ordering.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read every document in a collection
    async fn fetch_all(&self, collection: Collection) -> StoreResult<Vec<Document>>;

    /// Append one document to a collection
    async fn append(&self, collection: Collection, fields: Fields) -> StoreResult<Acknowledgement>;
}
