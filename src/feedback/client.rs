use serde_json::Value;
use thiserror::Error;

use crate::common::{Comment, Rating, Score};
use crate::storage::{Acknowledgement, Collection, Document, DocumentStore, Fields, StoreError};

#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("Store unavailable for {collection}: {source}")]
    StoreUnavailable {
        collection: Collection,
        #[source]
        source: StoreError,
    },
}

impl FeedbackError {
    pub fn store_unavailable(collection: Collection, source: StoreError) -> Self {
        FeedbackError::StoreUnavailable { collection, source }
    }
}

pub type FeedbackResult<T> = Result<T, FeedbackError>;

/// Typed access to the `comments` and `ratings` collections
///
/// Documents are validated on the way in: anything that does not look like a
/// comment or a rating is skipped with a warning instead of reaching the
/// view-model. Every call is one store round-trip with no retry.
pub struct FeedbackClient<S> {
    store: S,
}

impl<S: DocumentStore> FeedbackClient<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All well-formed comments, in store order
    pub async fn fetch_comments(&self) -> FeedbackResult<Vec<Comment>> {
        let documents = self.fetch_all(Collection::Comments).await?;
        Ok(documents.into_iter().filter_map(comment_from_document).collect())
    }

    /// All well-formed ratings, in store order
    pub async fn fetch_ratings(&self) -> FeedbackResult<Vec<Rating>> {
        let documents = self.fetch_all(Collection::Ratings).await?;
        Ok(documents.into_iter().filter_map(rating_from_document).collect())
    }

    pub async fn append_comment(&self, comment: &Comment) -> FeedbackResult<Acknowledgement> {
        let mut fields = Fields::new();
        fields.insert("name".to_string(), Value::from(comment.name.as_str()));
        fields.insert("comment".to_string(), Value::from(comment.comment.as_str()));
        self.append(Collection::Comments, fields).await
    }

    pub async fn append_rating(&self, score: Score) -> FeedbackResult<Acknowledgement> {
        let mut fields = Fields::new();
        fields.insert("rating".to_string(), Value::from(score.get()));
        self.append(Collection::Ratings, fields).await
    }

    async fn fetch_all(&self, collection: Collection) -> FeedbackResult<Vec<Document>> {
        self.store
            .fetch_all(collection)
            .await
            .map_err(|e| FeedbackError::store_unavailable(collection, e))
    }

    async fn append(&self, collection: Collection, fields: Fields) -> FeedbackResult<Acknowledgement> {
        self.store
            .append(collection, fields)
            .await
            .map_err(|e| FeedbackError::store_unavailable(collection, e))
    }
}

fn comment_from_document(document: Document) -> Option<Comment> {
    let name = document.str_field("name").filter(|s| !s.trim().is_empty());
    let text = document.str_field("comment").filter(|s| !s.trim().is_empty());

    match (name, text) {
        (Some(name), Some(text)) => Some(Comment::new(
            document.id.clone(),
            name.to_string(),
            text.to_string(),
            document.timestamp,
        )),
        _ => {
            log::warn!("Skipping malformed comment document {}", document.id);
            None
        }
    }
}

fn rating_from_document(document: Document) -> Option<Rating> {
    match document
        .uint_field("rating")
        .and_then(|value| Score::try_from(value).ok())
    {
        Some(score) => Some(Rating::new(document.id, score, document.timestamp)),
        None => {
            log::warn!("Skipping malformed rating document {}", document.id);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_helpers::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_comments_skips_malformed_documents() {
        let store = MockDocumentStore::new().with_documents(
            Collection::Comments,
            vec![
                comment_document("c1", "Alice", "Nice work", Some(10)),
                comment_document("c2", "   ", "No name", Some(20)),
                comment_document("c3", "Bob", "", Some(30)),
                Document::new(
                    crate::common::DocumentId::new("c4"),
                    None,
                    test_fields(json!({"name": 42, "comment": "wrong type"})),
                ),
            ],
        );
        let client = FeedbackClient::new(store);

        let comments = client.fetch_comments().await.expect("Should fetch comments");

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].name, "Alice");
        assert_eq!(comments[0].id.as_ref().map(|id| id.as_str()), Some("c1"));
        assert_eq!(comments[0].timestamp, Some(test_timestamp(10)));
    }

    #[tokio::test]
    async fn test_fetch_ratings_skips_out_of_range_scores() {
        let store = MockDocumentStore::new().with_documents(
            Collection::Ratings,
            vec![
                rating_document("r1", json!(5), Some(1)),
                rating_document("r2", json!(0), Some(2)),
                rating_document("r3", json!(6), Some(3)),
                rating_document("r4", json!("4"), Some(4)),
                rating_document("r5", json!(3.0), None),
            ],
        );
        let client = FeedbackClient::new(store);

        let ratings = client.fetch_ratings().await.expect("Should fetch ratings");
        let values: Vec<u8> = ratings.iter().map(|r| r.score.get()).collect();

        assert_eq!(values, vec![5, 3]);
        assert_eq!(ratings[1].timestamp, None);
    }

    #[tokio::test]
    async fn test_append_comment_writes_wire_fields() {
        let client = FeedbackClient::new(MockDocumentStore::new());
        let comment = Comment::optimistic(&crate::common::CommentDraft::new("Alice", "Nice work"));

        let ack = client.append_comment(&comment).await.expect("Should append");

        let stored = client.store().stored(Collection::Comments);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, ack.id);
        assert_eq!(stored[0].str_field("name"), Some("Alice"));
        assert_eq!(stored[0].str_field("comment"), Some("Nice work"));
        // The store, not the client, owns the timestamp
        assert!(!stored[0].fields.contains_key("timestamp"));
    }

    #[tokio::test]
    async fn test_append_rating_writes_integer() {
        let client = FeedbackClient::new(MockDocumentStore::new());

        client
            .append_rating(Score::new(4).unwrap())
            .await
            .expect("Should append");

        let stored = client.store().stored(Collection::Ratings);
        assert_eq!(stored[0].fields.get("rating"), Some(&json!(4)));
    }

    #[tokio::test]
    async fn test_store_failures_become_store_unavailable() {
        let store = MockDocumentStore::new();
        store.fail_fetches(Collection::Ratings);
        store.fail_appends(Collection::Comments);
        let client = FeedbackClient::new(store);

        let fetch = client.fetch_ratings().await;
        assert!(matches!(
            fetch,
            Err(FeedbackError::StoreUnavailable {
                collection: Collection::Ratings,
                ..
            })
        ));

        let comment = Comment::optimistic(&crate::common::CommentDraft::new("A", "B"));
        let append = client.append_comment(&comment).await;
        assert!(matches!(
            append,
            Err(FeedbackError::StoreUnavailable {
                collection: Collection::Comments,
                ..
            })
        ));
        assert_eq!(client.store().append_attempts(Collection::Comments), 1);
    }
}
