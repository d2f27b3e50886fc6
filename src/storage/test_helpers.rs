use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use super::document::{Acknowledgement, Collection, Document, Fields};
use super::document_store::DocumentStore;
use super::errors::{StoreError, StoreResult};
use crate::common::DocumentId;

/// Fixed point in time so test timestamps are deterministic
pub fn test_timestamp(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
}

pub fn test_fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("Expected a JSON object, got {}", other),
    }
}

pub fn comment_document(id: &str, name: &str, comment: &str, seconds: Option<i64>) -> Document {
    Document::new(
        DocumentId::new(id),
        seconds.map(test_timestamp),
        test_fields(json!({ "name": name, "comment": comment })),
    )
}

pub fn rating_document(id: &str, rating: Value, seconds: Option<i64>) -> Document {
    Document::new(
        DocumentId::new(id),
        seconds.map(test_timestamp),
        test_fields(json!({ "rating": rating })),
    )
}

/// In-memory [`DocumentStore`] with failure injection
///
/// Acknowledgements carry ids `mock-1`, `mock-2`, ... and timestamps one
/// second apart starting an hour after [`test_timestamp`]`(0)`.
#[derive(Default)]
pub struct MockDocumentStore {
    documents: Mutex<HashMap<Collection, Vec<Document>>>,
    failing_fetches: Mutex<HashSet<Collection>>,
    failing_appends: Mutex<HashSet<Collection>>,
    append_attempts: Mutex<HashMap<Collection, usize>>,
    next_id: Mutex<u64>,
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(self, collection: Collection, documents: Vec<Document>) -> Self {
        self.documents
            .lock()
            .unwrap()
            .entry(collection)
            .or_default()
            .extend(documents);
        self
    }

    pub fn fail_fetches(&self, collection: Collection) {
        self.failing_fetches.lock().unwrap().insert(collection);
    }

    pub fn fail_appends(&self, collection: Collection) {
        self.failing_appends.lock().unwrap().insert(collection);
    }

    pub fn recover(&self) {
        self.failing_fetches.lock().unwrap().clear();
        self.failing_appends.lock().unwrap().clear();
    }

    pub fn append_attempts(&self, collection: Collection) -> usize {
        self.append_attempts
            .lock()
            .unwrap()
            .get(&collection)
            .copied()
            .unwrap_or(0)
    }

    pub fn stored(&self, collection: Collection) -> Vec<Document> {
        self.documents
            .lock()
            .unwrap()
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn fetch_all(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        if self.failing_fetches.lock().unwrap().contains(&collection) {
            return Err(StoreError::unavailable(collection.name(), "simulated outage"));
        }
        Ok(self.stored(collection))
    }

    async fn append(&self, collection: Collection, fields: Fields) -> StoreResult<Acknowledgement> {
        *self
            .append_attempts
            .lock()
            .unwrap()
            .entry(collection)
            .or_default() += 1;

        if self.failing_appends.lock().unwrap().contains(&collection) {
            return Err(StoreError::unavailable(collection.name(), "simulated outage"));
        }

        let sequence = {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            *next_id
        };
        let ack = Acknowledgement {
            id: DocumentId::new(format!("mock-{}", sequence)),
            timestamp: test_timestamp(3600) + Duration::seconds(sequence as i64),
        };

        self.documents
            .lock()
            .unwrap()
            .entry(collection)
            .or_default()
            .push(Document::new(ack.id.clone(), Some(ack.timestamp), fields));
        Ok(ack)
    }
}
