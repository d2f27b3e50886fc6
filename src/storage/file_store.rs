use async_trait::async_trait;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::document::{Acknowledgement, Collection, Document, Fields};
use super::document_store::DocumentStore;
use super::errors::{StoreError, StoreResult};
use crate::common::DocumentId;

/// Append-only document store kept in a local directory
///
/// ## Storage Layout
///
/// - **Collections**: one JSON Lines file per collection, `{root}/{collection}.jsonl`
/// - **Documents**: one line each, `{"id": ..., "timestamp": ..., "fields": {...}}`
/// - **Identity**: a UUID v4 assigned when the line is written
/// - **Timestamps**: UTC wall-clock time of the store at write time
///
/// Lines are never rewritten or removed. A missing collection file reads as
/// an empty collection. A line that is JSON but not a document is skipped;
/// a line that is not JSON at all fails the whole read.
///
/// ## Example Usage
///
/// ```rust,no_run
/// use portfolio_feedback::storage::{Collection, DocumentStore, FileDocumentStore};
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let store = FileDocumentStore::init(".portfolio-feedback").await?;
///
/// let mut fields = serde_json::Map::new();
/// fields.insert("rating".to_string(), 5.into());
/// let ack = store.append(Collection::Ratings, fields).await?;
/// println!("stored {} at {}", ack.id, ack.timestamp);
///
/// let ratings = store.fetch_all(Collection::Ratings).await?;
/// println!("{} ratings", ratings.len());
/// # Ok(())
/// # }
/// ```
pub struct FileDocumentStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileDocumentStore {
    /// Open an existing store directory
    pub async fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let root = path.as_ref().to_path_buf();
        let metadata = fs::metadata(&root).await.map_err(|e| {
            StoreError::store_init(format!("cannot open {}: {}", root.display(), e))
        })?;

        if !metadata.is_dir() {
            return Err(StoreError::store_init(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        Ok(Self::at(root))
    }

    /// Create the store directory if needed and open it
    pub async fn init<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let root = path.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Self::open(root).await
    }

    fn at(root: PathBuf) -> Self {
        Self {
            root,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, collection: Collection) -> PathBuf {
        self.root.join(format!("{}.jsonl", collection.name()))
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn fetch_all(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        let path = self.collection_path(collection);
        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::unavailable(collection.name(), e.to_string())),
        };

        let mut documents = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let value: serde_json::Value = serde_json::from_str(line).map_err(|e| {
                StoreError::corrupt_document(collection.name(), index + 1, e.to_string())
            })?;
            match serde_json::from_value::<Document>(value) {
                Ok(document) => documents.push(document),
                Err(e) => log::warn!(
                    "Skipping malformed document at {} line {}: {}",
                    collection,
                    index + 1,
                    e
                ),
            }
        }

        log::debug!("Read {} documents from {}", documents.len(), collection);
        Ok(documents)
    }

    async fn append(&self, collection: Collection, fields: Fields) -> StoreResult<Acknowledgement> {
        let document = Document::new(DocumentId::generate(), Some(Utc::now()), fields);
        let mut line = serde_json::to_string(&document)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.collection_path(collection))
            .await
            .map_err(|e| StoreError::unavailable(collection.name(), e.to_string()))?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        log::debug!("Appended {} to {}", document.id, collection);
        Ok(Acknowledgement {
            id: document.id,
            timestamp: document.timestamp.unwrap_or_else(Utc::now),
        })
    }
}
