use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Collection unavailable: {collection} - {message}")]
    Unavailable { collection: String, message: String },

    #[error("Corrupt document in {collection} at line {line}: {message}")]
    CorruptDocument {
        collection: String,
        line: usize,
        message: String,
    },

    #[error("Store initialization error: {message}")]
    StoreInit { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Helper functions for creating common errors
impl StoreError {
    pub fn unavailable(collection: impl AsRef<str>, message: impl AsRef<str>) -> Self {
        StoreError::Unavailable {
            collection: collection.as_ref().to_string(),
            message: message.as_ref().to_string(),
        }
    }

    pub fn corrupt_document(
        collection: impl AsRef<str>,
        line: usize,
        message: impl AsRef<str>,
    ) -> Self {
        StoreError::CorruptDocument {
            collection: collection.as_ref().to_string(),
            line,
            message: message.as_ref().to_string(),
        }
    }

    pub fn store_init(message: impl AsRef<str>) -> Self {
        StoreError::StoreInit {
            message: message.as_ref().to_string(),
        }
    }
}

// Result type alias for convenience
pub type StoreResult<T> = Result<T, StoreError>;
