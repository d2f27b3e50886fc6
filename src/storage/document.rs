use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::common::DocumentId;

/// Schemaless document body, as written by clients
pub type Fields = serde_json::Map<String, Value>;

/// The two append-only collections behind the feedback section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Comments,
    Ratings,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Comments => "comments",
            Collection::Ratings => "ratings",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A stored document: store-assigned identity and timestamp plus client fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fields: Fields,
}

impl Document {
    pub fn new(id: DocumentId, timestamp: Option<DateTime<Utc>>, fields: Fields) -> Self {
        Self {
            id,
            timestamp,
            fields,
        }
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Non-negative integral number, accepting `4.0` as well as `4`
    pub fn uint_field(&self, key: &str) -> Option<u64> {
        let value = self.fields.get(key)?;
        value.as_u64().or_else(|| {
            value
                .as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        })
    }
}

/// What the store reports back after a successful append
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgement {
    pub id: DocumentId,
    pub timestamp: DateTime<Utc>,
}
