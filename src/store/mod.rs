//! Document store seam.
//!
//! Application, job posting and account records live in an external
//! document database keyed by collection name and opaque document id. The
//! rest of the crate only talks to it through [`DocumentStore`], so the
//! backing database can be swapped (Postgres JSONB table, Firestore REST,
//! in-process map).

pub mod firestore;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};

pub use firestore::FirestoreDocumentStore;
pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

pub type JsonMap = Map<String, JsonValue>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Connectivity, permission or backend failure.
    #[error("store unavailable: {0}")]
    Transport(String),

    /// Write addressed a document that does not exist.
    #[error("document {collection}/{id} does not exist")]
    NotFound { collection: String, id: String },

    /// Document exists but does not have the expected shape.
    #[error("document {collection}/{id} is malformed: {reason}")]
    Malformed {
        collection: String,
        id: String,
        reason: String,
    },
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}

/// Collection names used by the candidacy workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collections {
    pub applications: String,
    pub jobs: String,
    pub accounts: String,
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            applications: "applications".to_string(),
            jobs: "jobPostings".to_string(),
            accounts: "accounts".to_string(),
        }
    }
}

/// A raw document as returned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub collection: String,
    pub id: String,
    pub data: JsonMap,
}

impl Document {
    pub fn new(collection: impl Into<String>, id: impl Into<String>, data: JsonMap) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
            data,
        }
    }

    /// Decodes the document body into a record type. The document id is
    /// exposed to the record as its `id` field and takes precedence over any
    /// `id` key stored in the body.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        let mut body = self.data.clone();
        body.insert("id".to_string(), JsonValue::String(self.id.clone()));
        serde_json::from_value(JsonValue::Object(body)).map_err(|e| StoreError::Malformed {
            collection: self.collection.clone(),
            id: self.id.clone(),
            reason: e.to_string(),
        })
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns `Ok(None)` when the document does not exist. Errors are
    /// reserved for a store that cannot be reached or refuses the read.
    async fn get_document(&self, collection: &str, id: &str)
        -> Result<Option<Document>, StoreError>;

    /// Merges `fields` into the top level of an existing document. Fields
    /// not named are left untouched. Fails with [`StoreError::NotFound`]
    /// if the document does not exist.
    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: JsonMap,
    ) -> Result<(), StoreError>;
}
