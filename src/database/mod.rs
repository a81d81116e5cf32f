pub mod manager;
pub mod memory;
pub mod postgres;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::filter::{FilterData, FilterError, ID_FIELD};

pub use manager::DatabaseManager;
pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

/// A stored JSON object. Persisted documents carry their identifier under `_id`.
pub type Document = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Recipes,
    Reviews,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Recipes, Collection::Reviews];

    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::Recipes => "recipes",
            Collection::Reviews => "reviews",
        }
    }
}

/// Store-assigned identifier. Time-ordered, so sorting by id sorts by insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for DocumentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

#[derive(Debug, Error)]
#[error("Invalid identifier: {0}")]
pub struct InvalidDocumentId(pub String);

impl FromStr for DocumentId {
    type Err = InvalidDocumentId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| InvalidDocumentId(s.to_string()))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Attach `id` as the document's `_id`, replacing whatever the caller sent.
pub fn with_id(mut doc: Document, id: DocumentId) -> Document {
    doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    doc
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid filter: {0}")]
    Filter(#[from] FilterError),

    #[error("Corrupt document {id} in {collection}")]
    CorruptDocument { collection: &'static str, id: String },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Single-call, atomic operations over the document collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: Collection, filter: &FilterData) -> Result<Vec<Document>, StoreError>;

    async fn find_by_id(&self, collection: Collection, id: DocumentId) -> Result<Option<Document>, StoreError>;

    /// Persist `doc` under a fresh identifier and return it with `_id` attached.
    async fn insert(&self, collection: Collection, doc: Document) -> Result<Document, StoreError>;

    /// Shallow-merge `set` into the stored document's top-level fields.
    async fn update_by_id(&self, collection: Collection, id: DocumentId, set: Document) -> Result<UpdateResult, StoreError>;

    async fn delete_by_id(&self, collection: Collection, id: DocumentId) -> Result<DeleteResult, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_identifiers() {
        let id = DocumentId::generate();
        assert_eq!(id.to_string().parse::<DocumentId>().unwrap(), id);
        assert!("64b7f0c2e1".parse::<DocumentId>().is_err());
        assert!("".parse::<DocumentId>().is_err());
    }

    #[test]
    fn identifiers_are_time_ordered() {
        let first = DocumentId::generate();
        let second = DocumentId::generate();
        assert!(second > first);
    }

    #[test]
    fn acknowledgments_use_camel_case() {
        let ack = serde_json::to_value(DeleteResult { acknowledged: true, deleted_count: 0 }).unwrap();
        assert_eq!(ack, serde_json::json!({ "acknowledged": true, "deletedCount": 0 }));
    }
}
