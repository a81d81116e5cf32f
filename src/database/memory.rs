use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    with_id, Collection, DeleteResult, Document, DocumentId, DocumentStore, StoreError, UpdateResult,
};
use crate::filter::{Filter, FilterData, ID_FIELD};

/// In-process store with the same observable semantics as [`super::PgDocumentStore`].
///
/// Collections are kept in insertion order. `set_unavailable(true)` makes every
/// call fail, which is how tests reach the 500 path.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<(DocumentId, Document)>>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: Collection, filter: &FilterData) -> Result<Vec<Document>, StoreError> {
        self.check_available()?;
        let filter = Filter::from_data(collection.table_name(), filter)?;
        let collections = self.collections.read().await;
        let docs = collections.get(&collection).map(Vec::as_slice).unwrap_or_default();
        Ok(filter.apply(docs.iter().map(|(_, doc)| doc)))
    }

    async fn find_by_id(&self, collection: Collection, id: DocumentId) -> Result<Option<Document>, StoreError> {
        self.check_available()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|(doc_id, _)| *doc_id == id))
            .map(|(_, doc)| doc.clone()))
    }

    async fn insert(&self, collection: Collection, doc: Document) -> Result<Document, StoreError> {
        self.check_available()?;
        let id = DocumentId::generate();
        let doc = with_id(doc, id);
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push((id, doc.clone()));
        Ok(doc)
    }

    async fn update_by_id(&self, collection: Collection, id: DocumentId, set: Document) -> Result<UpdateResult, StoreError> {
        self.check_available()?;
        let mut collections = self.collections.write().await;
        let target = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|(doc_id, _)| *doc_id == id));

        let Some((_, doc)) = target else {
            return Ok(UpdateResult { acknowledged: true, matched_count: 0, modified_count: 0 });
        };

        let mut modified = false;
        for (key, value) in set {
            if key == ID_FIELD {
                continue;
            }
            if doc.get(&key) != Some(&value) {
                doc.insert(key, value);
                modified = true;
            }
        }

        Ok(UpdateResult {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    async fn delete_by_id(&self, collection: Collection, id: DocumentId) -> Result<DeleteResult, StoreError> {
        self.check_available()?;
        let mut collections = self.collections.write().await;
        let deleted = match collections.get_mut(&collection) {
            Some(docs) => {
                let before = docs.len();
                docs.retain(|(doc_id, _)| *doc_id != id);
                (before - docs.len()) as u64
            }
            None => 0,
        };
        Ok(DeleteResult { acknowledged: true, deleted_count: deleted })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}
