use std::sync::Arc;

use serde_json::Value;

use crate::database::{Collection, Document, DocumentId, DocumentStore, StoreError};
use crate::filter::{FilterData, ID_FIELD};

/// Fields kept by the limited recipe listing.
pub const RECIPE_SUMMARY_FIELDS: [&str; 6] = [ID_FIELD, "name", "picture", "price", "ratings", "description"];

/// Sort, projection and bound for a shaped listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingShape {
    pub order: &'static str,
    pub select: &'static [&'static str],
    /// `None` is unbounded.
    pub limit: Option<i64>,
}

impl ListingShape {
    /// Newest first, summary fields only.
    pub fn latest_recipes(limit: Option<i64>) -> Self {
        Self {
            order: "_id desc",
            select: &RECIPE_SUMMARY_FIELDS,
            limit,
        }
    }

    pub fn to_filter_data(&self) -> FilterData {
        FilterData {
            select: Some(self.select.iter().map(|f| f.to_string()).collect()),
            where_clause: None,
            order: Some(Value::String(self.order.to_string())),
            limit: self.limit,
        }
    }
}

#[derive(Clone)]
pub struct RecipeService {
    store: Arc<dyn DocumentStore>,
}

impl RecipeService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Full documents matching `filter`, in store order.
    pub async fn list(&self, filter: FilterData) -> Result<Vec<Document>, StoreError> {
        self.store.find(Collection::Recipes, &filter).await
    }

    pub async fn list_shaped(&self, shape: &ListingShape) -> Result<Vec<Document>, StoreError> {
        self.store.find(Collection::Recipes, &shape.to_filter_data()).await
    }

    pub async fn get(&self, id: DocumentId) -> Result<Option<Document>, StoreError> {
        self.store.find_by_id(Collection::Recipes, id).await
    }

    pub async fn create(&self, doc: Document) -> Result<Document, StoreError> {
        let created = self.store.insert(Collection::Recipes, doc).await?;
        tracing::debug!("Created recipe {}", created[ID_FIELD]);
        Ok(created)
    }
}
