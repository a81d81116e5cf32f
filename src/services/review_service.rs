use std::sync::Arc;

use serde_json::{json, Value};

use crate::database::{
    Collection, DeleteResult, Document, DocumentId, DocumentStore, StoreError, UpdateResult,
};
use crate::filter::{FilterData, ID_FIELD};

#[derive(Clone)]
pub struct ReviewService {
    store: Arc<dyn DocumentStore>,
}

impl ReviewService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, doc: Document) -> Result<Document, StoreError> {
        let created = self.store.insert(Collection::Reviews, doc).await?;
        tracing::debug!("Created review {}", created[ID_FIELD]);
        Ok(created)
    }

    pub async fn get(&self, id: DocumentId) -> Result<Option<Document>, StoreError> {
        self.store.find_by_id(Collection::Reviews, id).await
    }

    /// Reviews for one recipe, newest `reviewTime` first.
    pub async fn list_by_recipe(&self, recipe_id: &str) -> Result<Vec<Document>, StoreError> {
        let filter = FilterData {
            where_clause: Some(json!({ "recipeId": recipe_id })),
            order: Some(Value::String("reviewTime desc".to_string())),
            ..Default::default()
        };
        self.store.find(Collection::Reviews, &filter).await
    }

    /// Exact, case-sensitive match on `reviewer.email`.
    pub async fn list_by_reviewer_email(&self, email: &str) -> Result<Vec<Document>, StoreError> {
        let filter = FilterData {
            where_clause: Some(json!({ "reviewer.email": { "$eq": email } })),
            ..Default::default()
        };
        self.store.find(Collection::Reviews, &filter).await
    }

    pub async fn delete(&self, id: DocumentId) -> Result<DeleteResult, StoreError> {
        let result = self.store.delete_by_id(Collection::Reviews, id).await?;
        tracing::debug!("Deleted review {} ({} removed)", id, result.deleted_count);
        Ok(result)
    }

    pub async fn update(&self, id: DocumentId, set: Document) -> Result<UpdateResult, StoreError> {
        self.store.update_by_id(Collection::Reviews, id, set).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;

    fn service() -> ReviewService {
        ReviewService::new(Arc::new(MemoryStore::new()))
    }

    fn doc(v: Value) -> Document {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn lists_reviews_for_recipe_newest_first() {
        let reviews = service();
        let seed = [
            ("r1", "2024-05-01T10:00:00Z"),
            ("r2", "2024-06-01T10:00:00Z"),
            ("r1", "2024-07-01T10:00:00Z"),
            ("r1", "2024-03-01T10:00:00Z"),
        ];
        for (recipe, time) in seed {
            reviews
                .create(doc(json!({ "recipeId": recipe, "reviewTime": time, "rating": 4 })))
                .await
                .unwrap();
        }

        let listed = reviews.list_by_recipe("r1").await.unwrap();
        let times: Vec<&str> = listed.iter().map(|d| d["reviewTime"].as_str().unwrap()).collect();
        assert_eq!(
            times,
            vec!["2024-07-01T10:00:00Z", "2024-05-01T10:00:00Z", "2024-03-01T10:00:00Z"]
        );
        assert!(reviews.list_by_recipe("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reviewer_email_match_is_exact() {
        let reviews = service();
        for email in ["cook@example.com", "Cook@example.com", "head.cook@example.com"] {
            reviews
                .create(doc(json!({ "reviewer": { "email": email }, "comment": "tasty" })))
                .await
                .unwrap();
        }
        reviews.create(doc(json!({ "comment": "anonymous" }))).await.unwrap();

        let mine = reviews.list_by_reviewer_email("cook@example.com").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0]["reviewer"]["email"], json!("cook@example.com"));
    }

    #[tokio::test]
    async fn update_and_delete_acknowledge() {
        let reviews = service();
        let created = reviews
            .create(doc(json!({ "rating": 2, "comment": "bland" })))
            .await
            .unwrap();
        let id: DocumentId = created[ID_FIELD].as_str().unwrap().parse().unwrap();

        let updated = reviews.update(id, doc(json!({ "comment": "better" }))).await.unwrap();
        assert_eq!(updated.matched_count, 1);
        let stored = reviews.get(id).await.unwrap().unwrap();
        assert_eq!(stored["rating"], json!(2));
        assert_eq!(stored["comment"], json!("better"));

        assert_eq!(reviews.delete(id).await.unwrap().deleted_count, 1);
        assert_eq!(reviews.delete(id).await.unwrap().deleted_count, 0);
    }
}
