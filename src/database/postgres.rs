use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgArguments, FromRow, PgPool, Row};
use uuid::Uuid;

use super::{
    with_id, Collection, DeleteResult, Document, DocumentId, DocumentStore, StoreError, UpdateResult,
};
use crate::filter::{Filter, FilterData, SqlParam, ID_FIELD};

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: Uuid,
    doc: Value,
}

impl DocumentRow {
    fn into_document(self, collection: Collection) -> Result<Document, StoreError> {
        match self.doc {
            Value::Object(map) => Ok(with_id(map, self.id.into())),
            _ => Err(StoreError::CorruptDocument {
                collection: collection.table_name(),
                id: self.id.to_string(),
            }),
        }
    }
}

/// One JSONB table per collection: `(id UUID, doc JSONB, created_at)`.
/// The identifier lives in the `id` column and is never stored inside `doc`.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find(&self, collection: Collection, filter_data: &FilterData) -> Result<Vec<Document>, StoreError> {
        let filter = Filter::from_data(collection.table_name(), filter_data)?;
        let sql = filter.to_sql();

        let mut q = sqlx::query_as::<_, DocumentRow>(&sql.query);
        for p in sql.params.iter() {
            q = bind_param(q, p);
        }
        let rows = q.fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|row| row.into_document(collection).map(|doc| filter.project(doc)))
            .collect()
    }

    async fn find_by_id(&self, collection: Collection, id: DocumentId) -> Result<Option<Document>, StoreError> {
        let sql = format!(
            "SELECT \"id\", \"doc\" FROM \"{}\" WHERE \"id\" = $1",
            collection.table_name()
        );
        let row = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| r.into_document(collection)).transpose()
    }

    async fn insert(&self, collection: Collection, mut doc: Document) -> Result<Document, StoreError> {
        doc.remove(ID_FIELD);
        let id = DocumentId::generate();
        let sql = format!(
            "INSERT INTO \"{}\" (\"id\", \"doc\") VALUES ($1, $2)",
            collection.table_name()
        );
        sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(Value::Object(doc.clone()))
            .execute(&self.pool)
            .await?;
        Ok(with_id(doc, id))
    }

    async fn update_by_id(&self, collection: Collection, id: DocumentId, mut set: Document) -> Result<UpdateResult, StoreError> {
        set.remove(ID_FIELD);
        // `||` on JSONB objects overwrites top-level keys and keeps the rest.
        let sql = format!(
            "WITH target AS (SELECT \"id\", \"doc\" FROM \"{table}\" WHERE \"id\" = $1 FOR UPDATE), \
             changed AS (UPDATE \"{table}\" t SET \"doc\" = target.\"doc\" || $2 FROM target \
             WHERE t.\"id\" = target.\"id\" AND target.\"doc\" || $2 <> target.\"doc\" RETURNING t.\"id\") \
             SELECT (SELECT COUNT(*) FROM target) AS matched, (SELECT COUNT(*) FROM changed) AS modified",
            table = collection.table_name()
        );
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(Value::Object(set))
            .fetch_one(&self.pool)
            .await?;

        let matched: i64 = row.try_get("matched")?;
        let modified: i64 = row.try_get("modified")?;
        Ok(UpdateResult {
            acknowledged: true,
            matched_count: matched as u64,
            modified_count: modified as u64,
        })
    }

    async fn delete_by_id(&self, collection: Collection, id: DocumentId) -> Result<DeleteResult, StoreError> {
        let sql = format!("DELETE FROM \"{}\" WHERE \"id\" = $1", collection.table_name());
        let result = sqlx::query(&sql).bind(id.as_uuid()).execute(&self.pool).await?;
        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: result.rows_affected(),
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn bind_param<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    p: &'q SqlParam,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match p {
        SqlParam::Id(id) => q.bind(*id),
        // Bound as JSONB so comparisons against `doc #> path` are type-exact.
        SqlParam::Json(value) => q.bind(value),
    }
}
