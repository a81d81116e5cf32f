use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use super::{Collection, StoreError};
use crate::config::AppConfig;

/// Opens the process-wide pool once at startup and prepares the collections.
pub struct DatabaseManager;

impl DatabaseManager {
    pub async fn connect(config: &AppConfig) -> Result<PgPool, StoreError> {
        let connection_string = config
            .connection_string()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&connection_string)
            .await?;

        Self::ensure_collections(&pool).await?;
        info!(
            "Connected document store (max {} connections)",
            config.database.max_connections
        );
        Ok(pool)
    }

    /// Idempotent; safe on every start.
    pub async fn ensure_collections(pool: &PgPool) -> Result<(), StoreError> {
        for collection in Collection::ALL {
            sqlx::query(&Self::create_table_sql(collection)).execute(pool).await?;
        }
        Ok(())
    }

    fn create_table_sql(collection: Collection) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (\
             \"id\" UUID PRIMARY KEY, \
             \"doc\" JSONB NOT NULL, \
             \"created_at\" TIMESTAMPTZ NOT NULL DEFAULT now())",
            collection.table_name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_table_sql_per_collection() {
        assert_eq!(
            DatabaseManager::create_table_sql(Collection::Reviews),
            "CREATE TABLE IF NOT EXISTS \"reviews\" (\"id\" UUID PRIMARY KEY, \
             \"doc\" JSONB NOT NULL, \"created_at\" TIMESTAMPTZ NOT NULL DEFAULT now())"
        );
    }
}
