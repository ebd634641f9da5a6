use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::{PgPool, Row};

use super::{Document, DocumentStore, JsonMap, StoreError};

/// Document store backed by a single Postgres JSONB table
/// (`documents`, see `migrations/`).
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
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let row_opt = sqlx::query(r#"SELECT data FROM documents WHERE collection = $1 AND id = $2"#)
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row_opt else { return Ok(None) };
        let data: JsonValue = row.try_get("data")?;
        match data {
            JsonValue::Object(map) => Ok(Some(Document::new(collection, id, map))),
            other => Err(StoreError::Malformed {
                collection: collection.to_string(),
                id: id.to_string(),
                reason: format!("expected a JSON object, found {}", other),
            }),
        }
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: JsonMap,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET data = data || $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(JsonValue::Object(fields))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
