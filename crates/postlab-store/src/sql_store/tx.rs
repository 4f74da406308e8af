use crate::error::StoreResult;
use postlab_core::NewRequest;
use serde_json::Value as JsonValue;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, Transaction};

/// One atomic unit of work against the entity store.
///
/// Wraps a pooled connection holding an open transaction. Dropping a `StoreTx`
/// without calling [`StoreTx::commit`] rolls back everything written through it
/// and returns the connection to the pool.
pub struct StoreTx {
    inner: Transaction<'static, Sqlite>,
}

impl StoreTx {
    pub(crate) fn new(inner: Transaction<'static, Sqlite>) -> Self {
        Self { inner }
    }

    pub async fn commit(self) -> StoreResult<()> {
        self.inner.commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> StoreResult<()> {
        self.inner.rollback().await?;
        Ok(())
    }

    pub async fn collection_exists(&mut self, id: i64) -> StoreResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM collections WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.inner)
            .await?;
        Ok(found.is_some())
    }

    pub async fn request_exists(&mut self, id: i64) -> StoreResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM requests WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.inner)
            .await?;
        Ok(found.is_some())
    }

    // ---- inserts ----

    pub async fn insert_request(&mut self, request: &NewRequest) -> StoreResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO requests (url, method, body, bodytype, collection_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.url)
        .bind(request.method.as_str())
        .bind(request.body.clone().map(Json))
        .bind(request.bodytype.map(|b| b.as_str()))
        .bind(request.collection_id)
        .execute(&mut *self.inner)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn insert_param(&mut self, request_id: i64, key: &str, value: &str) -> StoreResult<i64> {
        let result = sqlx::query("INSERT INTO params (key, value, request_id) VALUES (?, ?, ?)")
            .bind(key)
            .bind(value)
            .bind(request_id)
            .execute(&mut *self.inner)
            .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn insert_response(
        &mut self,
        request_id: i64,
        body: &JsonValue,
        status_code: Option<i32>,
    ) -> StoreResult<i64> {
        let result =
            sqlx::query("INSERT INTO responses (request_id, body, status_code) VALUES (?, ?, ?)")
                .bind(request_id)
                .bind(Json(body))
                .bind(status_code)
                .execute(&mut *self.inner)
                .await?;
        Ok(result.last_insert_rowid())
    }

    // ---- cascade ----

    pub async fn request_ids_in_collection(&mut self, collection_id: i64) -> StoreResult<Vec<i64>> {
        let ids = sqlx::query_scalar("SELECT id FROM requests WHERE collection_id = ? ORDER BY id")
            .bind(collection_id)
            .fetch_all(&mut *self.inner)
            .await?;
        Ok(ids)
    }

    pub async fn delete_responses_for_requests(&mut self, request_ids: &[i64]) -> StoreResult<u64> {
        self.delete_children("responses", request_ids).await
    }

    pub async fn delete_params_for_requests(&mut self, request_ids: &[i64]) -> StoreResult<u64> {
        self.delete_children("params", request_ids).await
    }

    pub async fn delete_requests_in_collection(&mut self, collection_id: i64) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM requests WHERE collection_id = ?")
            .bind(collection_id)
            .execute(&mut *self.inner)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_request(&mut self, id: i64) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM requests WHERE id = ?")
            .bind(id)
            .execute(&mut *self.inner)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_collection(&mut self, id: i64) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM collections WHERE id = ?")
            .bind(id)
            .execute(&mut *self.inner)
            .await?;
        Ok(result.rows_affected())
    }

    /// `table` is one of the fixed child table names above, never caller input.
    async fn delete_children(&mut self, table: &'static str, request_ids: &[i64]) -> StoreResult<u64> {
        if request_ids.is_empty() {
            return Ok(0);
        }

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("DELETE FROM {} WHERE request_id IN (", table));
        {
            let mut ids = qb.separated(", ");
            for id in request_ids {
                ids.push_bind(*id);
            }
            ids.push_unseparated(")");
        }

        let result = qb.build().execute(&mut *self.inner).await?;
        Ok(result.rows_affected())
    }
}
