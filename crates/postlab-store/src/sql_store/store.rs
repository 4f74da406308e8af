use crate::error::{StoreError, StoreResult};
use crate::sql_store::migrations::MigrationRunner;
use crate::sql_store::rows::{
    collection_from_row, param_from_row, request_from_row, response_from_row, PARAM_COLUMNS,
    REQUEST_COLUMNS, RESPONSE_COLUMNS,
};
use crate::sql_store::tx::StoreTx;
use postlab_core::{
    Collection, Param, ParamUpdate, RequestRecord, ResponseRecord, ResponseUpdate,
};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// SQLite-backed entity store for collections, requests, params and responses
#[derive(Debug, Clone)]
pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    /// Create a new SqlStore with database URL and the default pool size
    pub async fn new(database_url: &str) -> StoreResult<Self> {
        Self::new_with_config(database_url, None).await
    }

    /// Create SqlStore with custom pool configuration
    pub async fn new_with_config(
        database_url: &str,
        max_connections: Option<u32>,
    ) -> StoreResult<Self> {
        let max_conn = max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS);

        // Plain `sqlite://path` URLs are treated as file paths so parent-relative paths work
        let options = if let Some(path_str) = database_url.strip_prefix("sqlite://") {
            let path = PathBuf::from(path_str);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            SqliteConnectOptions::new().filename(path)
        } else {
            SqliteConnectOptions::from_str(database_url)?
        };

        // Per-connection settings: every pooled connection enforces foreign keys
        let options = options
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_conn)
            .connect_with(options)
            .await?;

        tracing::debug!(database_url, max_connections = max_conn, "sqlite pool ready");

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Create SqlStore from existing pool (for testing)
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run migrations manually
    pub async fn migrate(&self) -> StoreResult<()> {
        MigrationRunner::new(self.pool.clone()).migrate().await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection; used at shutdown
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Open a transactional unit; it rolls back unless committed.
    pub async fn begin(&self) -> StoreResult<StoreTx> {
        Ok(StoreTx::new(self.pool.begin().await?))
    }

    // ---- collections ----

    pub async fn insert_collection(&self, name: &str) -> StoreResult<i64> {
        let result = sqlx::query("INSERT INTO collections (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn list_collections(&self) -> StoreResult<Vec<Collection>> {
        let rows = sqlx::query("SELECT id, name FROM collections ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(collection_from_row).collect()
    }

    pub async fn get_collection(&self, id: i64) -> StoreResult<Option<Collection>> {
        let row = sqlx::query("SELECT id, name FROM collections WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(collection_from_row).transpose()
    }

    /// Returns false when no collection has this id
    pub async fn rename_collection(&self, id: i64, name: &str) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE collections SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---- requests ----

    pub async fn get_request(&self, id: i64) -> StoreResult<Option<RequestRecord>> {
        let sql = format!("SELECT {} FROM requests WHERE id = ?", REQUEST_COLUMNS);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(request_from_row).transpose()
    }

    pub async fn list_requests_by_collection(
        &self,
        collection_id: i64,
    ) -> StoreResult<Vec<RequestRecord>> {
        let sql = format!(
            "SELECT {} FROM requests WHERE collection_id = ? ORDER BY id",
            REQUEST_COLUMNS
        );
        let rows = sqlx::query(&sql).bind(collection_id).fetch_all(&self.pool).await?;
        rows.iter().map(request_from_row).collect()
    }

    pub async fn request_exists(&self, id: i64) -> StoreResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM requests WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    // ---- params ----

    pub async fn get_param(&self, id: i64) -> StoreResult<Option<Param>> {
        let sql = format!("SELECT {} FROM params WHERE id = ?", PARAM_COLUMNS);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(param_from_row).transpose()
    }

    pub async fn list_params(&self, request_id: i64) -> StoreResult<Vec<Param>> {
        let sql = format!("SELECT {} FROM params WHERE request_id = ? ORDER BY id", PARAM_COLUMNS);
        let rows = sqlx::query(&sql).bind(request_id).fetch_all(&self.pool).await?;
        rows.iter().map(param_from_row).collect()
    }

    /// Write only the provided fields. Returns false when no param has this id.
    pub async fn update_param(&self, id: i64, update: &ParamUpdate) -> StoreResult<bool> {
        if update.is_empty() {
            return Err(StoreError::InvalidData("param update has no fields".to_string()));
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE params SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(key) = &update.key {
                set.push("key = ").push_bind_unseparated(key.clone());
            }
            if let Some(value) = &update.value {
                set.push("value = ").push_bind_unseparated(value.clone());
            }
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_param(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM params WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---- responses ----

    pub async fn get_response(&self, id: i64) -> StoreResult<Option<ResponseRecord>> {
        let sql = format!("SELECT {} FROM responses WHERE id = ?", RESPONSE_COLUMNS);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(response_from_row).transpose()
    }

    pub async fn list_responses(&self, request_id: i64) -> StoreResult<Vec<ResponseRecord>> {
        let sql = format!(
            "SELECT {} FROM responses WHERE request_id = ? ORDER BY id",
            RESPONSE_COLUMNS
        );
        let rows = sqlx::query(&sql).bind(request_id).fetch_all(&self.pool).await?;
        rows.iter().map(response_from_row).collect()
    }

    /// Write only the provided fields. Returns false when no response has this id.
    pub async fn update_response(&self, id: i64, update: &ResponseUpdate) -> StoreResult<bool> {
        if update.is_empty() {
            return Err(StoreError::InvalidData("response update has no fields".to_string()));
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE responses SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(body) = &update.body {
                set.push("body = ").push_bind_unseparated(Json(body.clone()));
            }
            if let Some(status_code) = update.status_code {
                set.push("status_code = ").push_bind_unseparated(status_code);
            }
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_response(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM responses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
