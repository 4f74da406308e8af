use postlab_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid stored value: {0}")]
    InvalidData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Database(e) => match e {
                sqlx::Error::Database(db_err) => {
                    let code = db_err.code().unwrap_or_default();
                    let message = db_err.message();

                    // SQLite extended result codes: https://www.sqlite.org/rescode.html
                    match code.as_ref() {
                        "1555" | "2067" => CoreError::Conflict(format!(
                            "Unique constraint violation: {}",
                            message
                        )),
                        "787" => CoreError::Invalid(format!(
                            "Foreign key constraint failed: {}",
                            message
                        )),
                        "275" => CoreError::Invalid(format!(
                            "Check constraint failed: {}",
                            message
                        )),
                        _ => CoreError::Db(format!("Database error ({}): {}", code, message)),
                    }
                }
                sqlx::Error::RowNotFound => CoreError::NotFound("row not found".to_string()),
                _ => CoreError::Db(e.to_string()),
            },
            StoreError::Migration(msg) => CoreError::Db(msg),
            StoreError::Serialization(e) => CoreError::Serde(e.to_string()),
            StoreError::InvalidData(msg) => CoreError::Db(msg),
            StoreError::Io(e) => CoreError::Db(e.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
