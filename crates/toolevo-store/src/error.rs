use toolevo_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[cfg(feature = "sqlite")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            #[cfg(feature = "sqlite")]
            StoreError::Database(e) => match e {
                sqlx::Error::Database(db_err) => {
                    let code = db_err.code().unwrap_or_default();
                    let message = db_err.message();

                    // SQLite extended result codes: https://www.sqlite.org/rescode.html
                    match code.as_ref() {
                        "1555" | "2067" => {
                            CoreError::Conflict(format!("Unique constraint violation: {}", message))
                        }
                        "787" => CoreError::NotFound(format!(
                            "Foreign key constraint failed: {}",
                            message
                        )),
                        _ => CoreError::Db(format!("Database error ({}): {}", code, message)),
                    }
                }
                _ => CoreError::Db(e.to_string()),
            },
            StoreError::Serialization(e) => CoreError::Serde(e.to_string()),
            StoreError::Core(e) => e,
            StoreError::Corrupt(msg) => CoreError::Db(msg),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
