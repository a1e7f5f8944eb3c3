//! Error types for the SQLite store

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqliteError {
    #[error("SQLite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("I/O error on {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("Task join error: {0}")]
    TaskJoin(String),
}

impl From<bb8::RunError<SqliteError>> for SqliteError {
    fn from(err: bb8::RunError<SqliteError>) -> Self {
        match err {
            bb8::RunError::User(e) => e,
            bb8::RunError::TimedOut => SqliteError::Pool("timed out waiting for a connection".to_string()),
        }
    }
}

impl From<SqliteError> for contend_core::StoreError {
    fn from(err: SqliteError) -> Self { contend_core::StoreError::new(err) }
}
