//! Connection manager for bb8 pool with rusqlite

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use contend_core::{JournalMode, Synchronous};
use rusqlite::Connection;
use tokio::sync::Mutex;
use tracing::trace;

use crate::error::SqliteError;

/// Per-connection settings, applied every time the pool opens a connection.
#[derive(Clone, Debug)]
pub struct ConnectionOptions {
    pub path: PathBuf,
    pub journal: JournalMode,
    pub synchronous: Synchronous,
    pub busy_timeout: Duration,
}

/// Opens rusqlite connections for bb8.
///
/// rusqlite connections are blocking, so every operation on them runs on
/// tokio's blocking pool.
pub struct SqliteConnectionManager {
    options: ConnectionOptions,
}

impl SqliteConnectionManager {
    pub fn new(options: ConnectionOptions) -> Self { Self { options } }

    pub fn options(&self) -> &ConnectionOptions { &self.options }

    fn create_connection(options: &ConnectionOptions) -> Result<Connection, SqliteError> {
        let conn = Connection::open(&options.path)?;
        conn.busy_timeout(options.busy_timeout)?;

        // journal_mode answers with a row, so it goes through query_row rather than execute
        let mode: String = conn.query_row(&format!("PRAGMA journal_mode={}", options.journal.pragma_value()), [], |row| row.get(0))?;
        conn.execute_batch(&format!("PRAGMA synchronous={};", options.synchronous))?;
        trace!(path = %options.path.display(), journal = %mode, synchronous = %options.synchronous, "opened connection");

        Ok(conn)
    }
}

/// A pooled SQLite connection wrapper
///
/// Wraps the rusqlite Connection in an Arc<Mutex> so it can be moved into
/// spawn_blocking closures.
pub struct PooledConnection {
    inner: Arc<Mutex<Connection>>,
}

impl PooledConnection {
    pub fn new(conn: Connection) -> Self { Self { inner: Arc::new(Mutex::new(conn)) } }

    /// Execute a function with the connection on the blocking pool
    pub async fn with_connection<F, T>(&self, f: F) -> Result<T, SqliteError>
    where
        F: FnOnce(&Connection) -> Result<T, SqliteError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn.blocking_lock();
            f(&guard)
        })
        .await
        .map_err(|e| SqliteError::TaskJoin(e.to_string()))?
    }

    /// Execute a function with mutable access to the connection
    pub async fn with_connection_mut<F, T>(&self, f: F) -> Result<T, SqliteError>
    where
        F: FnOnce(&mut Connection) -> Result<T, SqliteError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.blocking_lock();
            f(&mut guard)
        })
        .await
        .map_err(|e| SqliteError::TaskJoin(e.to_string()))?
    }
}

impl bb8::ManageConnection for SqliteConnectionManager {
    type Connection = PooledConnection;
    type Error = SqliteError;

    fn connect(&self) -> impl std::future::Future<Output = Result<Self::Connection, Self::Error>> + Send {
        let options = self.options.clone();
        async move {
            tokio::task::spawn_blocking(move || Self::create_connection(&options).map(PooledConnection::new))
                .await
                .map_err(|e| SqliteError::TaskJoin(e.to_string()))?
        }
    }

    #[allow(refining_impl_trait)]
    fn is_valid<'a, 'b>(&'a self, conn: &'b mut Self::Connection) -> impl std::future::Future<Output = Result<(), Self::Error>> + Send {
        let conn_inner = conn.inner.clone();
        async move {
            tokio::task::spawn_blocking(move || {
                let guard = conn_inner.blocking_lock();
                guard.execute_batch("SELECT 1").map_err(SqliteError::from)
            })
            .await
            .map_err(|e| SqliteError::TaskJoin(e.to_string()))?
        }
    }

    fn has_broken(&self, _conn: &mut Self::Connection) -> bool { false }
}
