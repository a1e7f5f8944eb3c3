//! File-backed SQLite store: open, schema, seed, point reads, inserts, cleanup.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use contend_core::random::{random_payload, PAYLOAD_LEN, SEED_COUNT};
use contend_core::{Configuration, JournalMode, Store, StoreError, Synchronous};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::connection::{ConnectionOptions, SqliteConnectionManager};
use crate::error::SqliteError;

/// Pool cap used when a configuration leaves the size to the provider.
///
/// bb8 rejects a zero cap and opens connections lazily, so a large cap
/// behaves as "no limit" for any realistic worker count.
pub const UNBOUNDED_POOL_SIZE: u32 = 1024;

/// Default wait on a locked database before SQLITE_BUSY is returned.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(10);

const FILE_NAME_LEN: usize = 10;

const CREATE_TABLE: &str = "CREATE TABLE foo (id INTEGER NOT NULL PRIMARY KEY, name TEXT)";
const INSERT_ROW: &str = "INSERT INTO foo(name) VALUES (?1)";
const SELECT_ROW: &str = "SELECT id, name FROM foo WHERE id = ?1";

/// How to open a store for one trial.
#[derive(Clone, Debug)]
pub struct StoreOptions {
    pub journal: JournalMode,
    pub synchronous: Synchronous,
    /// 0 means [`UNBOUNDED_POOL_SIZE`]
    pub pool_size: u32,
    pub seed_count: u64,
    pub busy_timeout: Duration,
}

impl StoreOptions {
    pub fn seed_count(mut self, seed_count: u64) -> Self {
        self.seed_count = seed_count;
        self
    }

    pub fn busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    fn max_pool_size(&self) -> u32 {
        if self.pool_size == 0 {
            UNBOUNDED_POOL_SIZE
        } else {
            self.pool_size
        }
    }
}

impl From<&Configuration> for StoreOptions {
    fn from(config: &Configuration) -> Self {
        Self {
            journal: config.journal,
            synchronous: config.synchronous,
            pool_size: config.pool_size,
            seed_count: SEED_COUNT,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

/// An open, seeded SQLite database in a temporary file.
pub struct SqliteStore {
    pool: bb8::Pool<SqliteConnectionManager>,
    path: PathBuf,
    seed_count: u64,
}

impl SqliteStore {
    /// Create a fresh database under the system temp directory, create the
    /// schema and seed it. The file is removed again if any step fails.
    pub async fn open(options: StoreOptions) -> Result<Self, SqliteError> {
        let path = temp_database_path();
        debug!(path = %path.display(), ?options, "opening store");

        match Self::open_at(path.clone(), &options).await {
            Ok(store) => Ok(store),
            Err(err) => {
                remove_database_files(&path);
                Err(err)
            }
        }
    }

    async fn open_at(path: PathBuf, options: &StoreOptions) -> Result<Self, SqliteError> {
        let manager = SqliteConnectionManager::new(ConnectionOptions {
            path: path.clone(),
            journal: options.journal,
            synchronous: options.synchronous,
            busy_timeout: options.busy_timeout,
        });
        let pool = bb8::Pool::builder()
            .max_size(options.max_pool_size())
            .test_on_check_out(false)
            .build(manager)
            .await?;

        let store = Self { pool, path, seed_count: options.seed_count };
        store.create_schema().await?;
        store.seed().await?;
        Ok(store)
    }

    async fn create_schema(&self) -> Result<(), SqliteError> {
        let conn = self.pool.get().await?;
        conn.with_connection(|c| {
            c.execute(CREATE_TABLE, [])?;
            Ok(())
        })
        .await
    }

    /// Insert `seed_count` random rows in one transaction.
    async fn seed(&self) -> Result<(), SqliteError> {
        let count = self.seed_count;
        let conn = self.pool.get().await?;
        conn.with_connection_mut(move |c| {
            let mut rng = StdRng::from_entropy();
            let tx = c.transaction()?;
            {
                let mut stmt = tx.prepare(INSERT_ROW)?;
                for _ in 0..count {
                    stmt.execute([random_payload(&mut rng, PAYLOAD_LEN)])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await?;
        debug!(rows = count, "seeded store");
        Ok(())
    }

    pub fn path(&self) -> &Path { &self.path }

    /// Get a reference to the connection pool (for testing/diagnostics)
    pub fn pool(&self) -> &bb8::Pool<SqliteConnectionManager> { &self.pool }

    /// Number of rows currently in the table.
    pub async fn row_count(&self) -> Result<u64, SqliteError> {
        let conn = self.pool.get().await?;
        conn.with_connection(|c| Ok(c.query_row("SELECT COUNT(*) FROM foo", [], |row| row.get::<_, i64>(0))? as u64)).await
    }

    async fn read_row(&self, id: i64) -> Result<usize, SqliteError> {
        let conn = self.pool.get().await?;
        conn.with_connection(move |c| {
            let mut stmt = c.prepare_cached(SELECT_ROW)?;
            let mut rows = stmt.query([id])?;
            let mut seen = 0;
            while let Some(row) = rows.next()? {
                let _id: i64 = row.get(0)?;
                let _name: Option<String> = row.get(1)?;
                seen += 1;
            }
            Ok(seen)
        })
        .await
    }

    async fn insert_row(&self, payload: String) -> Result<(), SqliteError> {
        let conn = self.pool.get().await?;
        conn.with_connection(move |c| {
            c.prepare_cached(INSERT_ROW)?.execute([payload])?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl Store for SqliteStore {
    fn seed_count(&self) -> u64 { self.seed_count }

    async fn point_read(&self, id: i64) -> Result<usize, StoreError> { Ok(self.read_row(id).await?) }

    async fn insert(&self, payload: String) -> Result<(), StoreError> { Ok(self.insert_row(payload).await?) }

    /// Drops the pool (closing its connections) and deletes the database file with its WAL companions.
    async fn close(self) -> Result<(), StoreError> {
        let Self { pool, path, .. } = self;
        drop(pool);
        remove_file_if_exists(&path).map_err(|source| SqliteError::Io { path: path.display().to_string(), source })?;
        remove_companion_files(&path);
        debug!(path = %path.display(), "closed store");
        Ok(())
    }
}

fn temp_database_path() -> PathBuf {
    let name = random_payload(&mut StdRng::from_entropy(), FILE_NAME_LEN);
    std::env::temp_dir().join(format!("{}.db", name))
}

fn remove_file_if_exists(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Journal files SQLite may leave next to the database.
pub fn companion_paths(path: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    ["-wal", "-shm", "-journal"].into_iter().map(move |suffix| {
        let mut file = path.as_os_str().to_owned();
        file.push(suffix);
        PathBuf::from(file)
    })
}

fn remove_companion_files(path: &Path) {
    for file in companion_paths(path) {
        if let Err(e) = remove_file_if_exists(&file) {
            warn!(path = %file.display(), "failed to remove database file: {}", e);
        }
    }
}

/// Best-effort removal of the database file and its companions.
fn remove_database_files(path: &Path) {
    if let Err(e) = remove_file_if_exists(path) {
        warn!(path = %path.display(), "failed to remove database file: {}", e);
    }
    remove_companion_files(path);
}
