//! SQLite store provider for contend trials
//!
//! Each trial gets its own database file under the system temp directory,
//! opened through a bb8 pool of rusqlite connections configured with the
//! trial's journal mode, synchronous level and pool size, then seeded with
//! random rows for readers to look up.
//!
//! # Example
//!
//! ```rust,ignore
//! use contend_core::Configuration;
//! use contend_storage_sqlite::{SqliteStore, StoreOptions};
//!
//! let config = Configuration::wal().readers(10).pool_size(1);
//! let store = SqliteStore::open(StoreOptions::from(&config)).await?;
//! ```

mod connection;
mod error;
mod store;

pub use connection::{ConnectionOptions, SqliteConnectionManager};
pub use error::SqliteError;
pub use store::{companion_paths, SqliteStore, StoreOptions, DEFAULT_BUSY_TIMEOUT, UNBOUNDED_POOL_SIZE};
