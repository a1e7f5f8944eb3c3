//! Concurrent reader/writer trial driver.
//!
//! One trial spins up a fixed population of reader and writer workers against a
//! shared [`Store`], holds them at a start barrier, releases them together, stops
//! them after a fixed wall-clock window and sums their completed operations.
//!
//! ```rust,ignore
//! let config = Configuration::wal().readers(10).writers(1);
//! let totals = run_trial(&config, Arc::new(store), Duration::from_secs(1)).await?;
//! let rates = totals.rates(Duration::from_secs(1));
//! ```

pub mod config;
pub mod error;
pub mod lock;
pub mod random;
pub mod storage;
pub mod trial;
pub mod workload;

pub use config::{Configuration, Entry, JournalMode, Synchronous};
pub use error::{ConfigError, StoreError, TrialError};
pub use lock::WriterLock;
pub use storage::Store;
pub use trial::{aggregate, run_trial, Rates, TrialDriver, TrialTotals};
pub use workload::{read_once, write_once, Role, WorkerOutcome};
