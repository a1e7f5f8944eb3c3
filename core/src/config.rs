//! Trial configuration data model.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// How committed writes reach the database file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JournalMode {
    /// Write-ahead log
    Wal,
    /// The engine's default rollback journal
    Rollback,
}

impl JournalMode {
    pub fn pragma_value(&self) -> &'static str {
        match self {
            JournalMode::Wal => "WAL",
            JournalMode::Rollback => "DELETE",
        }
    }
}

/// How aggressively the engine flushes to durable storage before acknowledging a write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Synchronous {
    Off,
    Normal,
    Full,
}

impl Synchronous {
    pub fn as_str(&self) -> &'static str {
        match self {
            Synchronous::Off => "OFF",
            Synchronous::Normal => "NORMAL",
            Synchronous::Full => "FULL",
        }
    }
}

impl fmt::Display for Synchronous {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Synchronous {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OFF" => Ok(Synchronous::Off),
            "NORMAL" => Ok(Synchronous::Normal),
            "FULL" => Ok(Synchronous::Full),
            _ => Err(ConfigError::UnknownSynchronous(s.to_string())),
        }
    }
}

/// One trial's parameters. Immutable once built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Configuration {
    pub journal: JournalMode,
    pub synchronous: Synchronous,
    /// Maximum pooled connections; 0 leaves the cap to the store provider.
    pub pool_size: u32,
    pub readers: usize,
    pub writers: usize,
    /// Serialize writers through an in-process lock on top of the engine's own locking.
    pub mutex: bool,
}

impl Configuration {
    /// WAL journal, NORMAL sync, provider-chosen pool, no workers.
    pub fn wal() -> Self {
        Self { journal: JournalMode::Wal, synchronous: Synchronous::Normal, pool_size: 0, readers: 0, writers: 0, mutex: false }
    }

    pub fn rollback() -> Self { Self { journal: JournalMode::Rollback, ..Self::wal() } }

    pub fn synchronous(mut self, synchronous: Synchronous) -> Self {
        self.synchronous = synchronous;
        self
    }

    pub fn pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn readers(mut self, readers: usize) -> Self {
        self.readers = readers;
        self
    }

    pub fn writers(mut self, writers: usize) -> Self {
        self.writers = writers;
        self
    }

    pub fn mutex(mut self, mutex: bool) -> Self {
        self.mutex = mutex;
        self
    }

    pub fn worker_count(&self) -> usize { self.readers + self.writers }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let yn = |b: bool| if b { "Y" } else { "N" };
        // Render into a String first so callers can pad the whole description with `{:<N}`.
        let description = format!(
            "readers={:<3} writers={:<3} WAL={} sync={} conns={} mutex={}",
            self.readers,
            self.writers,
            yn(self.journal == JournalMode::Wal),
            self.synchronous,
            self.pool_size,
            yn(self.mutex)
        );
        f.pad(&description)
    }
}

/// An element of a configuration table: either a heading or a trial to run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    Section(String),
    Trial(Configuration),
}

impl Entry {
    pub fn section(label: impl Into<String>) -> Self { Entry::Section(label.into()) }
}

impl From<Configuration> for Entry {
    fn from(config: Configuration) -> Self { Entry::Trial(config) }
}
