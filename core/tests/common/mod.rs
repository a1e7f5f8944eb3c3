use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use contend_core::{Store, StoreError};
use tracing::Level;

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).with_test_writer().init();
}

#[derive(Debug, thiserror::Error)]
#[error("injected failure")]
pub struct Injected;

/// In-memory store that records what workers did to it.
pub struct MemoryStore {
    seed_count: u64,
    latency: Duration,
    fail_reads_after: Option<usize>,
    panic_on_insert: bool,
    pub reads: AtomicUsize,
    pub inserts: AtomicUsize,
    pub read_ids: Mutex<HashSet<i64>>,
    /// Inserts in flight right now
    in_insert: AtomicUsize,
    /// Highest number of concurrent inserts observed
    pub max_concurrent_inserts: AtomicUsize,
}

impl MemoryStore {
    pub fn new(seed_count: u64) -> Self {
        Self {
            seed_count,
            latency: Duration::from_micros(200),
            fail_reads_after: None,
            panic_on_insert: false,
            reads: AtomicUsize::new(0),
            inserts: AtomicUsize::new(0),
            read_ids: Mutex::new(HashSet::new()),
            in_insert: AtomicUsize::new(0),
            max_concurrent_inserts: AtomicUsize::new(0),
        }
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn panic_on_insert(mut self) -> Self {
        self.panic_on_insert = true;
        self
    }

    pub fn fail_reads_after(mut self, reads: usize) -> Self {
        self.fail_reads_after = Some(reads);
        self
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn seed_count(&self) -> u64 { self.seed_count }

    async fn point_read(&self, id: i64) -> Result<usize, StoreError> {
        tokio::time::sleep(self.latency).await;
        let done = self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads_after.is_some_and(|limit| done >= limit) {
            return Err(StoreError::new(Injected));
        }
        self.read_ids.lock().unwrap().insert(id);
        Ok(1)
    }

    async fn insert(&self, _payload: String) -> Result<(), StoreError> {
        if self.panic_on_insert {
            panic!("insert exploded");
        }
        let now = self.in_insert.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_concurrent_inserts.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        self.in_insert.fetch_sub(1, Ordering::SeqCst);
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(self) -> Result<(), StoreError> { Ok(()) }
}

/// Store whose calls complete without ever suspending.
pub struct InstantStore;

#[async_trait]
impl Store for InstantStore {
    fn seed_count(&self) -> u64 { 10 }

    async fn point_read(&self, _id: i64) -> Result<usize, StoreError> { Ok(1) }

    async fn insert(&self, _payload: String) -> Result<(), StoreError> { Ok(()) }

    async fn close(self) -> Result<(), StoreError> { Ok(()) }
}
