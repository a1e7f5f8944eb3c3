#![allow(unused)]

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use contend_benchmarks::Runner;
use contend_core::{Configuration, Store, StoreError};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).with_test_writer().init();
}

#[derive(Debug, thiserror::Error)]
#[error("injected {0} failure")]
pub struct Injected(&'static str);

/// Store whose opens and closes are counted, optionally failing on the nth open.
pub struct CountingStore {
    closes: Arc<AtomicUsize>,
    fail_reads: bool,
    fail_close: bool,
}

#[async_trait]
impl Store for CountingStore {
    fn seed_count(&self) -> u64 { 1_000 }

    async fn point_read(&self, _id: i64) -> Result<usize, StoreError> {
        tokio::time::sleep(Duration::from_millis(1)).await;
        if self.fail_reads {
            return Err(StoreError::new(Injected("read")));
        }
        Ok(1)
    }

    async fn insert(&self, _payload: String) -> Result<(), StoreError> {
        tokio::time::sleep(Duration::from_millis(1)).await;
        Ok(())
    }

    async fn close(self) -> Result<(), StoreError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(StoreError::new(Injected("close")));
        }
        Ok(())
    }
}

pub type OpenFuture = Pin<Box<dyn Future<Output = Result<CountingStore, StoreError>> + Send>>;

#[derive(Clone, Default)]
pub struct Factory {
    pub opens: Arc<AtomicUsize>,
    pub closes: Arc<AtomicUsize>,
    /// 1-based open that fails during setup
    pub fail_open_at: Option<usize>,
    /// 1-based open whose store fails every read
    pub fail_reads_at: Option<usize>,
    /// 1-based open whose store fails to close
    pub fail_close_at: Option<usize>,
}

impl Factory {
    pub async fn open(&self, _config: &Configuration) -> Result<CountingStore, StoreError> {
        let n = self.opens.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_open_at == Some(n) {
            return Err(StoreError::new(Injected("open")));
        }
        Ok(CountingStore { closes: self.closes.clone(), fail_reads: self.fail_reads_at == Some(n), fail_close: self.fail_close_at == Some(n) })
    }

    /// Runner whose store factory is this factory.
    pub fn runner(&self, duration: Duration) -> Runner<CountingStore, StoreError, impl Fn(&Configuration) -> OpenFuture, OpenFuture> {
        let factory = self.clone();
        Runner::new(
            move |config: &Configuration| -> OpenFuture {
                let factory = factory.clone();
                let config = *config;
                Box::pin(async move { factory.open(&config).await })
            },
            duration,
        )
    }

    pub fn opens(&self) -> usize { self.opens.load(Ordering::SeqCst) }

    pub fn closes(&self) -> usize { self.closes.load(Ordering::SeqCst) }
}

/// Log sink for asserting on events emitted on the current thread.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Route this thread's events into the sink until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt().with_writer(self.clone()).with_ansi(false).with_max_level(Level::WARN).finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String { String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned() }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> { Ok(()) }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer { self.clone() }
}
