//! Units of work and the loops that repeat them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::Rng;
use tokio::sync::Barrier;

use crate::error::{StoreError, TrialError};
use crate::lock::WriterLock;
use crate::random::{random_id, random_payload, PAYLOAD_LEN};
use crate::storage::Store;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Reader,
    Writer,
}

/// Completed units of one worker, handed to the driver exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerOutcome {
    pub role: Role,
    pub count: u64,
}

/// One point lookup at a uniformly random seeded identity. Returns the identity read.
pub async fn read_once<S: Store, R: Rng + ?Sized>(store: &S, rng: &mut R) -> Result<i64, StoreError> {
    let id = random_id(rng, store.seed_count());
    store.point_read(id).await?;
    Ok(id)
}

/// One insert of the given payload.
pub async fn write_once<S: Store>(store: &S, payload: String, lock: Option<&WriterLock>) -> Result<(), StoreError> {
    match lock {
        Some(lock) => {
            let _guard = lock.lock().await;
            store.insert(payload).await
        }
        None => store.insert(payload).await,
    }
}

/// Everything a worker shares with its siblings.
pub(crate) struct Signals {
    pub start: Barrier,
    pub cancelled: AtomicBool,
}

impl Signals {
    pub fn new(workers: usize) -> Self { Self { start: Barrier::new(workers + 1), cancelled: AtomicBool::new(false) } }

    pub fn is_cancelled(&self) -> bool { self.cancelled.load(Ordering::Acquire) }

    pub fn cancel(&self) { self.cancelled.store(true, Ordering::Release); }
}

pub(crate) async fn reader<S: Store>(store: Arc<S>, signals: Arc<Signals>, mut rng: StdRng) -> Result<WorkerOutcome, TrialError> {
    signals.start.wait().await;

    let mut count = 0;
    while !signals.is_cancelled() {
        read_once(&*store, &mut rng).await.map_err(TrialError::Read)?;
        count += 1;
        // A store call may complete without suspending; yield so the cancel timer can run.
        tokio::task::yield_now().await;
    }
    Ok(WorkerOutcome { role: Role::Reader, count })
}

pub(crate) async fn writer<S: Store>(
    store: Arc<S>,
    signals: Arc<Signals>,
    lock: Option<Arc<WriterLock>>,
    mut rng: StdRng,
) -> Result<WorkerOutcome, TrialError> {
    signals.start.wait().await;

    let mut count = 0;
    while !signals.is_cancelled() {
        // Payload is built outside the lock so only the store call is serialized.
        let payload = random_payload(&mut rng, PAYLOAD_LEN);
        write_once(&*store, payload, lock.as_deref()).await.map_err(TrialError::Write)?;
        count += 1;
        tokio::task::yield_now().await;
    }
    Ok(WorkerOutcome { role: Role::Writer, count })
}
