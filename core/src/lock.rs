//! Application-level writer serialization.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Mutex, MutexGuard};

/// Exclusive lock shared by the writers of one trial.
///
/// The mutex is async because it is held across the awaited insert. Holder
/// accounting runs alongside it so tests can assert that no two writers were
/// ever inside at once.
#[derive(Debug, Default)]
pub struct WriterLock {
    inner: Mutex<()>,
    holders: AtomicUsize,
    acquisitions: AtomicUsize,
    overlaps: AtomicUsize,
}

impl WriterLock {
    pub fn new() -> Self { Self::default() }

    pub async fn lock(&self) -> WriterGuard<'_> {
        let guard = self.inner.lock().await;
        if self.holders.fetch_add(1, Ordering::AcqRel) != 0 {
            self.overlaps.fetch_add(1, Ordering::Relaxed);
        }
        self.acquisitions.fetch_add(1, Ordering::Relaxed);
        WriterGuard { lock: self, _guard: guard }
    }

    /// Times the lock was taken.
    pub fn acquisitions(&self) -> usize { self.acquisitions.load(Ordering::Relaxed) }

    /// Times an acquisition found another holder already inside. Zero unless the lock is broken.
    pub fn overlaps(&self) -> usize { self.overlaps.load(Ordering::Relaxed) }
}

pub struct WriterGuard<'a> {
    lock: &'a WriterLock,
    _guard: MutexGuard<'a, ()>,
}

impl Drop for WriterGuard<'_> {
    // Runs before `_guard` is dropped, so the count falls while the mutex is still held.
    fn drop(&mut self) { self.lock.holders.fetch_sub(1, Ordering::AcqRel); }
}
