use async_trait::async_trait;

use crate::error::StoreError;

/// An open, seeded store shared by every worker of one trial.
///
/// Implementations must tolerate concurrent calls from many tasks; any
/// serialization beyond that is the engine's business (or the optional
/// writer lock's).
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Number of rows seeded before the trial; reads target `[0, seed_count)`.
    fn seed_count(&self) -> u64;

    /// Point lookup by identity. Every column of every returned row is decoded.
    /// Returns the number of rows seen.
    async fn point_read(&self, id: i64) -> Result<usize, StoreError>;

    /// Insert one row; the identity is assigned by the store.
    async fn insert(&self, payload: String) -> Result<(), StoreError>;

    /// Release connections and remove any backing artifacts.
    async fn close(self) -> Result<(), StoreError>
    where Self: Sized;
}
