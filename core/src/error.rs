use thiserror::Error;

/// Failure reported by a store provider. Always fatal to the trial.
#[derive(Error, Debug)]
#[error("Store error: {0}")]
pub struct StoreError(pub Box<dyn std::error::Error + Send + Sync + 'static>);

impl StoreError {
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self { StoreError(Box::new(err)) }
}

#[derive(Error, Debug)]
pub enum TrialError {
    #[error("Trial duration must be greater than zero")]
    InvalidDuration,
    #[error("Read failed: {0}")]
    Read(StoreError),
    #[error("Write failed: {0}")]
    Write(StoreError),
    #[error("Worker task failed: {0}")]
    Worker(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown synchronous level: {0} (expected OFF, NORMAL or FULL)")]
    UnknownSynchronous(String),
}
