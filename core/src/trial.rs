//! The timed trial: synchronized start, time-boxed run, one-shot aggregation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::Configuration;
use crate::error::TrialError;
use crate::lock::WriterLock;
use crate::storage::Store;
use crate::workload::{self, Role, Signals, WorkerOutcome};

/// Summed worker outcomes of one trial.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrialTotals {
    pub reads: u64,
    pub writes: u64,
    /// Workers that ran and reported
    pub workers: usize,
    /// Wall time from release until the last worker joined
    pub elapsed: Duration,
}

/// Per-second throughput, rounded down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rates {
    pub read: u64,
    pub write: u64,
    pub total: u64,
}

impl TrialTotals {
    /// Rates over the nominal trial duration in whole seconds (at least one).
    pub fn rates(&self, duration: Duration) -> Rates {
        let secs = duration.as_secs().max(1);
        Rates { read: self.reads / secs, write: self.writes / secs, total: (self.reads + self.writes) / secs }
    }
}

/// Sum outcomes per role. Order of the outcomes does not matter.
pub fn aggregate(outcomes: impl IntoIterator<Item = WorkerOutcome>) -> TrialTotals {
    outcomes.into_iter().fold(TrialTotals::default(), |mut totals, outcome| {
        match outcome.role {
            Role::Reader => totals.reads += outcome.count,
            Role::Writer => totals.writes += outcome.count,
        }
        totals.workers += 1;
        totals
    })
}

/// Runs exactly one trial for one configuration.
pub struct TrialDriver {
    config: Configuration,
    duration: Duration,
    writer_lock: Option<Arc<WriterLock>>,
}

impl TrialDriver {
    pub fn new(config: Configuration, duration: Duration) -> Self {
        let writer_lock = config.mutex.then(|| Arc::new(WriterLock::new()));
        Self { config, duration, writer_lock }
    }

    pub fn config(&self) -> &Configuration { &self.config }

    /// The lock writers serialize through, present only when the configuration asks for it.
    pub fn writer_lock(&self) -> Option<&Arc<WriterLock>> { self.writer_lock.as_ref() }

    /// Launch every worker, release them together, stop them after the duration and sum their counts.
    ///
    /// The first worker error aborts the remaining workers and is returned as is.
    pub async fn run<S: Store>(&self, store: Arc<S>) -> Result<TrialTotals, TrialError> {
        if self.duration.is_zero() {
            return Err(TrialError::InvalidDuration);
        }

        let workers = self.config.worker_count();
        let signals = Arc::new(Signals::new(workers));
        let mut set = JoinSet::new();

        for _ in 0..self.config.readers {
            set.spawn(workload::reader(store.clone(), signals.clone(), StdRng::from_entropy()));
        }
        for _ in 0..self.config.writers {
            set.spawn(workload::writer(store.clone(), signals.clone(), self.writer_lock.clone(), StdRng::from_entropy()));
        }
        drop(store);
        debug!(readers = self.config.readers, writers = self.config.writers, "workers spawned, waiting at start barrier");

        // The driver is the last party; this returns once every worker is parked.
        signals.start.wait().await;
        let started = Instant::now();

        let timer = {
            let signals = signals.clone();
            let duration = self.duration;
            tokio::spawn(async move {
                tokio::time::sleep(duration).await;
                signals.cancel();
            })
        };

        let mut outcomes = Vec::with_capacity(workers);
        while let Some(joined) = set.join_next().await {
            let result = joined.map_err(|e| TrialError::Worker(e.to_string())).and_then(|r| r);
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => {
                    warn!("trial aborted: {}", err);
                    signals.cancel();
                    timer.abort();
                    set.shutdown().await;
                    return Err(err);
                }
            }
        }
        timer.abort();

        let totals = TrialTotals { elapsed: started.elapsed(), ..aggregate(outcomes) };
        info!(config = %self.config, reads = totals.reads, writes = totals.writes, elapsed_ms = totals.elapsed.as_millis() as u64, "trial finished");
        Ok(totals)
    }
}

/// One-call form of [`TrialDriver::run`].
pub async fn run_trial<S: Store>(config: &Configuration, store: Arc<S>, duration: Duration) -> Result<TrialTotals, TrialError> {
    TrialDriver::new(*config, duration).run(store).await
}
