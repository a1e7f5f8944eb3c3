//! Table orchestration: one fresh store and one trial per configuration.

use std::future::Future;
use std::io::Write;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use contend_core::{Configuration, Entry, Store, TrialDriver, TrialTotals};
use tracing::{debug, error, warn};

use crate::report::{section_line, TrialReport, HEADING};

/// Runs configuration tables against stores produced by a factory.
pub struct Runner<S, E, F, Fut>
where
    S: Store,
    E: Into<anyhow::Error>,
    F: Fn(&Configuration) -> Fut,
    Fut: Future<Output = Result<S, E>>,
{
    store_factory: F,
    duration: Duration,
    _store: PhantomData<fn() -> Result<S, E>>,
}

impl<S, E, F, Fut> Runner<S, E, F, Fut>
where
    S: Store,
    E: Into<anyhow::Error>,
    F: Fn(&Configuration) -> Fut,
    Fut: Future<Output = Result<S, E>>,
{
    /// `store_factory` opens, creates and seeds a fresh store for one configuration.
    pub fn new(store_factory: F, duration: Duration) -> Self { Self { store_factory, duration, _store: PhantomData } }

    pub fn duration(&self) -> Duration { self.duration }

    /// Runs every trial in `entries` in order, writing one line per entry to `out`.
    ///
    /// Stops at the first failure; nothing is written for the failed configuration.
    pub async fn run<W: Write>(&self, entries: &[Entry], out: &mut W) -> Result<Vec<TrialReport>> {
        writeln!(out, "{}", HEADING)?;

        let mut reports = Vec::new();
        for entry in entries {
            match entry {
                Entry::Section(label) => {
                    writeln!(out)?;
                    writeln!(out, "{}", section_line(label))?;
                }
                Entry::Trial(config) => {
                    let totals = match self.run_one(config).await {
                        Ok(totals) => totals,
                        Err(err) => {
                            error!("run stopped: {:#}", err);
                            return Err(err);
                        }
                    };
                    let report = TrialReport::new(*config, totals, self.duration);
                    writeln!(out, "{}", report)?;
                    reports.push(report);
                }
            }
            out.flush()?;
        }
        Ok(reports)
    }

    /// Opens a store, runs one trial on it and closes it again, also when the trial failed.
    pub async fn run_one(&self, config: &Configuration) -> Result<TrialTotals> {
        debug!(%config, "opening store");
        let store = (self.store_factory)(config).await.map_err(Into::<anyhow::Error>::into).with_context(|| format!("setting up store for [{}]", config))?;
        let store = Arc::new(store);

        let result = TrialDriver::new(*config, self.duration).run(store.clone()).await;

        let store = Arc::into_inner(store).ok_or_else(|| anyhow!("store still shared after trial [{}]", config))?;
        let closed = store.close().await;

        if let Err(e) = &closed {
            warn!(%config, "failed to clean up store: {}", e);
        }
        let totals = result.with_context(|| format!("trial [{}]", config))?;
        closed.with_context(|| format!("closing store for [{}]", config))?;
        Ok(totals)
    }
}
