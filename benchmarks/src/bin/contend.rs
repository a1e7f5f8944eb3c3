use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use contend_benchmarks::{default_table, Runner};
use contend_core::Configuration;
use contend_storage_sqlite::{SqliteStore, StoreOptions};
use tracing_subscriber::EnvFilter;

/// Measure concurrent SQLite read/write throughput across journal, sync, pool and locking settings.
#[derive(Parser, Debug)]
#[command(name = "contend")]
struct Args {
    /// Per trial duration in seconds.
    #[arg(short = 't', long = "duration", default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    duration: u64,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries only results; diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let runner = Runner::new(|config: &Configuration| SqliteStore::open(StoreOptions::from(config)), Duration::from_secs(args.duration));

    // The first failure ends the process with a non-zero status and the error chain on stderr.
    runner.run(&default_table(), &mut std::io::stdout()).await?;
    Ok(())
}
