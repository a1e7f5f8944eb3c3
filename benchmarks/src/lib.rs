//! Contention benchmark suite.
//!
//! Runs a table of trial configurations, each against a freshly created
//! store, and prints read/write throughput per configuration.

pub mod config;
pub mod report;
pub mod runner;

pub use config::default_table;
pub use report::TrialReport;
pub use runner::Runner;
