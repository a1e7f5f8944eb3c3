//! Result formatting for trial runs.

use std::fmt;
use std::time::Duration;

use contend_core::{Configuration, Rates, TrialTotals};

/// First line of every run.
pub const HEADING: &str = "Results are in reads/writes per second";

/// Width the configuration description is padded to, so rates line up.
const DESCRIPTION_WIDTH: usize = 57;

/// One executed configuration and its throughput.
#[derive(Debug, Clone)]
pub struct TrialReport {
    pub config: Configuration,
    pub totals: TrialTotals,
    pub rates: Rates,
}

impl TrialReport {
    pub fn new(config: Configuration, totals: TrialTotals, duration: Duration) -> Self {
        Self { config, totals, rates: totals.rates(duration) }
    }
}

impl fmt::Display for TrialReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<width$} |   read:{:>7}, write:{:>7}, total:{:>7}",
            self.config,
            self.rates.read,
            self.rates.write,
            self.rates.total,
            width = DESCRIPTION_WIDTH
        )
    }
}

/// Heading line for a table section.
pub fn section_line(label: &str) -> String { format!("=={}==", label) }
