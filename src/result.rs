//! Run result types.

use serde::{Deserialize, Serialize};

use crate::measurement::ticks_to_nanos;
use crate::preflight::SystemWarning;
use crate::types::Unit;

/// One reported measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Test case name.
    pub name: String,
    /// Elapsed value in `unit`.
    pub elapsed: u64,
    /// Unit of `elapsed`.
    pub unit: Unit,
}

impl Record {
    /// Elapsed time in nanoseconds, converting ticks with `frequency_hz`.
    ///
    /// `None` for a cycle count without a known frequency.
    pub fn approx_nanos(&self, frequency_hz: Option<u64>) -> Option<u64> {
        match self.unit {
            Unit::Nanoseconds => Some(self.elapsed),
            Unit::Cycles => frequency_hz.and_then(|hz| ticks_to_nanos(self.elapsed, hz)),
        }
    }
}

/// Everything a run produced, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Name of the counter that was read.
    pub counter: String,
    /// Unit shared by all records.
    pub unit: Unit,
    /// Counter frequency in Hz, if known.
    pub frequency_hz: Option<u64>,
    /// Size of both buffers in bytes.
    pub page_size: usize,
    /// Host warnings collected before the run.
    #[serde(default)]
    pub warnings: Vec<SystemWarning>,
    /// One record per test case.
    pub records: Vec<Record>,
}

impl RunReport {
    /// Look up a record by test name.
    pub fn record(&self, name: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.name == name)
    }
}
