//! Error types for the benchmark harness.

use thiserror::Error;

/// Convenience alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the harness before or while running the registry.
#[derive(Debug, Error)]
pub enum Error {
    /// The page-aligned buffer allocation returned null.
    #[error("failed to allocate {size}-byte buffer aligned to {align} bytes")]
    Allocation {
        /// Requested size in bytes.
        size: usize,
        /// Requested alignment in bytes.
        align: usize,
    },

    /// The configured page size cannot describe an aligned allocation.
    #[error("invalid page size {size}: must be a non-zero power of two")]
    InvalidPageSize {
        /// The rejected size.
        size: usize,
    },

    /// The active time source cannot produce usable readings.
    #[error("time source unavailable: {0}")]
    Counter(#[from] CounterError),

    /// Two test cases were registered under the same name.
    #[error("test case `{name}` registered more than once")]
    DuplicateCase {
        /// The repeated name.
        name: &'static str,
    },

    /// A test case was registered with an empty name.
    #[error("test case at position {index} has an empty name")]
    EmptyCaseName {
        /// Declaration index of the offending case.
        index: usize,
    },

    /// Writing a report line failed.
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    /// Rendering the JSON report failed.
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a time source is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CounterError {
    /// The counter did not advance across the probe's busy loop.
    ///
    /// Typical for a PMU cycle counter that was never enabled for EL0.
    #[error("{source_name} did not advance after {rounds} probe rounds")]
    Stalled {
        /// Name of the time source.
        source_name: &'static str,
        /// Probe rounds attempted.
        rounds: usize,
    },

    /// The OS clock call reported a failure.
    #[error("{call} failed with errno {errno}")]
    Clock {
        /// The failing call.
        call: &'static str,
        /// Raw OS error code.
        errno: i32,
    },
}
