//! Configuration for a benchmark run.

use tracing::Level;

use crate::buffer::system_page_size;

/// Configuration options for [`Harness`](crate::Harness).
///
/// There are no command-line flags or environment variables; the binary runs
/// with `Config::default()`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Size and alignment of the source and destination buffers
    /// (default: the OS page size).
    pub page_size: usize,

    /// Probe the counter for liveness after enabling it (default: true).
    ///
    /// When false the counter is only enabled, and a stalled counter shows up
    /// as zeros in the report.
    pub probe_counter: bool,

    /// Run host configuration checks before the first test (default: true).
    pub system_checks: bool,

    /// Maximum level of diagnostics written to stderr (default: INFO).
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: system_page_size(),
            probe_counter: true,
            system_checks: true,
            log_level: Level::INFO,
        }
    }
}
