//! Main `Harness` entry point and builder.

use std::io::Write;

use tracing::{info, Level};

use crate::config::Config;
use crate::error::Result;
use crate::measurement::{ActiveSource, TimeSource};
use crate::output::format_warnings;
use crate::preflight::system_check;
use crate::registry::Registry;
use crate::result::RunReport;
use crate::runner::Runner;
use crate::types::TimingModel;

/// Runs a registry once against the build's time source.
///
/// # Example
///
/// ```ignore
/// use page_bench::{Harness, Registry};
///
/// let registry = Registry::builder()
///     .case("copy", |dest, src| dest.copy_from_slice(src))
///     .build()?;
///
/// let report = Harness::new()
///     .page_size(4096)
///     .run(&registry, &mut std::io::stdout().lock())?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Harness {
    config: Config,
}

impl Harness {
    /// Create with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Set the buffer size and alignment in bytes.
    pub fn page_size(mut self, bytes: usize) -> Self {
        self.config.page_size = bytes;
        self
    }

    /// Enable or disable the counter liveness probe.
    pub fn probe_counter(mut self, enabled: bool) -> Self {
        self.config.probe_counter = enabled;
        self
    }

    /// Enable or disable host configuration checks.
    pub fn system_checks(mut self, enabled: bool) -> Self {
        self.config.system_checks = enabled;
        self
    }

    /// Set the diagnostic log level.
    pub fn log_level(mut self, level: Level) -> Self {
        self.config.log_level = level;
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run `registry` with the time source this crate was built for.
    ///
    /// # Errors
    ///
    /// See [`Harness::run_with`].
    pub fn run<W>(&self, registry: &Registry, out: &mut W) -> Result<RunReport>
    where
        W: Write + ?Sized,
    {
        info!(
            model = %TimingModel::ACTIVE,
            feature = TimingModel::ACTIVE.feature(),
            unit = %TimingModel::ACTIVE.unit(),
            "timing model"
        );
        self.run_with(ActiveSource::default(), registry, out)
    }

    /// Run `registry` with an explicit time source.
    ///
    /// Host warnings go to stderr and into the report. Buffers are
    /// allocated before the counter is touched.
    ///
    /// # Errors
    ///
    /// Buffer allocation, counter preparation, or writing to `out`.
    pub fn run_with<S, W>(&self, source: S, registry: &Registry, out: &mut W) -> Result<RunReport>
    where
        S: TimeSource,
        W: Write + ?Sized,
    {
        let warnings = if self.config.system_checks {
            system_check()
        } else {
            Vec::new()
        };
        if !warnings.is_empty() {
            eprint!("{}", format_warnings(&warnings));
        }

        let mut runner = Runner::new(source, &self.config)?;
        info!(
            page_size = runner.page_size(),
            cases = registry.len(),
            "buffers allocated"
        );

        let mut report = runner.run_all(registry, out)?;
        report.warnings = warnings;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_setters() {
        let harness = Harness::new()
            .page_size(8192)
            .probe_counter(false)
            .system_checks(false)
            .log_level(Level::DEBUG);

        let config = harness.config();
        assert_eq!(config.page_size, 8192);
        assert!(!config.probe_counter);
        assert!(!config.system_checks);
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn test_invalid_page_size_fails_before_output() {
        let registry = Registry::builder()
            .case("noop", |_, _| {})
            .build()
            .unwrap();
        let mut out = Vec::new();
        let err = Harness::new()
            .system_checks(false)
            .page_size(1000)
            .run(&registry, &mut out)
            .unwrap_err();
        assert!(matches!(err, crate::Error::InvalidPageSize { size: 1000 }));
        assert!(out.is_empty());
    }
}
