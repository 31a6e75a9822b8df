//! Sequential execution of a registry.

use std::hint::black_box;
use std::io::Write;

use tracing::{debug, info};

use crate::buffer::PageBuffer;
use crate::config::Config;
use crate::error::Result;
use crate::measurement::{measure, TimeSource};
use crate::output::write_line;
use crate::preflight::counter_check;
use crate::registry::Registry;
use crate::result::{Record, RunReport};

/// Byte written across the source page before test `index` runs.
///
/// Truncates like `memset`, so the pattern repeats every 256 tests.
pub fn fill_byte(index: usize) -> u8 {
    index as u8
}

/// Owns the time source and both buffers for the length of a run.
///
/// Everything happens on the calling thread, one test at a time.
#[derive(Debug)]
pub struct Runner<S: TimeSource> {
    source: S,
    src: PageBuffer,
    dest: PageBuffer,
    probe_counter: bool,
    enabled: bool,
}

impl<S: TimeSource> Runner<S> {
    /// Allocate both page buffers.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPageSize`](crate::Error::InvalidPageSize) or
    /// [`Error::Allocation`](crate::Error::Allocation).
    pub fn new(source: S, config: &Config) -> Result<Self> {
        Ok(Self {
            source,
            src: PageBuffer::new(config.page_size)?,
            dest: PageBuffer::new(config.page_size)?,
            probe_counter: config.probe_counter,
            enabled: false,
        })
    }

    /// The time source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Size of each buffer.
    pub fn page_size(&self) -> usize {
        self.src.len()
    }

    /// Contents of the destination page after the last test.
    pub fn destination(&self) -> &[u8] {
        &self.dest
    }

    /// Enable the counter, probing it if configured. Runs at most once.
    ///
    /// # Errors
    ///
    /// [`Error::Counter`](crate::Error::Counter) if the counter is unusable.
    pub fn prepare(&mut self) -> Result<()> {
        if self.enabled {
            return Ok(());
        }

        if self.probe_counter {
            let counter = counter_check(&mut self.source)?;
            info!(
                counter = %counter.name,
                unit = %counter.unit,
                frequency_hz = ?counter.frequency_hz,
                probe_elapsed = counter.probe_elapsed,
                "counter ready"
            );
        } else {
            self.source.enable()?;
            info!(counter = self.source.name(), "counter enabled without probe");
        }

        self.enabled = true;
        Ok(())
    }

    /// Run every case in declaration order and write one line per case.
    ///
    /// An empty registry writes nothing and does not touch the counter.
    ///
    /// # Errors
    ///
    /// Counter preparation failures and write failures. A failing write stops
    /// the run after the case that produced it.
    pub fn run_all<W>(&mut self, registry: &Registry, out: &mut W) -> Result<RunReport>
    where
        W: Write + ?Sized,
    {
        let mut records = Vec::with_capacity(registry.len());

        if !registry.is_empty() {
            self.prepare()?;
        }

        let Self {
            source, src, dest, ..
        } = self;
        let source = &*source;
        let unit = source.unit();
        let frequency_hz = source.frequency();

        for (index, case) in registry.iter().enumerate() {
            src.fill(fill_byte(index));

            let func = case.func();
            let dest_page: &mut [u8] = &mut dest[..];
            let src_page: &[u8] = &src[..];

            let measurement = measure(source, || func(black_box(dest_page), black_box(src_page)));
            let elapsed = measurement.elapsed(source);

            let record = Record {
                name: case.name().to_string(),
                elapsed,
                unit,
            };
            write_line(out, &record)?;
            debug!(
                case = case.name(),
                index,
                elapsed,
                approx_ns = ?record.approx_nanos(frequency_hz),
                "measured"
            );
            records.push(record);
        }
        out.flush()?;

        Ok(RunReport {
            counter: source.name().to_string(),
            unit,
            frequency_hz,
            page_size: src.len(),
            warnings: Vec::new(),
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::Ticks;
    use crate::types::Unit;
    use std::cell::Cell;

    /// Advances by 10 on every read, so each bracket reports 10.
    #[derive(Default)]
    struct Stepping {
        now: Cell<u64>,
        enables: Cell<u32>,
    }

    impl TimeSource for Stepping {
        type Point = Ticks;
        fn name(&self) -> &'static str {
            "stepping"
        }
        fn unit(&self) -> Unit {
            Unit::Cycles
        }
        fn enable(&mut self) -> std::result::Result<(), crate::CounterError> {
            self.enables.set(self.enables.get() + 1);
            Ok(())
        }
        fn mark(&self) -> Ticks {
            self.now.set(self.now.get() + 10);
            Ticks(self.now.get())
        }
        fn elapsed(&self, start: Ticks, end: Ticks) -> u64 {
            end.elapsed_since(start)
        }
    }

    fn copy(dest: &mut [u8], src: &[u8]) {
        dest.copy_from_slice(src);
    }

    fn config() -> Config {
        Config {
            page_size: 4096,
            ..Config::default()
        }
    }

    #[test]
    fn test_fill_byte_wraps() {
        assert_eq!(fill_byte(0), 0);
        assert_eq!(fill_byte(255), 255);
        assert_eq!(fill_byte(256), 0);
        assert_eq!(fill_byte(300), 44);
    }

    #[test]
    fn test_source_filled_per_index() {
        let registry = Registry::builder()
            .case("a", copy)
            .case("b", copy)
            .case("c", copy)
            .build()
            .unwrap();
        let mut runner = Runner::new(Stepping::default(), &config()).unwrap();
        runner.run_all(&registry, &mut Vec::new()).unwrap();
        // last case copied the page filled with index 2
        assert!(runner.destination().iter().all(|&b| b == 2));
    }

    #[test]
    fn test_enable_called_once_across_runs() {
        let registry = Registry::builder().case("a", copy).build().unwrap();
        let mut runner = Runner::new(Stepping::default(), &config()).unwrap();
        runner.run_all(&registry, &mut Vec::new()).unwrap();
        runner.run_all(&registry, &mut Vec::new()).unwrap();
        assert_eq!(runner.source().enables.get(), 1);
    }

    #[test]
    fn test_empty_registry_skips_enable() {
        let mut runner = Runner::new(Stepping::default(), &config()).unwrap();
        let mut out = Vec::new();
        let report = runner.run_all(&Registry::empty(), &mut out).unwrap();
        assert!(out.is_empty());
        assert!(report.records.is_empty());
        assert_eq!(runner.source().enables.get(), 0);
    }

    #[test]
    fn test_elapsed_comes_from_one_bracket() {
        let registry = Registry::builder().case("a", copy).build().unwrap();
        let mut runner = Runner::new(
            Stepping::default(),
            &Config {
                probe_counter: false,
                ..config()
            },
        )
        .unwrap();
        let mut out = Vec::new();
        let report = runner.run_all(&registry, &mut out).unwrap();
        assert_eq!(report.records[0].elapsed, 10);
        assert_eq!(String::from_utf8(out).unwrap(), "a: total time = 10.\n");
    }
}
