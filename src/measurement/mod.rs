//! Time sources and the measurement bracket.
//!
//! This module provides:
//! - The [`TimeSource`] capability set: enable, mark-start, mark-stop, elapsed
//! - One source per timing model, compiled in by target and features
//! - [`ActiveSource`], the source the build was configured for
//!
//! # Timing models
//!
//! - **aarch64**: `cntvct_el0`, or `pmccntr_el0` with `--features aarch64-pmu`
//! - **octeon**: `rdhwr $31` (mips64, needs a nightly toolchain for inline asm)
//! - **linux**: `clock_gettime(CLOCK_MONOTONIC)`, reports nanoseconds
//! - **x86**: `rdtsc`, stored as two 32-bit halves
//!
//! Selection happens at build time, so the runner is monomorphized over one
//! source and nothing is dispatched inside the measured window:
//!
//! ```bash
//! cargo run --release --features linux-timing
//! ```

mod monotonic;
pub mod point;

#[cfg(target_arch = "aarch64")]
pub mod arm;

#[cfg(all(target_arch = "mips64", timing_model = "octeon"))]
pub mod octeon;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod tsc;

use std::fmt;

use crate::error::CounterError;
use crate::types::Unit;

pub use monotonic::MonotonicClock;
pub use point::{combine, SplitTicks, Ticks, WallPoint};

/// The time source selected by the build configuration.
#[cfg(timing_model = "aarch64")]
pub type ActiveSource = arm::ArmCounter;

/// The time source selected by the build configuration.
#[cfg(timing_model = "octeon")]
pub type ActiveSource = octeon::CvmCount;

/// The time source selected by the build configuration.
#[cfg(timing_model = "linux")]
pub type ActiveSource = MonotonicClock;

/// The time source selected by the build configuration.
#[cfg(timing_model = "x86")]
pub type ActiveSource = tsc::SplitTsc;

/// A strategy for capturing instants and turning two of them into a duration.
///
/// `mark_start` must run immediately before the timed operation and
/// `mark_stop` immediately after it. `elapsed` is pure.
pub trait TimeSource {
    /// Raw instant captured by [`TimeSource::mark`].
    type Point: Copy + fmt::Debug;

    /// Short name of the underlying counter, for diagnostics.
    fn name(&self) -> &'static str;

    /// Unit of values returned by [`TimeSource::elapsed`].
    fn unit(&self) -> Unit;

    /// Prepare the counter for reading. Called once before the first mark.
    fn enable(&mut self) -> Result<(), CounterError> {
        Ok(())
    }

    /// Capture the current instant.
    fn mark(&self) -> Self::Point;

    /// Capture the instant that opens a measurement.
    #[inline(always)]
    fn mark_start(&self) -> Self::Point {
        self.mark()
    }

    /// Capture the instant that closes a measurement.
    #[inline(always)]
    fn mark_stop(&self) -> Self::Point {
        self.mark()
    }

    /// Duration between two points, in [`TimeSource::unit`].
    fn elapsed(&self, start: Self::Point, end: Self::Point) -> u64;

    /// Nominal or OS-reported counter frequency in Hz, where one is known.
    fn frequency(&self) -> Option<u64> {
        None
    }
}

/// A start/end pair captured around one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement<P> {
    /// Instant before the call.
    pub start: P,
    /// Instant after the call.
    pub end: P,
}

impl<P: Copy + fmt::Debug> Measurement<P> {
    /// Elapsed value according to `source`.
    pub fn elapsed<S>(&self, source: &S) -> u64
    where
        S: TimeSource<Point = P>,
    {
        source.elapsed(self.start, self.end)
    }
}

/// Bracket a single call of `f` with `mark_start`/`mark_stop`.
#[inline(always)]
pub fn measure<S, F>(source: &S, f: F) -> Measurement<S::Point>
where
    S: TimeSource,
    F: FnOnce(),
{
    let start = source.mark_start();
    f();
    let end = source.mark_stop();
    Measurement { start, end }
}

/// Convert ticks at `frequency_hz` to nanoseconds.
///
/// Returns `None` for a zero frequency.
pub fn ticks_to_nanos(ticks: u64, frequency_hz: u64) -> Option<u64> {
    if frequency_hz == 0 {
        return None;
    }
    let nanos = ticks as u128 * 1_000_000_000 / frequency_hz as u128;
    Some(u64::try_from(nanos).unwrap_or(u64::MAX))
}
