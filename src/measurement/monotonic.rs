//! `CLOCK_MONOTONIC` wall-clock time source.
//!
//! The only model that is not cycle based. It is immune to counter wraparound
//! and privilege setup, at the cost of a clock call inside the measured window
//! and a coarser resolution.

use crate::error::CounterError;
use crate::types::Unit;

use super::point::WallPoint;
use super::TimeSource;

/// Wall-clock time source reporting nanoseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock {
    _private: (),
}

impl MonotonicClock {
    /// Create the clock source.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimeSource for MonotonicClock {
    type Point = WallPoint;

    fn name(&self) -> &'static str {
        "clock_gettime(CLOCK_MONOTONIC)"
    }

    fn unit(&self) -> Unit {
        Unit::Nanoseconds
    }

    fn enable(&mut self) -> Result<(), CounterError> {
        read_monotonic().map(|_| ())
    }

    #[inline(always)]
    fn mark(&self) -> WallPoint {
        // Failures were surfaced by `enable`.
        read_monotonic().unwrap_or_default()
    }

    #[inline(always)]
    fn elapsed(&self, start: WallPoint, end: WallPoint) -> u64 {
        end.nanos_since(start)
    }

    fn frequency(&self) -> Option<u64> {
        Some(1_000_000_000)
    }
}

#[cfg(unix)]
#[inline(always)]
fn read_monotonic() -> Result<WallPoint, CounterError> {
    // SAFETY: `timespec` is plain old data; all-zero is a valid value.
    let mut ts: libc::timespec = unsafe { std::mem::zeroed() };
    // SAFETY: `ts` is a valid, exclusively borrowed timespec.
    let rc = unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts) };
    if rc != 0 {
        return Err(CounterError::Clock {
            call: "clock_gettime(CLOCK_MONOTONIC)",
            errno: std::io::Error::last_os_error().raw_os_error().unwrap_or(0),
        });
    }
    Ok(WallPoint::new(ts.tv_sec as i64, ts.tv_nsec as i64))
}

/// Fallback for targets without `clock_gettime`, anchored at the first read.
#[cfg(not(unix))]
#[inline(always)]
fn read_monotonic() -> Result<WallPoint, CounterError> {
    use std::sync::OnceLock;
    use std::time::Instant;

    static ORIGIN: OnceLock<Instant> = OnceLock::new();

    let since = ORIGIN.get_or_init(Instant::now).elapsed();
    Ok(WallPoint::new(since.as_secs() as i64, since.subsec_nanos() as i64))
}
