//! Startup probe for the active time source.
//!
//! A counter that was never enabled (for instance a PMU cycle counter the
//! kernel did not switch on) reads a constant value. Probing once before the
//! first test turns that into an error instead of a report full of zeros.

use std::hint::black_box;

use serde::{Deserialize, Serialize};

use crate::error::CounterError;
use crate::measurement::{measure, TimeSource};
use crate::types::Unit;

/// Maximum probe rounds before declaring the counter stalled.
pub const PROBE_ROUNDS: usize = 64;

/// Busy-loop iterations per probe round.
const PROBE_SPIN: u64 = 10_000;

/// What the probe learned about the counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterInfo {
    /// Counter name.
    pub name: String,
    /// Unit of elapsed values.
    pub unit: Unit,
    /// Frequency in Hz, if known.
    pub frequency_hz: Option<u64>,
    /// Elapsed value observed across one probe round.
    pub probe_elapsed: u64,
}

/// Enable `source` and confirm that it advances.
///
/// # Errors
///
/// Whatever `enable` reports, or [`CounterError::Stalled`] if no round saw a
/// non-zero elapsed value.
pub fn counter_check<S: TimeSource>(source: &mut S) -> Result<CounterInfo, CounterError> {
    source.enable()?;
    let source = &*source;

    for _ in 0..PROBE_ROUNDS {
        let elapsed = measure(source, || {
            black_box(spin(PROBE_SPIN));
        })
        .elapsed(source);

        if elapsed > 0 {
            return Ok(CounterInfo {
                name: source.name().to_string(),
                unit: source.unit(),
                frequency_hz: source.frequency(),
                probe_elapsed: elapsed,
            });
        }
    }

    Err(CounterError::Stalled {
        source_name: source.name(),
        rounds: PROBE_ROUNDS,
    })
}

fn spin(iterations: u64) -> u64 {
    let mut acc = 1u64;
    for _ in 0..iterations {
        acc = black_box(acc.wrapping_mul(6364136223846793005).wrapping_add(1));
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::{ActiveSource, Ticks};
    use std::cell::Cell;

    /// Counter that never moves.
    struct Frozen;

    impl TimeSource for Frozen {
        type Point = Ticks;
        fn name(&self) -> &'static str {
            "frozen"
        }
        fn unit(&self) -> Unit {
            Unit::Cycles
        }
        fn mark(&self) -> Ticks {
            Ticks(42)
        }
        fn elapsed(&self, start: Ticks, end: Ticks) -> u64 {
            end.elapsed_since(start)
        }
    }

    /// Counter whose enable step fails.
    struct Broken;

    impl TimeSource for Broken {
        type Point = Ticks;
        fn name(&self) -> &'static str {
            "broken"
        }
        fn unit(&self) -> Unit {
            Unit::Nanoseconds
        }
        fn enable(&mut self) -> Result<(), CounterError> {
            Err(CounterError::Clock {
                call: "clock_gettime(CLOCK_MONOTONIC)",
                errno: 22,
            })
        }
        fn mark(&self) -> Ticks {
            Ticks(0)
        }
        fn elapsed(&self, start: Ticks, end: Ticks) -> u64 {
            end.elapsed_since(start)
        }
    }

    /// Counter that only starts moving after a few reads.
    struct SlowStart {
        reads: Cell<u64>,
    }

    impl TimeSource for SlowStart {
        type Point = Ticks;
        fn name(&self) -> &'static str {
            "slow"
        }
        fn unit(&self) -> Unit {
            Unit::Cycles
        }
        fn mark(&self) -> Ticks {
            let n = self.reads.get() + 1;
            self.reads.set(n);
            Ticks(n.saturating_sub(6))
        }
        fn elapsed(&self, start: Ticks, end: Ticks) -> u64 {
            end.elapsed_since(start)
        }
    }

    #[test]
    fn test_active_source_passes() {
        let mut source = ActiveSource::default();
        let info = counter_check(&mut source).expect("active counter should advance");
        assert!(info.probe_elapsed > 0);
        assert_eq!(info.unit, crate::TimingModel::ACTIVE.unit());
    }

    #[test]
    fn test_frozen_counter_is_stalled() {
        let err = counter_check(&mut Frozen).unwrap_err();
        assert_eq!(
            err,
            CounterError::Stalled {
                source_name: "frozen",
                rounds: PROBE_ROUNDS
            }
        );
    }

    #[test]
    fn test_enable_failure_propagates() {
        let err = counter_check(&mut Broken).unwrap_err();
        assert!(matches!(err, CounterError::Clock { errno: 22, .. }));
    }

    #[test]
    fn test_late_counter_is_accepted() {
        let mut source = SlowStart { reads: Cell::new(0) };
        let info = counter_check(&mut source).unwrap();
        assert_eq!(info.name, "slow");
        assert_eq!(info.probe_elapsed, 1);
    }
}
