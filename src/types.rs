//! Shared value types: measurement units and timing models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unit of an elapsed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Raw counter ticks. On most targets these are CPU cycles; the aarch64
    /// virtual counter ticks at `cntfrq_el0` instead.
    Cycles,
    /// Wall-clock nanoseconds.
    Nanoseconds,
}

impl Unit {
    /// Text appended to the elapsed value in a report line.
    ///
    /// Cycle counts are printed as a bare number terminated by `.`.
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Cycles => ".",
            Unit::Nanoseconds => " nanoseconds",
        }
    }

    /// Plain name of the unit.
    pub fn label(self) -> &'static str {
        match self {
            Unit::Cycles => "cycles",
            Unit::Nanoseconds => "nanoseconds",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The timing models a build can be configured with.
///
/// Exactly one is compiled in; see [`TimingModel::ACTIVE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingModel {
    /// aarch64 `cntvct_el0`, or `pmccntr_el0` with the `aarch64-pmu` feature.
    Aarch64,
    /// Cavium Octeon CvmCount read through `rdhwr $31`.
    Octeon,
    /// `CLOCK_MONOTONIC` wall clock.
    Linux,
    /// x86 `rdtsc` read as two 32-bit halves.
    X86,
}

impl TimingModel {
    /// The model selected when this crate was built.
    #[cfg(timing_model = "aarch64")]
    pub const ACTIVE: TimingModel = TimingModel::Aarch64;
    /// The model selected when this crate was built.
    #[cfg(timing_model = "octeon")]
    pub const ACTIVE: TimingModel = TimingModel::Octeon;
    /// The model selected when this crate was built.
    #[cfg(timing_model = "linux")]
    pub const ACTIVE: TimingModel = TimingModel::Linux;
    /// The model selected when this crate was built.
    #[cfg(timing_model = "x86")]
    pub const ACTIVE: TimingModel = TimingModel::X86;

    /// Unit of elapsed values produced under this model.
    pub fn unit(self) -> Unit {
        match self {
            TimingModel::Linux => Unit::Nanoseconds,
            TimingModel::Aarch64 | TimingModel::Octeon | TimingModel::X86 => Unit::Cycles,
        }
    }

    /// Cargo feature that selects this model.
    pub fn feature(self) -> &'static str {
        match self {
            TimingModel::Aarch64 => "aarch64-timing",
            TimingModel::Octeon => "octeon-timing",
            TimingModel::Linux => "linux-timing",
            TimingModel::X86 => "x86-timing",
        }
    }
}

impl fmt::Display for TimingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimingModel::Aarch64 => "aarch64",
            TimingModel::Octeon => "octeon",
            TimingModel::Linux => "linux",
            TimingModel::X86 => "x86",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_suffixes() {
        assert_eq!(Unit::Cycles.suffix(), ".");
        assert_eq!(Unit::Nanoseconds.suffix(), " nanoseconds");
    }

    #[test]
    fn test_only_linux_is_wall_clock() {
        assert_eq!(TimingModel::Linux.unit(), Unit::Nanoseconds);
        for model in [TimingModel::Aarch64, TimingModel::Octeon, TimingModel::X86] {
            assert_eq!(model.unit(), Unit::Cycles, "{model}");
        }
    }

    #[test]
    fn test_active_model_matches_target() {
        #[cfg(all(target_arch = "x86_64", not(feature = "linux-timing")))]
        assert_eq!(TimingModel::ACTIVE, TimingModel::X86);

        #[cfg(feature = "linux-timing")]
        assert_eq!(TimingModel::ACTIVE, TimingModel::Linux);

        #[cfg(feature = "aarch64-timing")]
        assert_eq!(TimingModel::ACTIVE, TimingModel::Aarch64);
    }
}
