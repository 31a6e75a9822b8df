//! Checks run once before the first measurement.
//!
//! - **Counter**: enable the time source and verify that it advances
//! - **System**: frequency scaling, virtualization and PMU access on Linux

mod counter;
mod system;

pub use counter::{counter_check, CounterInfo, PROBE_ROUNDS};
pub use system::{system_check, SystemWarning};
