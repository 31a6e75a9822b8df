//! # page-bench
//!
//! Time page-sized memory routines with the cheapest counter the target offers.
//!
//! Each registered routine runs exactly once, bracketed by two counter reads,
//! and produces one line on stdout:
//!
//! ```text
//! memcpy: total time = 812.
//! byte_loop: total time = 4410.
//! ```
//!
//! Cycle-based models end the number with `.`; the monotonic-clock model
//! prints ` nanoseconds` instead.
//!
//! ## Choosing a counter
//!
//! The counter is fixed at build time through Cargo features, so nothing is
//! dispatched inside the measured window:
//!
//! | feature          | counter                          | unit        |
//! |------------------|----------------------------------|-------------|
//! | `aarch64-timing` | `cntvct_el0`                     | ticks       |
//! | `aarch64-pmu`    | `pmccntr_el0` (privileged)       | cycles      |
//! | `octeon-timing`  | `rdhwr $31`                      | cycles      |
//! | `linux-timing`   | `clock_gettime(CLOCK_MONOTONIC)` | nanoseconds |
//! | `x86-timing`     | `rdtsc`                          | cycles      |
//!
//! With no feature the target architecture decides (`aarch64`, `x86`, or the
//! monotonic clock elsewhere).
//!
//! ## ⚠️ Privileged counters
//!
//! `aarch64-pmu` writes `PMCR_EL0` and `PMCNTENSET_EL0` from user space. The
//! kernel must have granted EL0 access first; otherwise the process is killed
//! by SIGILL on the first write. A counter that enables but never counts is
//! caught by the startup probe and reported as [`CounterError::Stalled`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use page_bench::{page_cases, Harness, Registry, TestCase};
//!
//! fn copy(dest: &mut [u8], src: &[u8]) {
//!     dest.copy_from_slice(src);
//! }
//!
//! static CASES: &[TestCase] = page_cases![copy];
//!
//! let registry = Registry::from_cases(CASES)?;
//! let report = Harness::new().run(&registry, &mut std::io::stdout().lock())?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(timing_model = "octeon", feature(asm_experimental_arch))]

// Core modules
mod config;
mod error;
mod harness;
mod registry;
mod result;
mod runner;
mod types;

// Functional modules
pub mod buffer;
pub mod measurement;
pub mod output;
pub mod preflight;
pub mod routines;

// Re-exports for public API
pub use buffer::{system_page_size, PageBuffer};
pub use config::Config;
pub use error::{CounterError, Error, Result};
pub use harness::Harness;
pub use measurement::{measure, ActiveSource, Measurement, TimeSource};
pub use registry::{PageFn, Registry, RegistryBuilder, TestCase};
pub use result::{Record, RunReport};
pub use runner::{fill_byte, Runner};
pub use types::{TimingModel, Unit};
