//! aarch64 counters: the generic-timer virtual count and the PMU cycle counter.
//!
//! The PMU variant needs `PMCR_EL0`/`PMCNTENSET_EL0` writes from EL0. Those
//! only succeed when the kernel has granted user access to the PMU; otherwise
//! the first `msr` traps and the process dies with SIGILL. Nothing in user
//! space can recover from that, so the requirement is on the host setup.

use std::sync::atomic::{compiler_fence, Ordering};

use crate::error::CounterError;
use crate::types::Unit;

use super::point::Ticks;
use super::TimeSource;

/// Nominal PMU clock used for human-readable conversion.
pub const PMU_NOMINAL_HZ: u64 = 2_000_000_000;

/// Which aarch64 register backs the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterRegister {
    /// `cntvct_el0`, fixed frequency, readable from EL0 on every OS we target.
    Virtual,
    /// `pmccntr_el0`, true CPU cycles, privileged.
    Pmu,
}

/// Time source reading one of the aarch64 counters.
#[derive(Debug, Clone, Copy)]
pub struct ArmCounter {
    register: CounterRegister,
}

impl ArmCounter {
    /// Use the given register.
    pub fn new(register: CounterRegister) -> Self {
        Self { register }
    }

    /// The register this source reads.
    pub fn register(&self) -> CounterRegister {
        self.register
    }
}

impl Default for ArmCounter {
    fn default() -> Self {
        if cfg!(aarch64_pmu) {
            Self::new(CounterRegister::Pmu)
        } else {
            Self::new(CounterRegister::Virtual)
        }
    }
}

impl TimeSource for ArmCounter {
    type Point = Ticks;

    fn name(&self) -> &'static str {
        match self.register {
            CounterRegister::Virtual => "cntvct_el0",
            CounterRegister::Pmu => "pmccntr_el0",
        }
    }

    fn unit(&self) -> Unit {
        Unit::Cycles
    }

    fn enable(&mut self) -> Result<(), CounterError> {
        if self.register == CounterRegister::Pmu {
            // SAFETY: only touches PMU control registers; traps if EL0 access
            // was not granted (see module docs).
            unsafe { enable_pmu_cycle_counter() };
        }
        Ok(())
    }

    #[inline(always)]
    fn mark(&self) -> Ticks {
        match self.register {
            CounterRegister::Virtual => Ticks(read_cntvct()),
            CounterRegister::Pmu => Ticks(read_pmccntr()),
        }
    }

    #[inline(always)]
    fn elapsed(&self, start: Ticks, end: Ticks) -> u64 {
        end.elapsed_since(start)
    }

    fn frequency(&self) -> Option<u64> {
        match self.register {
            CounterRegister::Virtual => Some(read_cntfrq()),
            CounterRegister::Pmu => Some(PMU_NOMINAL_HZ),
        }
    }
}

/// Read the virtual counter.
#[inline(always)]
pub fn read_cntvct() -> u64 {
    compiler_fence(Ordering::SeqCst);
    let ticks: u64;
    // SAFETY: cntvct_el0 is readable from EL0 and has no side effects.
    unsafe {
        std::arch::asm!(
            "isb",
            "mrs {}, cntvct_el0",
            out(reg) ticks,
            options(nostack, nomem),
        );
    }
    compiler_fence(Ordering::SeqCst);
    ticks
}

/// Read the PMU cycle counter.
#[inline(always)]
pub fn read_pmccntr() -> u64 {
    compiler_fence(Ordering::SeqCst);
    let cycles: u64;
    // SAFETY: read-only register access; requires EL0 PMU access (module docs).
    unsafe {
        std::arch::asm!(
            "isb",
            "mrs {}, pmccntr_el0",
            out(reg) cycles,
            options(nostack, nomem),
        );
    }
    compiler_fence(Ordering::SeqCst);
    cycles
}

/// Frequency of the virtual counter in Hz.
pub fn read_cntfrq() -> u64 {
    let hz: u64;
    // SAFETY: cntfrq_el0 is readable from EL0 and has no side effects.
    unsafe {
        std::arch::asm!("mrs {}, cntfrq_el0", out(reg) hz, options(nostack, nomem));
    }
    hz
}

/// Set PMCR_EL0.E and PMCNTENSET_EL0.C so `pmccntr_el0` counts.
unsafe fn enable_pmu_cycle_counter() {
    let mut pmcr: u64;
    std::arch::asm!("mrs {}, pmcr_el0", out(reg) pmcr, options(nostack, nomem));
    pmcr |= 1 << 0;
    std::arch::asm!("msr pmcr_el0, {}", in(reg) pmcr, options(nostack, nomem));

    let mut cntenset: u64;
    std::arch::asm!("mrs {}, pmcntenset_el0", out(reg) cntenset, options(nostack, nomem));
    cntenset |= 1 << 31;
    std::arch::asm!("msr pmcntenset_el0, {}", in(reg) cntenset, options(nostack, nomem));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_counter_monotonic() {
        let source = ArmCounter::new(CounterRegister::Virtual);
        let a = source.mark();
        let b = source.mark();
        assert!(b >= a, "a={:?} b={:?}", a, b);
    }

    #[test]
    fn test_virtual_counter_frequency() {
        let hz = ArmCounter::new(CounterRegister::Virtual)
            .frequency()
            .unwrap_or(0);
        // 1 MHz .. 10 GHz covers every SoC we know of
        assert!(hz > 1_000_000 && hz < 10_000_000_000, "cntfrq_el0 = {}", hz);
    }

    #[test]
    fn test_pmu_reports_nominal_frequency() {
        let source = ArmCounter::new(CounterRegister::Pmu);
        assert_eq!(source.frequency(), Some(PMU_NOMINAL_HZ));
        assert_eq!(source.name(), "pmccntr_el0");
    }
}
