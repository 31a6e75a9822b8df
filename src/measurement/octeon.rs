//! Cavium Octeon CvmCount, read through hardware register `$31`.

use std::sync::atomic::{compiler_fence, Ordering};

use crate::types::Unit;

use super::point::Ticks;
use super::TimeSource;

/// Time source backed by the Octeon cycle counter. Always enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct CvmCount {
    _private: (),
}

impl CvmCount {
    /// Create the source.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimeSource for CvmCount {
    type Point = Ticks;

    fn name(&self) -> &'static str {
        "rdhwr $31"
    }

    fn unit(&self) -> Unit {
        Unit::Cycles
    }

    #[inline(always)]
    fn mark(&self) -> Ticks {
        Ticks(read_cvm_count())
    }

    #[inline(always)]
    fn elapsed(&self, start: Ticks, end: Ticks) -> u64 {
        end.elapsed_since(start)
    }
}

/// Read the 64-bit CvmCount register.
#[inline(always)]
pub fn read_cvm_count() -> u64 {
    compiler_fence(Ordering::SeqCst);
    let cycles: u64;
    // SAFETY: rdhwr $31 is user readable on Octeon and has no side effects.
    unsafe {
        std::arch::asm!("rdhwr {}, $31", out(reg) cycles, options(nostack, nomem));
    }
    compiler_fence(Ordering::SeqCst);
    cycles
}
