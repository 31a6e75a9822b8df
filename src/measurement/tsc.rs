//! x86 timestamp counter read as two 32-bit halves.

use std::sync::atomic::{compiler_fence, Ordering};

use crate::types::Unit;

use super::point::SplitTicks;
use super::TimeSource;

/// Read `EDX:EAX` from `rdtsc` without recombining.
#[inline(always)]
pub fn rdtsc_split() -> SplitTicks {
    compiler_fence(Ordering::SeqCst);

    let lo: u32;
    let hi: u32;
    // SAFETY: rdtsc only writes eax/edx and has no memory effects.
    unsafe {
        #[cfg(any(target_arch = "x86_64", target_feature = "sse2"))]
        std::arch::asm!(
            "lfence",
            "rdtsc",
            out("eax") lo,
            out("edx") hi,
            options(nostack, nomem, preserves_flags),
        );
        // lfence is an SSE2 instruction; pre-SSE2 i586 parts only get rdtsc.
        #[cfg(all(target_arch = "x86", not(target_feature = "sse2")))]
        std::arch::asm!(
            "rdtsc",
            out("eax") lo,
            out("edx") hi,
            options(nostack, nomem, preserves_flags),
        );
    }

    compiler_fence(Ordering::SeqCst);

    SplitTicks::new(hi, lo)
}

/// Time source backed by the x86 timestamp counter.
///
/// Always enabled in user space; there is no frequency query.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitTsc {
    _private: (),
}

impl SplitTsc {
    /// Create the source.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimeSource for SplitTsc {
    type Point = SplitTicks;

    fn name(&self) -> &'static str {
        "rdtsc"
    }

    fn unit(&self) -> Unit {
        Unit::Cycles
    }

    #[inline(always)]
    fn mark(&self) -> SplitTicks {
        rdtsc_split()
    }

    #[inline(always)]
    fn elapsed(&self, start: SplitTicks, end: SplitTicks) -> u64 {
        end.cycles_since(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rdtsc_monotonic() {
        let a = rdtsc_split().combined();
        let b = rdtsc_split().combined();
        assert!(b >= a || a.saturating_sub(b) < 1000, "a={} b={}", a, b);
    }

    #[test]
    fn test_fenced_reads_stay_ordered() {
        let mut prev = rdtsc_split().combined();
        for _ in 0..1000 {
            let next = rdtsc_split().combined();
            // Small skew tolerated if the thread migrates between cores.
            assert!(
                next >= prev || prev - next < 1000,
                "prev={} next={}",
                prev,
                next
            );
            prev = next;
        }
    }

    #[test]
    fn test_source_is_cycle_based() {
        let source = SplitTsc::new();
        assert_eq!(source.unit(), Unit::Cycles);
        assert_eq!(source.frequency(), None);
    }
}
