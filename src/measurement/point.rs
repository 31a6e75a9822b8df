//! Time point representations and their elapsed-value arithmetic.
//!
//! Every function here is pure, so the conversions can be tested on any host
//! regardless of which counter the build reads.

/// Nanoseconds per second.
pub const NANOS_PER_SEC: i128 = 1_000_000_000;

/// Recombine the two 32-bit halves of a split counter read.
#[inline(always)]
pub const fn combine(hi: u32, lo: u32) -> u64 {
    ((hi as u64) << 32) | lo as u64
}

/// A single 64-bit counter value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticks(pub u64);

impl Ticks {
    /// Ticks between `start` and `self`.
    ///
    /// Wrapping subtraction: a counter that wraps between the two reads yields
    /// a wrong value, which is not detected.
    #[inline(always)]
    pub const fn elapsed_since(self, start: Ticks) -> u64 {
        self.0.wrapping_sub(start.0)
    }
}

/// A `(seconds, nanoseconds)` reading from a monotonic clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WallPoint {
    /// Whole seconds.
    pub sec: i64,
    /// Nanoseconds within the second.
    pub nsec: i64,
}

impl WallPoint {
    /// Build a point from its parts.
    pub const fn new(sec: i64, nsec: i64) -> Self {
        Self { sec, nsec }
    }

    /// Nanoseconds between `start` and `self`.
    ///
    /// Clamps to zero if `self` precedes `start`.
    #[inline]
    pub fn nanos_since(self, start: WallPoint) -> u64 {
        let secs = self.sec as i128 - start.sec as i128;
        let nanos = secs * NANOS_PER_SEC + (self.nsec as i128 - start.nsec as i128);
        u64::try_from(nanos.max(0)).unwrap_or(u64::MAX)
    }
}

/// A counter read delivered as two 32-bit halves (x86 `EDX:EAX`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SplitTicks {
    /// Upper 32 bits.
    pub hi: u32,
    /// Lower 32 bits.
    pub lo: u32,
}

impl SplitTicks {
    /// Build a point from its halves.
    pub const fn new(hi: u32, lo: u32) -> Self {
        Self { hi, lo }
    }

    /// The full 64-bit counter value.
    #[inline(always)]
    pub const fn combined(self) -> u64 {
        combine(self.hi, self.lo)
    }

    /// Cycles between `start` and `self`, recombining both points first.
    #[inline(always)]
    pub const fn cycles_since(self, start: SplitTicks) -> u64 {
        Ticks(self.combined()).elapsed_since(Ticks(start.combined()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_table() {
        assert_eq!(combine(0, 0), 0);
        assert_eq!(combine(1, 0), 1 << 32);
        assert_eq!(combine(0, 0xFFFF_FFFF), 0xFFFF_FFFF);
        assert_eq!(combine(0xFFFF_FFFF, 0xFFFF_FFFF), u64::MAX);
        assert_eq!(combine(0x1234_5678, 0x9ABC_DEF0), 0x1234_5678_9ABC_DEF0);
    }

    #[test]
    fn test_split_carry_across_halves() {
        // lo wrapped while hi advanced
        let start = SplitTicks::new(0, 0xFFFF_FFF0);
        let end = SplitTicks::new(1, 0x0000_0010);
        assert_eq!(end.cycles_since(start), 0x20);
    }

    #[test]
    fn test_ticks_elapsed() {
        assert_eq!(Ticks(150).elapsed_since(Ticks(100)), 50);
        assert_eq!(Ticks(7).elapsed_since(Ticks(7)), 0);
        // counter wrapped once
        assert_eq!(Ticks(5).elapsed_since(Ticks(u64::MAX - 4)), 10);
    }

    #[test]
    fn test_wall_nanos() {
        let start = WallPoint::new(10, 999_999_000);
        let end = WallPoint::new(11, 1_000);
        assert_eq!(end.nanos_since(start), 2_000);

        let start = WallPoint::new(3, 0);
        let end = WallPoint::new(5, 500);
        assert_eq!(end.nanos_since(start), 2_000_000_500);
    }

    #[test]
    fn test_wall_same_point_is_zero() {
        let p = WallPoint::new(42, 123);
        assert_eq!(p.nanos_since(p), 0);
    }

    #[test]
    fn test_wall_reversed_clamps() {
        let start = WallPoint::new(5, 0);
        let end = WallPoint::new(4, 0);
        assert_eq!(end.nanos_since(start), 0);
    }
}
