//! Baud rate generator divider math
//!
//! The bit clock is `base_clock / divider`, with the divider programmed as
//! an integer in `[MIN_CLK_DIV, MAX_CLK_DIV)`. Rounding is always up so
//! the resulting clock never exceeds the requested speed.

use crate::regs::{MAX_CLK_DIV, MIN_CLK_DIV};

/// Divider for a requested speed: `ceil(base_clock / speed_hz)`
///
/// Range checking is the caller's job (see [`SpeedBounds`]). A zero speed
/// is treated as 1 Hz so the computation cannot fault.
pub fn divider(base_clock_hz: u32, speed_hz: u32) -> u32 {
    base_clock_hz.div_ceil(speed_hz.max(1))
}

/// Value for the baud rate generator's 16-bit divider field
///
/// Same as [`divider`], saturated at `MAX_CLK_DIV - 1`. Rounding up at the
/// slowest advertised speed can otherwise produce exactly `MAX_CLK_DIV`,
/// which the field cannot hold.
pub fn brgr_divider(base_clock_hz: u32, speed_hz: u32) -> u32 {
    divider(base_clock_hz, speed_hz).min(MAX_CLK_DIV - 1)
}

/// Speed range a controller advertises to its framework
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpeedBounds {
    /// Fastest supported bit clock, reached with the smallest divider
    pub max_speed_hz: u32,
    /// Slowest supported bit clock, reached with the largest divider
    pub min_speed_hz: u32,
}

impl SpeedBounds {
    /// Bounds for a given base clock
    pub fn for_clock(base_clock_hz: u32) -> Self {
        Self {
            max_speed_hz: base_clock_hz.div_ceil(MIN_CLK_DIV),
            min_speed_hz: base_clock_hz.div_ceil(MAX_CLK_DIV),
        }
    }

    /// Check if a speed can be programmed
    pub fn contains(&self, speed_hz: u32) -> bool {
        (self.min_speed_hz..=self.max_speed_hz).contains(&speed_hz)
    }

    /// Clamp a speed into the supported range
    pub fn clamp(&self, speed_hz: u32) -> u32 {
        speed_hz.clamp(self.min_speed_hz, self.max_speed_hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exact_division() {
        assert_eq!(divider(150_000_000, 1_000_000), 150);
    }

    #[test]
    fn test_rounds_up() {
        // 100 MHz / 3 MHz = 33.3 -> 34, giving 2.94 MHz (never faster)
        assert_eq!(divider(100_000_000, 3_000_000), 34);
    }

    #[test]
    fn test_zero_speed_does_not_fault() {
        assert_eq!(divider(1_000, 0), 1_000);
    }

    #[test]
    fn test_slowest_speed_fits_divider_field() {
        // 6_553_600 = 100 * 65536, so rounding lands on 65536
        let bounds = SpeedBounds::for_clock(6_553_600);
        assert_eq!(bounds.min_speed_hz, 100);
        assert_eq!(divider(6_553_600, 100), MAX_CLK_DIV);
        assert_eq!(brgr_divider(6_553_600, 100), MAX_CLK_DIV - 1);
        assert_eq!(brgr_divider(150_000_000, 1_000_000), 150);
    }

    #[test]
    fn test_bounds_for_150mhz() {
        let bounds = SpeedBounds::for_clock(150_000_000);
        assert_eq!(bounds.max_speed_hz, 25_000_000);
        // 150_000_000 / 65536 = 2288.8 -> 2289
        assert_eq!(bounds.min_speed_hz, 2289);
        assert!(bounds.contains(1_000_000));
        assert!(!bounds.contains(30_000_000));
        assert_eq!(bounds.clamp(30_000_000), 25_000_000);
        assert_eq!(bounds.clamp(10), 2289);
    }

    proptest! {
        #[test]
        fn prop_divider_is_ceiling(base in 1u32..=u32::MAX, speed in 1u32..=u32::MAX) {
            let div = divider(base, speed);
            prop_assert_eq!(div as u64, (base as u64).div_ceil(speed as u64));
        }

        #[test]
        fn prop_in_range_speed_gives_valid_divider(base in 36u32..=600_000_000, pick in 0u32..=u32::MAX) {
            let bounds = SpeedBounds::for_clock(base);
            let span = bounds.max_speed_hz - bounds.min_speed_hz;
            let speed = bounds.min_speed_hz + pick % (span + 1);
            let div = brgr_divider(base, speed);
            prop_assert!(div >= MIN_CLK_DIV);
            prop_assert!(div < MAX_CLK_DIV);
        }

        #[test]
        fn prop_bounds_are_ceilings(base in 0u32..=u32::MAX) {
            let bounds = SpeedBounds::for_clock(base);
            prop_assert_eq!(bounds.max_speed_hz as u64, (base as u64).div_ceil(6));
            prop_assert_eq!(bounds.min_speed_hz as u64, (base as u64).div_ceil(65536));
        }
    }
}
