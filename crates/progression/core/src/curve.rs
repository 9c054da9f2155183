//! Conversion between accumulated experience and integer level.
//!
//! ```text
//! level = floor(C * sqrt(xp))
//! xp    = (level / C)^E
//! ```
//!
//! The two directions are not exact inverses for arbitrary `xp`; callers must
//! never expect to recover `xp` from `level`.

use crate::config::CurveConfig;

/// Pure experience curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelCurve {
    scale: f64,
    power: f64,
}

impl LevelCurve {
    pub const fn new(scale: f64, power: f64) -> Self {
        Self { scale, power }
    }

    pub const fn from_config(config: &CurveConfig) -> Self {
        Self::new(config.scale, config.power)
    }

    pub const fn scale(&self) -> f64 {
        self.scale
    }

    pub const fn power(&self) -> f64 {
        self.power
    }

    /// Level reached with `xp` accumulated experience. Negative or NaN input is 0.
    pub fn xp_to_level(&self, xp: f64) -> u32 {
        if !(xp > 0.0) {
            return 0;
        }
        let raw = (self.scale * xp.sqrt()).floor();
        if raw >= f64::from(u32::MAX) {
            return u32::MAX;
        }
        let candidate = raw as u32;
        // sqrt/pow rounding can leave an exact threshold just below its level
        if xp >= self.level_to_xp(candidate + 1) {
            candidate + 1
        } else {
            candidate
        }
    }

    /// Experience threshold of `level`.
    pub fn level_to_xp(&self, level: u32) -> f64 {
        (f64::from(level) / self.scale).powf(self.power)
    }

    /// Percentage of the way from the current level threshold to the next, in `[0, 100]`.
    ///
    /// Returns `100.0` once `max_level` is reached.
    pub fn progress_percent(&self, xp: f64, max_level: u32) -> f64 {
        let level = self.xp_to_level(xp);
        if level >= max_level {
            return 100.0;
        }
        let floor = self.level_to_xp(level);
        let ceiling = self.level_to_xp(level + 1);
        let span = ceiling - floor;
        if span <= 0.0 {
            return 0.0;
        }
        ((xp - floor) / span * 100.0).clamp(0.0, 100.0)
    }
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self::from_config(&CurveConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_xp_is_level_zero() {
        let curve = LevelCurve::default();
        assert_eq!(curve.xp_to_level(0.0), 0);
        assert_eq!(curve.level_to_xp(0), 0.0);
    }

    #[test]
    fn invalid_input_is_level_zero() {
        let curve = LevelCurve::default();
        assert_eq!(curve.xp_to_level(-5.0), 0);
        assert_eq!(curve.xp_to_level(f64::NAN), 0);
    }

    #[test]
    fn default_curve_values() {
        let curve = LevelCurve::default();
        // 0.1 * sqrt(110) = 1.048..
        assert_eq!(curve.xp_to_level(110.0), 1);
        // (5 / 0.1)^2
        assert!((curve.level_to_xp(5) - 2500.0).abs() < 1e-6);
        assert_eq!(curve.xp_to_level(2500.0), 5);
        assert_eq!(curve.xp_to_level(2499.0), 4);
    }

    #[test]
    fn thresholds_map_to_their_level_up_to_cap() {
        let curve = LevelCurve::default();
        for level in 0..=90 {
            assert_eq!(curve.xp_to_level(curve.level_to_xp(level)), level);
        }
    }

    #[test]
    fn just_below_threshold_stays_on_lower_level() {
        let curve = LevelCurve::default();
        // level 2 starts at 400xp
        assert_eq!(curve.xp_to_level(399.9999999), 1);
        assert_eq!(curve.xp_to_level(400.0), 2);
        assert_eq!(curve.xp_to_level(809_999.9999), 89);
        assert_eq!(curve.xp_to_level(810_000.0), 90);
    }

    #[test]
    fn progress_percent_midway() {
        let curve = LevelCurve::default();
        // level 1 at 100xp, level 2 at 400xp
        assert!((curve.progress_percent(250.0, 90) - 50.0).abs() < 1e-9);
        assert_eq!(curve.progress_percent(curve.level_to_xp(90), 90), 100.0);
    }

    proptest! {
        #[test]
        fn xp_to_level_is_monotonic(a in 0.0f64..1.0e7, b in 0.0f64..1.0e7) {
            let curve = LevelCurve::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(curve.xp_to_level(lo) <= curve.xp_to_level(hi));
        }

        #[test]
        fn level_to_xp_is_monotonic(a in 0u32..500, b in 0u32..500) {
            let curve = LevelCurve::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(curve.level_to_xp(lo) <= curve.level_to_xp(hi));
        }

        #[test]
        fn round_trip_within_one_level(level in 0u32..=90, scale in 0.01f64..1.0) {
            let curve = LevelCurve::new(scale, 2.0);
            let back = curve.xp_to_level(curve.level_to_xp(level));
            prop_assert!(back.abs_diff(level) <= 1, "level {} came back as {}", level, back);
        }

        #[test]
        fn round_trip_on_default_curve_is_bounded(level in 0u32..=90) {
            let curve = LevelCurve::default();
            let back = curve.xp_to_level(curve.level_to_xp(level));
            prop_assert!(back.abs_diff(level) <= 1);
        }

        #[test]
        fn xp_to_level_is_the_floor_away_from_thresholds(xp in 0.0f64..1.0e7) {
            let curve = LevelCurve::default();
            let level = curve.xp_to_level(xp);
            let floor = (0.1 * xp.sqrt()).floor() as u32;
            prop_assert!(level == floor || (level == floor + 1 && xp >= curve.level_to_xp(level)));
        }

        #[test]
        fn progress_stays_in_range(xp in 0.0f64..1.0e6) {
            let curve = LevelCurve::default();
            let pct = curve.progress_percent(xp, 90);
            prop_assert!((0.0..=100.0).contains(&pct));
        }
    }
}
