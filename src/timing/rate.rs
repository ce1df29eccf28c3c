//! Exact playback rate.
//!
//! A [`Rate`] is stored as `numerator / denominator`, where the denominator
//! is the host step in ticks and the numerator is the number of simulation
//! ticks that elapse per host step. The `f64` view is cached for display
//! and comparisons; all timekeeping uses the integers.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Ticks;

/// Direction of time for a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateSign {
    Forward,
    Backward,
    Frozen,
}

impl RateSign {
    /// Sign of a signed tick count.
    pub fn of(ticks: Ticks) -> Self {
        match ticks.signum() {
            1 => RateSign::Forward,
            -1 => RateSign::Backward,
            _ => RateSign::Frozen,
        }
    }

    pub fn is_backward(self) -> bool {
        self == RateSign::Backward
    }
}

/// Simulation ticks per host step, over the host step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    numerator: Ticks,
    denominator: Ticks,
    value: f64,
}

impl Rate {
    fn from_parts(numerator: Ticks, denominator: Ticks) -> Self {
        debug_assert!(denominator > 0);
        Rate {
            numerator,
            denominator,
            value: numerator as f64 / denominator as f64,
        }
    }

    /// Rate of exactly 1x for the given host step.
    pub fn normal(host_step: Ticks) -> Self {
        Self::from_parts(host_step, host_step)
    }

    /// Zero rate (frozen time).
    pub fn frozen(host_step: Ticks) -> Self {
        Self::from_parts(0, host_step)
    }

    /// Build a rate from a decimal ratio.
    ///
    /// The numerator is `host_step * ratio` truncated toward zero, so ratios
    /// smaller than one tick per host step collapse to a frozen rate.
    /// Non-finite ratios also yield a frozen rate.
    pub fn from_ratio(host_step: Ticks, ratio: f64) -> Self {
        if !ratio.is_finite() {
            log::warn!("non-finite rate ratio {ratio}; freezing time");
            return Self::frozen(host_step);
        }
        // `as` saturates at the i64 bounds.
        let numerator = (host_step as f64 * ratio).trunc() as Ticks;
        Self::from_parts(numerator, host_step)
    }

    /// Build a rate from an exact fraction `num / den`.
    ///
    /// Uses 128-bit intermediates and truncates toward zero. A zero
    /// denominator yields a frozen rate.
    pub fn from_fraction(host_step: Ticks, num: i64, den: i64) -> Self {
        if den == 0 {
            log::warn!("rate fraction {num}/0 has a zero denominator; freezing time");
            return Self::frozen(host_step);
        }
        let scaled = host_step as i128 * num as i128 / den as i128;
        let numerator = scaled.clamp(Ticks::MIN as i128, Ticks::MAX as i128) as Ticks;
        Self::from_parts(numerator, host_step)
    }

    /// The same speed in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self::from_parts(self.numerator.saturating_neg(), self.denominator)
    }

    /// Simulation ticks per host step.
    pub fn numerator(&self) -> Ticks {
        self.numerator
    }

    /// Host step in ticks.
    pub fn denominator(&self) -> Ticks {
        self.denominator
    }

    /// Cached `numerator / denominator`.
    pub fn as_f64(&self) -> f64 {
        self.value
    }

    pub fn sign(&self) -> RateSign {
        RateSign::of(self.numerator)
    }

    pub fn is_frozen(&self) -> bool {
        self.numerator == 0
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x ({}/{})", self.value, self.numerator, self.denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: Ticks = 166_667;

    #[test]
    fn test_normal_rate() {
        let r = Rate::normal(HOST);
        assert_eq!(r.numerator(), HOST);
        assert_eq!(r.denominator(), HOST);
        assert_eq!(r.as_f64(), 1.0);
        assert_eq!(r.sign(), RateSign::Forward);
    }

    #[test]
    fn test_from_ratio_truncates_toward_zero() {
        assert_eq!(Rate::from_ratio(HOST, 0.5).numerator(), 83_333);
        assert_eq!(Rate::from_ratio(HOST, -0.5).numerator(), -83_333);
        assert_eq!(Rate::from_ratio(HOST, 2.0).numerator(), 333_334);
    }

    #[test]
    fn test_tiny_ratio_freezes() {
        let r = Rate::from_ratio(HOST, 1.0 / 200_000.0);
        assert!(r.is_frozen());
        assert_eq!(r.sign(), RateSign::Frozen);
        let r = Rate::from_ratio(HOST, -1.0 / 200_000.0);
        assert!(r.is_frozen());
    }

    #[test]
    fn test_non_finite_ratio_freezes() {
        assert!(Rate::from_ratio(HOST, f64::NAN).is_frozen());
        assert!(Rate::from_ratio(HOST, f64::INFINITY).is_frozen());
    }

    #[test]
    fn test_cached_value_matches_integers() {
        for ratio in [-3.25, -1.0, -0.1, 0.0, 0.3, 1.0, 1.7, 12.0] {
            let r = Rate::from_ratio(HOST, ratio);
            let expected = (HOST as f64 * ratio).trunc() as i64;
            assert_eq!(r.numerator(), expected);
            assert_eq!(r.as_f64(), expected as f64 / HOST as f64);
        }
    }

    #[test]
    fn test_from_fraction_exact() {
        assert_eq!(Rate::from_fraction(HOST, 1, 3).numerator(), 55_555);
        assert_eq!(Rate::from_fraction(HOST, -1, 3).numerator(), -55_555);
        assert_eq!(Rate::from_fraction(HOST, 3, 2).numerator(), 250_000);
        assert!(Rate::from_fraction(HOST, 1, 0).is_frozen());
    }

    #[test]
    fn test_from_fraction_saturates() {
        let r = Rate::from_fraction(HOST, i64::MAX, 1);
        assert_eq!(r.numerator(), i64::MAX);
    }

    #[test]
    fn test_reversed_is_exact() {
        let r = Rate::from_fraction(HOST, 1, 3);
        assert_eq!(r.reversed().numerator(), -55_555);
        assert_eq!(r.reversed().reversed(), r);
    }

    #[test]
    fn test_rate_sign_of() {
        assert_eq!(RateSign::of(10), RateSign::Forward);
        assert_eq!(RateSign::of(-1), RateSign::Backward);
        assert_eq!(RateSign::of(0), RateSign::Frozen);
    }
}
