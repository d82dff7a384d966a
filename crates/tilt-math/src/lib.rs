//! Small numeric helpers used to turn raw readings into display values.
//!
//! None of these validate their input. NaN and infinities pass straight
//! through the arithmetic.

/// Default lower bound for [`clamp_default`].
pub const CLAMP_MIN: f64 = 0.0;
/// Default upper bound for [`clamp_default`].
pub const CLAMP_MAX: f64 = 100.0;

/// Round `value` to `precision` decimal places.
///
/// Halves round away from zero. A negative precision rounds to tens,
/// hundreds and so on: `round(123.0, -1) == 120.0`.
pub fn round(value: f64, precision: i32) -> f64 {
    let multiplier = 10f64.powi(precision);
    (value * multiplier).round() / multiplier
}

/// Round to the nearest whole number.
pub fn round_default(value: f64) -> f64 {
    round(value, 0)
}

/// Limit `value` to `[min, max]`.
///
/// Evaluated as `min(max(value, min), max)`, so swapped bounds return `max`
/// instead of panicking like [`f64::clamp`]. A NaN in any argument gives NaN.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() || min.is_nan() || max.is_nan() {
        return f64::NAN;
    }
    value.max(min).min(max)
}

/// Limit `value` to `[0, 100]`.
pub fn clamp_default(value: f64) -> f64 {
    clamp(value, CLAMP_MIN, CLAMP_MAX)
}

/// Re-map `value` linearly from `[from_min, from_max]` onto `[to_min, to_max]`.
///
/// For example `adjust(10.0, 0.0, 100.0, 100.0, 0.0) == 90.0`.
///
/// Out-of-range values are extrapolated, not clamped. A zero-width source
/// range divides by zero.
pub fn adjust(value: f64, from_min: f64, from_max: f64, to_min: f64, to_max: f64) -> f64 {
    let from_range = from_max - from_min;
    let to_range = to_max - to_min;
    let scaled = (value - from_min) / from_range;
    to_min + scaled * to_range
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn round_to_two_places() {
        assert!((round(2.345, 2) - 2.35).abs() < EPS);
        assert!((round(1.2, 2) - 1.2).abs() < EPS);
    }

    #[test]
    fn round_negative_precision() {
        assert_eq!(round(123.0, -1), 120.0);
        assert_eq!(round(1250.0, -2), 1300.0);
    }

    #[test]
    fn round_halves_away_from_zero() {
        assert_eq!(round_default(2.5), 3.0);
        assert_eq!(round_default(-2.5), -3.0);
        assert_eq!(round_default(0.4), 0.0);
    }

    #[test]
    fn round_is_idempotent() {
        for &x in &[0.1, 1.7, -3.3, 45.678, 100_000.3, -0.005] {
            for p in 0..5 {
                let once = round(x, p);
                assert_eq!(round(once, p), once, "x={x} p={p}");
            }
        }
    }

    #[test]
    fn round_propagates_nan() {
        assert!(round(f64::NAN, 2).is_nan());
        assert_eq!(round(f64::INFINITY, 1), f64::INFINITY);
    }

    #[test]
    fn clamp_propagates_nan() {
        assert!(clamp_default(f64::NAN).is_nan());
        assert!(clamp(5.0, f64::NAN, 10.0).is_nan());
        assert!(clamp(5.0, 0.0, f64::NAN).is_nan());
        assert_eq!(clamp(f64::INFINITY, 0.0, 10.0), 10.0);
    }

    #[test]
    fn clamp_with_defaults() {
        assert_eq!(clamp_default(150.0), 100.0);
        assert_eq!(clamp_default(-10.0), 0.0);
        assert_eq!(clamp_default(50.0), 50.0);
    }

    #[test]
    fn clamp_stays_within_bounds() {
        for &v in &[-1e9, -5.0, 0.0, 2.5, 7.0, 1e9] {
            let c = clamp(v, -3.0, 4.0);
            assert!((-3.0..=4.0).contains(&c), "v={v} -> {c}");
        }
    }

    #[test]
    fn clamp_swapped_bounds_returns_max() {
        assert_eq!(clamp(50.0, 100.0, 0.0), 0.0);
        assert_eq!(clamp(-50.0, 100.0, 0.0), 0.0);
    }

    #[test]
    fn adjust_inverts_range() {
        assert!((adjust(10.0, 0.0, 100.0, 100.0, 0.0) - 90.0).abs() < EPS);
    }

    #[test]
    fn adjust_identity_mapping() {
        for &v in &[-20.0, 0.0, 3.25, 50.0, 120.0] {
            assert!((adjust(v, -10.0, 90.0, -10.0, 90.0) - v).abs() < EPS);
        }
    }

    #[test]
    fn adjust_extrapolates() {
        assert!((adjust(150.0, 0.0, 100.0, 0.0, 1.0) - 1.5).abs() < EPS);
        assert!((adjust(-45.0, -45.0, 45.0, 0.0, 100.0)).abs() < EPS);
    }

    #[test]
    fn adjust_degenerate_range_is_not_finite() {
        assert!(!adjust(5.0, 1.0, 1.0, 0.0, 10.0).is_finite());
    }
}
