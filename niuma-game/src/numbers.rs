//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 and clamp it to the i32 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).round();
    cast::<f64, i32>(clamped).unwrap_or(0)
}

/// Convert a count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Share of `value` against `max` as a whole percentage clamped to `0..=100`.
///
/// A non-positive `max` yields 0.
#[must_use]
pub fn percent_of(value: i32, max: i32) -> i32 {
    if max <= 0 {
        return 0;
    }
    let ratio = f64::from(value) / f64::from(max);
    round_f64_to_i32(ratio * 100.0).clamp(0, 100)
}
