//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 and clamp it to the u32 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_u32(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    let max = f64::from(u32::MAX);
    let clamped = value.clamp(0.0, max).round();
    cast::<f64, u32>(clamped).unwrap_or(0)
}

/// Floor a f64 and clamp it to the u32 range, returning 0 for non-finite values.
#[must_use]
pub fn floor_f64_to_u32(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    let max = f64::from(u32::MAX);
    let clamped = value.clamp(0.0, max).floor();
    cast::<f64, u32>(clamped).unwrap_or(0)
}

/// Convert a count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Clamp a probability into `[0, 1]`, mapping NaN to 0.
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Express a probability as a display percentage clamped into `[0, 100]`.
#[must_use]
pub fn as_percent(probability: f64) -> f64 {
    clamp_unit(probability) * 100.0
}

/// Divide, yielding 0 when the denominator carries no weight.
#[must_use]
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
