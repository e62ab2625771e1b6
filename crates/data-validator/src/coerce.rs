//! Lenient Numeric Coercion
//!
//! Malformed numeric input is never rejected by the pipeline; it is
//! coerced to a safe default so every request produces a result.

use tracing::debug;

/// Parse a numeric cell, coercing any failure to 0.0.
pub fn coerce_f64(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        Ok(_) | Err(_) => {
            debug!("coerced non-numeric value '{}' to 0.0", raw);
            0.0
        }
    }
}

/// Replace non-finite values with 0.0.
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Squash a numeric flag to exactly 0.0 or 1.0.
///
/// Non-finite input counts as unset.
pub fn coerce_flag(value: f64) -> f64 {
    if value.is_finite() && value != 0.0 {
        1.0
    } else {
        0.0
    }
}
