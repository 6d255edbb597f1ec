//! Common helpers for reading component properties.

/// Use `value` when it is present and finite, otherwise `default`.
pub fn finite_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => default,
    }
}

/// Use `value` when it is present, finite and strictly positive, otherwise `default`.
pub fn positive_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => default,
    }
}
