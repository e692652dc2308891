//! Helpers for reading typed overrides out of a `serde_json::Value` object.
//!
//! Each helper takes a JSON value, a key name, and a default. Missing keys and
//! mistyped values yield the default, so loading a configuration never fails;
//! range checks happen afterwards in [`FieldConfig::validate`](crate::config::FieldConfig::validate).

use serde_json::Value;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
///
/// JSON integers are accepted and converted.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a `usize` from `params[name]`, returning `default` if missing or wrong type.
///
/// Only non-negative JSON integers are accepted.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
}

/// Extracts a `u8` from `params[name]`, returning `default` if missing, wrong
/// type, or above 255.
pub fn param_u8(params: &Value, name: &str, default: u8) -> u8 {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| u8::try_from(v).ok())
        .unwrap_or(default)
}

/// Extracts a `[min, max]` pair from `params[name]`.
///
/// The value must be a two-element array of numbers; anything else returns
/// `default`. Ordering is not checked here.
pub fn param_range(params: &Value, name: &str, default: (f64, f64)) -> (f64, f64) {
    match params.get(name).and_then(Value::as_array).map(Vec::as_slice) {
        Some([lo, hi]) => match (lo.as_f64(), hi.as_f64()) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => default,
        },
        _ => default,
    }
}
