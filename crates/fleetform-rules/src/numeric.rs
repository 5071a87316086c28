//! Numeric validation functions

/// Coerces text to a number the way a browser's `Number(value)` does
///
/// Surrounding whitespace is ignored, an empty string is zero and anything
/// unparseable is `NaN`.
pub fn coerce_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let lower = trimmed.to_ascii_lowercase();
    if lower.contains("inf") || lower.contains("nan") {
        // Rust accepts "inf"/"nan" spellings that Number() rejects.
        return match trimmed {
            "Infinity" | "+Infinity" => f64::INFINITY,
            "-Infinity" => f64::NEG_INFINITY,
            _ => f64::NAN,
        };
    }

    if let Some(hex) = lower.strip_prefix("0x") {
        return u64::from_str_radix(hex, 16)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN);
    }

    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Fails only when the value is a number below `min`
///
/// `NaN` never compares below anything, so non-numeric input passes.
pub fn is_at_least(value: f64, min: f64) -> bool {
    value.is_nan() || value >= min
}

/// Fails only when the value is a number above `max`
pub fn is_at_most(value: f64, max: f64) -> bool {
    value.is_nan() || value <= max
}
