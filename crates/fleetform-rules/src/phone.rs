//! Phone number validation (North American format)

use once_cell::sync::Lazy;
use regex::Regex;

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\+?1[-.\s]?)?\(?([0-9]{3})\)?[-.\s]?([0-9]{3})[-.\s]?([0-9]{4})$")
        .expect("phone regex")
});

/// Validates a phone number after stripping all whitespace
///
/// Accepts an optional `+1`/`1` prefix, optional parentheses around the area
/// code and `-` or `.` separators.
pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    PHONE_REGEX.is_match(&compact)
}

/// Formats a phone number as `(XXX) XXX-XXXX`
///
/// Returns `None` unless the number reduces to exactly ten digits (a leading
/// country code `1` on an eleven digit number is dropped).
pub fn format_phone(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    let digits = match digits.len() {
        11 if digits.starts_with('1') => &digits[1..],
        10 => digits.as_str(),
        _ => return None,
    };

    Some(format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]))
}
