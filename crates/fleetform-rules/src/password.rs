//! Password validation functions

/// Special characters accepted as the "symbol" class of a strong password
pub const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Minimum length of a strong password
pub const STRONG_PASSWORD_MIN_LENGTH: usize = 8;

/// Validates password strength
///
/// Requires at least eight characters with one lowercase letter, one
/// uppercase letter, one digit and one of `@$!%*?&`.
pub fn is_strong_password(password: &str) -> bool {
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| PASSWORD_SPECIALS.contains(c));

    password.chars().count() >= STRONG_PASSWORD_MIN_LENGTH
        && has_lower
        && has_upper
        && has_digit
        && has_special
}
