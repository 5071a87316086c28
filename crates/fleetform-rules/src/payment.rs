//! Payment card validation (Luhn checksum)

/// Validates a card number: spaces are ignored, 13 to 19 digits are
/// required and the digits must pass the Luhn checksum.
pub fn is_valid_credit_card(number: &str) -> bool {
    let digits: String = number.chars().filter(|c| *c != ' ').collect();

    if !(13..=19).contains(&digits.len()) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    luhn_checksum(&digits)
}

/// Standard mod-10 check: double every second digit from the right
pub fn luhn_checksum(digits: &str) -> bool {
    let mut sum = 0u32;

    for (i, b) in digits.bytes().rev().enumerate() {
        if !b.is_ascii_digit() {
            return false;
        }
        let mut digit = u32::from(b - b'0');
        if i % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }

    sum % 10 == 0
}
