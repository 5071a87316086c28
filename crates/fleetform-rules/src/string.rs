//! String validation functions

use once_cell::sync::Lazy;
use regex::Regex;

static ZIP_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("zip code regex"));

// Scheme is optional: "example.com/path" is accepted as well as "https://example.com".
static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)?([\da-z.-]+)\.([a-z.]{2,6})([/\w .-]*)*/?$").expect("url regex")
});

/// True when the string is empty after trimming
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// US ZIP code: five digits, optionally followed by `-` and four digits
pub fn is_valid_zip_code(zip: &str) -> bool {
    ZIP_CODE_REGEX.is_match(zip)
}

/// Permissive URL shape check
pub fn is_valid_url(url: &str) -> bool {
    URL_REGEX.is_match(url)
}

/// Length in characters, not bytes
pub fn char_length(s: &str) -> usize {
    s.chars().count()
}

/// Inclusive lower bound on character length
pub fn has_min_length(s: &str, min: usize) -> bool {
    char_length(s) >= min
}

/// Inclusive upper bound on character length
pub fn has_max_length(s: &str, max: usize) -> bool {
    char_length(s) <= max
}

/// Unanchored regex test, like `RegExp.prototype.test`
pub fn matches_pattern(s: &str, pattern: &Regex) -> bool {
    pattern.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("33139", true)]
    #[case("33139-1234", true)]
    #[case("3313", false)]
    #[case("33139-12", false)]
    #[case("abcde", false)]
    #[case("33139 1234", false)]
    fn test_zip_code(#[case] zip: &str, #[case] expected: bool) {
        assert_eq!(is_valid_zip_code(zip), expected);
    }

    #[rstest]
    #[case("https://example.com", true)]
    #[case("http://example.com/fleet/trucks", true)]
    #[case("example.com", true)]
    #[case("www.example.co.uk/path", true)]
    #[case("not-a-url", false)]
    #[case("ftp://example.com", false)]
    #[case("", false)]
    fn test_url(#[case] url: &str, #[case] expected: bool) {
        assert_eq!(is_valid_url(url), expected);
    }

    #[test]
    fn test_length_bounds_are_inclusive() {
        assert!(has_min_length("abc", 3));
        assert!(!has_min_length("ab", 3));
        assert!(has_max_length("abc", 3));
        assert!(!has_max_length("abcd", 3));
    }

    #[test]
    fn test_length_counts_characters() {
        assert_eq!(char_length("café"), 4);
        assert!(has_max_length("ñandú", 5));
    }

    #[test]
    fn test_blank() {
        assert!(is_blank(""));
        assert!(is_blank("   \t"));
        assert!(!is_blank(" a "));
    }

    #[test]
    fn test_pattern_is_unanchored() {
        let re = Regex::new("[0-9]+").unwrap();
        assert!(matches_pattern("abc123", &re));
        assert!(!matches_pattern("abc", &re));
    }
}
