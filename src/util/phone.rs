//! Phone number helpers
//!
//! Phone fields are stored as bare 10-digit strings. Input from forms and
//! the CLI is sanitized before validation and before it is sent to the API.

/// Number of digits kept in a stored phone number
pub const PHONE_DIGITS: usize = 10;

/// Strip every non-digit and keep at most the first 10 digits.
///
/// Applying this twice gives the same result as applying it once.
pub fn sanitize_phone(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(PHONE_DIGITS)
        .collect()
}

/// Format a phone number for display as `(XXX) XXX-XXXX`.
///
/// Anything that does not sanitize to exactly 10 digits is returned as the
/// sanitized digits.
pub fn format_phone(input: &str) -> String {
    let digits = sanitize_phone(input);
    if digits.len() != PHONE_DIGITS {
        return digits;
    }
    format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..10])
}

/// True when the input sanitizes to a complete phone number
pub fn is_complete_phone(input: &str) -> bool {
    sanitize_phone(input).len() == PHONE_DIGITS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_non_digits() {
        assert_eq!(sanitize_phone("(555) 123-4567"), "5551234567");
        assert_eq!(sanitize_phone("+1 555.123.4567 ext 9"), "1555123456");
        assert_eq!(sanitize_phone("abc"), "");
        assert_eq!(sanitize_phone(""), "");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for input in ["(555) 123-4567", "12345678901234", "a1b2c3", "  ", "555-0100"] {
            let once = sanitize_phone(input);
            assert_eq!(sanitize_phone(&once), once);
            assert!(once.len() <= PHONE_DIGITS);
            assert!(once.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("5551234567"), "(555) 123-4567");
        assert_eq!(format_phone("555-123"), "555123");
        assert!(is_complete_phone("555 123 4567"));
        assert!(!is_complete_phone("555 123"));
    }
}
