//! Field validators
//!
//! Each validator takes the raw text of one input. Optional fields pass when
//! blank; combine with [`required`] for mandatory ones.

use regex::Regex;
use std::sync::OnceLock;

use crate::util::PHONE_DIGITS;

/// Why a single field was rejected
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("This field is required")]
    Required,

    #[error("Must be at least {0} characters")]
    TooShort(usize),

    #[error("Must be at most {0} characters")]
    TooLong(usize),

    #[error("Enter a valid email address")]
    InvalidEmail,

    #[error("Enter a 10-digit phone number")]
    InvalidPhone,

    #[error("Enter a 5-digit ZIP code")]
    InvalidZip,

    #[error("Must be a number")]
    NotANumber,

    #[error("Must be greater than zero")]
    NotPositive,

    #[error("Must be a whole number between {min} and {max}")]
    OutOfRange { min: i64, max: i64 },

    #[error("Values must be unique")]
    Duplicate,
}

pub type FieldResult<T = ()> = Result<T, FieldError>;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn zip_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("valid zip regex"))
}

pub fn required(value: &str) -> FieldResult {
    if value.trim().is_empty() {
        Err(FieldError::Required)
    } else {
        Ok(())
    }
}

/// Character count of the trimmed value, blank values pass
pub fn min_length(value: &str, min: usize) -> FieldResult {
    let len = value.trim().chars().count();
    if len > 0 && len < min {
        Err(FieldError::TooShort(min))
    } else {
        Ok(())
    }
}

pub fn max_length(value: &str, max: usize) -> FieldResult {
    if value.trim().chars().count() > max {
        Err(FieldError::TooLong(max))
    } else {
        Ok(())
    }
}

pub fn email(value: &str) -> FieldResult {
    let value = value.trim();
    if value.is_empty() || email_regex().is_match(value) {
        Ok(())
    } else {
        Err(FieldError::InvalidEmail)
    }
}

/// Exactly ten digits once formatting characters are stripped
pub fn phone(value: &str) -> FieldResult {
    if value.trim().is_empty() {
        return Ok(());
    }
    let digit_count = value.chars().filter(char::is_ascii_digit).count();
    if digit_count == PHONE_DIGITS {
        Ok(())
    } else {
        Err(FieldError::InvalidPhone)
    }
}

pub fn zip_code(value: &str) -> FieldResult {
    let value = value.trim();
    if value.is_empty() || zip_regex().is_match(value) {
        Ok(())
    } else {
        Err(FieldError::InvalidZip)
    }
}

/// Parse a number that must be greater than zero
pub fn positive(value: &str) -> FieldResult<f64> {
    let n: f64 = value.trim().parse().map_err(|_| FieldError::NotANumber)?;
    if n.is_finite() && n > 0.0 {
        Ok(n)
    } else {
        Err(FieldError::NotPositive)
    }
}

/// Parse a whole number within `min..=max`
pub fn integer_in_range(value: &str, min: i64, max: i64) -> FieldResult<i64> {
    let n: i64 = value
        .trim()
        .parse()
        .map_err(|_| FieldError::OutOfRange { min, max })?;
    if (min..=max).contains(&n) {
        Ok(n)
    } else {
        Err(FieldError::OutOfRange { min, max })
    }
}

/// Blank text becomes `None`, anything else is trimmed
pub fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("   "), Err(FieldError::Required));
        assert!(required(" Acme ").is_ok());
    }

    #[test]
    fn test_lengths() {
        assert_eq!(min_length("ab", 3), Err(FieldError::TooShort(3)));
        assert!(min_length("", 3).is_ok());
        assert_eq!(max_length("abcd", 3), Err(FieldError::TooLong(3)));
        assert!(max_length(" abc ", 3).is_ok());
    }

    #[test]
    fn test_email() {
        assert!(email("ops@acme.io").is_ok());
        assert!(email("").is_ok());
        assert_eq!(email("ops@acme"), Err(FieldError::InvalidEmail));
        assert_eq!(email("o ps@acme.io"), Err(FieldError::InvalidEmail));
    }

    #[test]
    fn test_phone() {
        assert!(phone("(555) 123-4567").is_ok());
        assert!(phone("").is_ok());
        assert_eq!(phone("555-1234"), Err(FieldError::InvalidPhone));
        assert_eq!(phone("555123456789"), Err(FieldError::InvalidPhone));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(positive("12.5"), Ok(12.5));
        assert_eq!(positive("0"), Err(FieldError::NotPositive));
        assert_eq!(positive("abc"), Err(FieldError::NotANumber));
        assert_eq!(integer_in_range("7", 1, 10), Ok(7));
        assert_eq!(
            integer_in_range("11", 1, 10),
            Err(FieldError::OutOfRange { min: 1, max: 10 })
        );
        assert!(integer_in_range("2.5", 1, 10).is_err());
    }

    #[test]
    fn test_zip_and_optional_text() {
        assert!(zip_code("90210").is_ok());
        assert!(zip_code("90210-1234").is_ok());
        assert_eq!(zip_code("9021"), Err(FieldError::InvalidZip));
        assert_eq!(optional_text("  "), None);
        assert_eq!(optional_text(" x "), Some("x".to_string()));
    }
}
