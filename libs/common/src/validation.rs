//! Input validation utilities
//!
//! These checks exist for user feedback only; the backend remains the
//! authority on what it accepts.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// True when `email` is a syntactically valid address
pub fn is_valid_email(email: &str) -> bool {
    validate_email(email.trim()).is_ok()
}

/// Validate a required free-text field with a minimum length
pub fn validate_required(value: Option<&str>, label: &str, min_len: usize) -> Result<(), String> {
    let value = value.map(str::trim).unwrap_or_default();

    if value.is_empty() {
        return Err(format!("{} is required", label));
    }

    if value.chars().count() < min_len {
        return Err(format!(
            "{} must be at least {} characters long",
            label, min_len
        ));
    }

    Ok(())
}

/// Validate that `value`, once punctuation is stripped, has exactly `len` digits
pub fn validate_digits(value: &str, label: &str, len: usize) -> Result<(), String> {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    let has_letters = value.chars().any(|c| c.is_alphabetic());

    if has_letters || digits.len() != len {
        return Err(format!("{} must have {} digits", label, len));
    }

    Ok(())
}

/// Validate an ISO `YYYY-MM-DD` date and return it parsed
pub fn validate_iso_date(value: &str, label: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("{} must be a valid date (YYYY-MM-DD)", label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("coach@club.com.br"));
        assert!(is_valid_email("  ana.souza+u14@handebol.org "));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("ana"));
        assert!(!is_valid_email("ana@club"));
        assert!(!is_valid_email("ana @club.com"));
    }

    #[test]
    fn test_required_with_min_length() {
        assert!(validate_required(Some("Ana Souza"), "Full name", 3).is_ok());
        assert_eq!(
            validate_required(Some("  "), "Full name", 3),
            Err("Full name is required".to_string())
        );
        assert!(validate_required(None, "Full name", 3).is_err());
        assert!(validate_required(Some("Al"), "Full name", 3).is_err());
    }

    #[test]
    fn test_digits() {
        assert!(validate_digits("123.456.789-09", "CPF", 11).is_ok());
        assert!(validate_digits("12345-678", "ZIP code", 8).is_ok());
        assert!(validate_digits("1234", "ZIP code", 8).is_err());
        assert!(validate_digits("1234A678", "ZIP code", 8).is_err());
    }

    #[test]
    fn test_iso_date() {
        assert!(validate_iso_date("2012-02-29", "Birth date").is_ok());
        assert!(validate_iso_date("2013-02-29", "Birth date").is_err());
        assert!(validate_iso_date("2012-13-01", "Birth date").is_err());
        assert!(validate_iso_date("01/02/2012", "Birth date").is_err());
    }
}
