//! Input validation for the interactive registration and test paths
//!
//! Runs before any network call; rejected input is surfaced to the caller
//! with a specific message.

use crate::{Result, StormwatchError};
use regex::Regex;
use std::sync::LazyLock;

/// International phone shape: optional `+`, then 10 to 15 digits
static PHONE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?\d{10,15}$").expect("phone pattern is valid"));

/// Validate the city, phone, and email for a registration or test request
pub fn validate_registration(city: &str, phone: &str, email: &str) -> Result<()> {
    if city.trim().is_empty() || phone.is_empty() || email.is_empty() {
        return Err(StormwatchError::validation("Please fill in all fields"));
    }

    if !PHONE_SHAPE.is_match(phone) {
        return Err(StormwatchError::validation("Invalid phone number format"));
    }

    if !crate::alert::is_valid_email(email) {
        return Err(StormwatchError::validation("Invalid email format"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn accepts_valid_input() {
        assert!(validate_registration("Abuja", "+2348012345678", "user@example.com").is_ok());
        assert!(validate_registration("Abuja", "08012345678", "user@example.com").is_ok());
    }

    #[rstest]
    #[case("", "+2348012345678", "user@example.com")]
    #[case("   ", "+2348012345678", "user@example.com")]
    #[case("Abuja", "", "user@example.com")]
    #[case("Abuja", "+2348012345678", "")]
    fn rejects_missing_fields(#[case] city: &str, #[case] phone: &str, #[case] email: &str) {
        let err = validate_registration(city, phone, email).unwrap_err();
        assert_eq!(err.user_message(), "Invalid input: Please fill in all fields");
    }

    #[rstest]
    #[case("12345")] // too short
    #[case("1234567890123456")] // too long
    #[case("+123-456-7890")] // separators not allowed
    #[case("phone")]
    fn rejects_bad_phone(#[case] phone: &str) {
        let err = validate_registration("Abuja", phone, "user@example.com").unwrap_err();
        assert!(err.to_string().contains("Invalid phone number format"));
    }

    #[rstest]
    #[case("plainaddress")]
    #[case("user@nodot")]
    #[case("@example.com")]
    fn rejects_bad_email(#[case] email: &str) {
        let err = validate_registration("Abuja", "+2348012345678", email).unwrap_err();
        assert!(err.to_string().contains("Invalid email format"));
    }
}
