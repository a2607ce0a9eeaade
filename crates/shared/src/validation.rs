//! Common validation utilities.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]{3,30}$").unwrap();
    static ref HANDLE_RE: Regex = Regex::new(r"^@?[A-Za-z0-9_.]{1,30}$").unwrap();
}

/// Validates a username: 3 to 30 characters, letters, digits and underscores.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        let mut err = ValidationError::new("username_format");
        err.message =
            Some("Username must be 3-30 characters of letters, digits or underscores".into());
        Err(err)
    }
}

/// Validates password strength: at least 8 characters containing at least
/// one letter and one digit.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= 8;
    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if long_enough && has_letter && has_digit {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_strength");
        err.message =
            Some("Password must be at least 8 characters with a letter and a digit".into());
        Err(err)
    }
}

/// Validates a social media handle (optional leading @).
pub fn validate_social_handle(handle: &str) -> Result<(), ValidationError> {
    if HANDLE_RE.is_match(handle) {
        Ok(())
    } else {
        let mut err = ValidationError::new("handle_format");
        err.message = Some("Handle must be 1-30 characters, optionally starting with @".into());
        Err(err)
    }
}

/// Validates a follower count is non-negative.
pub fn validate_followers_count(count: i64) -> Result<(), ValidationError> {
    if count >= 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("followers_range");
        err.message = Some("Follower count must be non-negative".into());
        Err(err)
    }
}

/// Validates a monetary amount in cents is strictly positive.
pub fn validate_amount_cents(amount_cents: i64) -> Result<(), ValidationError> {
    if amount_cents > 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("amount_range");
        err.message = Some("Amount must be positive".into());
        Err(err)
    }
}

/// Validates a campaign budget in cents is non-negative.
pub fn validate_budget_cents(budget_cents: i64) -> Result<(), ValidationError> {
    if budget_cents >= 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("budget_range");
        err.message = Some("Budget must be non-negative".into());
        Err(err)
    }
}
