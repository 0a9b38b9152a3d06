//! Password strength rules for application accounts.

use crate::error::{Result, VulcanError};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 12;

const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Check a password against the account policy.
///
/// Returns the first rule that fails as a [`VulcanError::Validation`].
pub fn validate_password_strength(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(VulcanError::validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    let rules: [(&str, fn(char) -> bool); 4] = [
        ("uppercase letter", |c| c.is_ascii_uppercase()),
        ("lowercase letter", |c| c.is_ascii_lowercase()),
        ("digit", |c| c.is_ascii_digit()),
        ("special character", |c| SPECIAL_CHARS.contains(c)),
    ];

    for (what, test) in rules {
        if !password.chars().any(test) {
            return Err(VulcanError::validation(format!(
                "password must contain at least one {}",
                what
            )));
        }
    }

    Ok(())
}
