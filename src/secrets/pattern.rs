//! Secret key classification.
//!
//! A `.env` key is treated as secret when its name contains any of
//! [`SECRET_PATTERNS`], compared case-insensitively.

/// Substrings that mark a key as secret.
pub const SECRET_PATTERNS: &[&str] = &[
    "PASSWORD",
    "SECRET",
    "TOKEN",
    "KEY",
    "CIPHER",
    "SALT",
    "PRIVATE",
    "CREDENTIAL",
];

/// Check if a key name holds a secret value.
///
/// # Example
///
/// ```
/// use vulcan::secrets::is_secret;
///
/// assert!(is_secret("POSTGRES_PASSWORD"));
/// assert!(is_secret("vulcan_oidc_client_secret"));
/// assert!(!is_secret("RAILS_ENV"));
/// ```
pub fn is_secret(key: &str) -> bool {
    let upper = key.to_uppercase();
    SECRET_PATTERNS.iter().any(|p| upper.contains(p))
}
