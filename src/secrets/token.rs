//! Secure random tokens and passwords.

use std::fmt;

use base64::Engine;
use sha2::{Digest, Sha256};

use crate::error::{Result, VulcanError};

/// Placeholder written when the OS random source is unavailable.
pub const FALLBACK_TOKEN: &str = "fallback_token_please_regenerate";

/// A generated secret.
///
/// A fallback token is never mistaken for a real one: check
/// [`SecureToken::is_fallback`] before trusting the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecureToken {
    value: String,
    fallback: bool,
}

impl SecureToken {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }

    /// True when the random source failed and the placeholder was used.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

impl fmt::Display for SecureToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Hex encoding of `bytes` random bytes (a `2 * bytes` character string).
///
/// # Example
///
/// ```
/// use vulcan::secrets::generate_secure_token;
///
/// let token = generate_secure_token(32);
/// assert_eq!(token.as_str().len(), 64);
/// assert!(!token.is_fallback());
/// ```
pub fn generate_secure_token(bytes: usize) -> SecureToken {
    generate_token_with(bytes, getrandom::getrandom)
}

fn generate_token_with(
    bytes: usize,
    fill: impl FnOnce(&mut [u8]) -> std::result::Result<(), getrandom::Error>,
) -> SecureToken {
    let mut buf = vec![0u8; bytes];
    match fill(&mut buf) {
        Ok(()) => SecureToken {
            value: hex::encode(&buf),
            fallback: false,
        },
        Err(e) => {
            tracing::warn!("Secure random source unavailable ({}); using placeholder token", e);
            SecureToken {
                value: FALLBACK_TOKEN.to_string(),
                fallback: true,
            }
        }
    }
}

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL: &[u8] = b"!@#$%^&*";

fn random_u32() -> Result<u32> {
    let mut buf = [0u8; 4];
    getrandom::getrandom(&mut buf)
        .map_err(|e| VulcanError::Other(anyhow::anyhow!("random source unavailable: {}", e)))?;
    Ok(u32::from_le_bytes(buf))
}

/// Uniform index in `0..n` by rejection sampling.
fn random_index(n: usize) -> Result<usize> {
    let n = n as u32;
    let zone = u32::MAX - (u32::MAX % n);
    loop {
        let v = random_u32()?;
        if v < zone {
            return Ok((v % n) as usize);
        }
    }
}

fn pick(set: &[u8]) -> Result<u8> {
    Ok(set[random_index(set.len())?])
}

/// Generate a password with at least one lowercase letter, uppercase
/// letter, digit, and special character.
///
/// Lengths below 4 are raised to 4.
pub fn generate_secure_password(length: usize) -> Result<String> {
    let length = length.max(4);
    let all: Vec<u8> = [LOWERCASE, UPPERCASE, DIGITS, SPECIAL].concat();

    let mut password = vec![
        pick(LOWERCASE)?,
        pick(UPPERCASE)?,
        pick(DIGITS)?,
        pick(SPECIAL)?,
    ];
    while password.len() < length {
        password.push(pick(&all)?);
    }

    for i in (1..password.len()).rev() {
        let j = random_index(i + 1)?;
        password.swap(i, j);
    }

    Ok(password.into_iter().map(char::from).collect())
}

/// Short, non-reversible fingerprint of a value for log lines.
///
/// # Example
///
/// ```
/// use vulcan::secrets::hash_for_logging;
///
/// let tag = hash_for_logging("admin@example.com");
/// assert_eq!(tag.len(), 11);
/// assert!(tag.ends_with("..."));
/// ```
pub fn hash_for_logging(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    let encoded = base64::engine::general_purpose::STANDARD.encode(&digest[..]);
    format!("{}...", &encoded[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_hex_of_requested_length() {
        let token = generate_secure_token(32);
        assert_eq!(token.as_str().len(), 64);
        assert!(token.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn successive_tokens_differ() {
        assert_ne!(generate_secure_token(32), generate_secure_token(32));
    }

    #[test]
    fn odd_lengths_are_supported() {
        assert_eq!(generate_secure_token(33).as_str().len(), 66);
    }

    #[test]
    fn failing_source_yields_flagged_fallback() {
        let token = generate_token_with(32, |_| Err(getrandom::Error::UNSUPPORTED));
        assert!(token.is_fallback());
        assert_eq!(token.as_str(), FALLBACK_TOKEN);
    }

    #[test]
    fn password_has_every_character_class() {
        for _ in 0..20 {
            let pw = generate_secure_password(16).unwrap();
            assert_eq!(pw.len(), 16);
            assert!(pw.bytes().any(|b| LOWERCASE.contains(&b)));
            assert!(pw.bytes().any(|b| UPPERCASE.contains(&b)));
            assert!(pw.bytes().any(|b| DIGITS.contains(&b)));
            assert!(pw.bytes().any(|b| SPECIAL.contains(&b)));
        }
    }

    #[test]
    fn short_lengths_are_raised() {
        assert_eq!(generate_secure_password(1).unwrap().len(), 4);
    }

    #[test]
    fn generated_passwords_pass_strength_check() {
        let pw = generate_secure_password(20).unwrap();
        assert!(crate::secrets::validate_password_strength(&pw).is_ok());
    }

    #[test]
    fn hash_for_logging_is_stable_and_short() {
        let a = hash_for_logging("admin@example.com");
        assert_eq!(a, hash_for_logging("admin@example.com"));
        assert_ne!(a, hash_for_logging("other@example.com"));
        assert!(!a.contains("admin"));
    }
}
