//! Secret handling.
//!
//! - [`is_secret`] - Classifies `.env` keys by name
//! - [`mask_value`] / [`OutputMasker`] - Hide secret values in output
//! - [`generate_secure_token`] - Hex tokens for Rails secrets and passwords
//! - [`generate_secure_password`] / [`validate_password_strength`] - Account passwords
//!
//! # Example
//!
//! ```
//! use vulcan::secrets::{is_secret, mask_value};
//!
//! let key = "SECRET_KEY_BASE";
//! let shown = if is_secret(key) { mask_value("a1b2c3d4e5f6") } else { "a1b2c3d4e5f6".into() };
//! assert_eq!(shown, "****e5f6");
//! ```

pub mod mask;
pub mod password;
pub mod pattern;
pub mod token;

pub use mask::{mask_identifier, mask_value, OutputMasker};
pub use password::{validate_password_strength, MIN_PASSWORD_LENGTH};
pub use pattern::{is_secret, SECRET_PATTERNS};
pub use token::{
    generate_secure_password, generate_secure_token, hash_for_logging, SecureToken,
    FALLBACK_TOKEN,
};
