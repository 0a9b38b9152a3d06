//! Masking for secret values.

use std::collections::BTreeSet;

/// Mask a secret for display, keeping only its last four characters.
///
/// # Example
///
/// ```
/// use vulcan::secrets::mask_value;
///
/// assert_eq!(mask_value("5f2c9a81d0e4"), "****d0e4");
/// assert_eq!(mask_value("abc"), "****");
/// ```
pub fn mask_value(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

/// Shorten an identifier such as an OIDC client ID to `first8...last4`.
///
/// Identifiers of 12 characters or fewer are returned as-is.
pub fn mask_identifier(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 12 {
        return value.to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Redacts known secret values from text before it is shown or logged.
///
/// # Example
///
/// ```
/// use vulcan::secrets::OutputMasker;
///
/// let mut masker = OutputMasker::new();
/// masker.add_secret("Hunter2-Hunter2!");
///
/// let output = masker.mask("rails runner failed for password Hunter2-Hunter2!");
/// assert_eq!(output, "rails runner failed for password [REDACTED]");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputMasker {
    // Longest first, so a secret containing another is replaced whole.
    secrets: BTreeSet<(std::cmp::Reverse<usize>, String)>,
}

impl OutputMasker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a secret value to be masked. Empty strings are ignored.
    pub fn add_secret(&mut self, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.secrets
                .insert((std::cmp::Reverse(value.len()), value));
        }
    }

    /// Mask any registered secret values in `input`.
    pub fn mask(&self, input: &str) -> String {
        self.secrets
            .iter()
            .fold(input.to_string(), |acc, (_, secret)| {
                acc.replace(secret.as_str(), "[REDACTED]")
            })
    }

    pub fn secret_count(&self) -> usize {
        self.secrets.len()
    }
}
