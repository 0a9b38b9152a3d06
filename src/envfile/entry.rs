//! One logical line of a `.env` file.

use crate::secrets::is_secret;

/// A keyed `KEY=value` line, or a comment/blank line replayed verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    /// Empty for comment entries.
    pub key: String,
    pub value: String,
    pub is_secret: bool,
    pub is_comment: bool,
    /// Original line text. Used verbatim when writing comment entries.
    pub raw: String,
}

impl EnvEntry {
    /// A keyed entry with secret classification applied.
    pub fn pair(key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        Self {
            is_secret: is_secret(&key),
            raw: format!("{}={}", key, value),
            key,
            value,
            is_comment: false,
        }
    }

    /// A comment or blank line.
    pub fn comment(raw: impl Into<String>) -> Self {
        Self {
            key: String::new(),
            value: String::new(),
            is_secret: false,
            is_comment: true,
            raw: raw.into(),
        }
    }

    /// Parse one line. Never fails: anything that isn't `KEY=value` with a
    /// non-empty key is kept as an opaque comment.
    pub fn parse_line(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Self::comment(line);
        }

        match trimmed.find('=') {
            Some(idx) if idx > 0 => {
                let mut entry = Self::pair(trimmed[..idx].trim(), trimmed[idx + 1..].trim());
                entry.raw = line.to_string();
                entry
            }
            _ => Self::comment(line),
        }
    }

    /// Text written back to disk for this entry (without newline).
    pub fn render(&self) -> String {
        if self.is_comment {
            self.raw.clone()
        } else {
            format!("{}={}", self.key, self.value)
        }
    }

    /// A comment line of the form `# === ... ===`, used as a section title.
    pub fn is_section_header(&self) -> bool {
        self.is_comment && self.raw.contains("===")
    }
}
