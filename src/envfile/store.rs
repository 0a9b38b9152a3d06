//! Comment-preserving `.env` read/modify/write.

use std::fs;
use std::path::Path;

use crate::error::{Result, VulcanError};
use crate::fsutil::write_private;

use super::entry::EnvEntry;

/// An ordered `.env` file held in memory.
///
/// # Example
///
/// ```
/// use vulcan::envfile::EnvFile;
///
/// let mut env = EnvFile::parse_str("# Ports\nPORT=3000\n");
/// env.update([("PORT", "4000"), ("RAILS_ENV", "production")]);
///
/// assert_eq!(env.render(), "# Ports\nPORT=4000\nRAILS_ENV=production\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    entries: Vec<EnvEntry>,
}

impl EnvFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `.env` content. Never fails.
    pub fn parse_str(content: &str) -> Self {
        Self {
            entries: content.lines().map(EnvEntry::parse_line).collect(),
        }
    }

    /// Read and parse the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file doesn't exist, `Io` for any other
    /// read failure.
    pub fn parse(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VulcanError::not_found(format!("{} not found", path.display()))
            } else {
                VulcanError::Io(e)
            }
        })?;
        Ok(Self::parse_str(&content))
    }

    /// Like [`EnvFile::parse`], but a missing file is an empty store.
    pub fn parse_or_empty(path: &Path) -> Result<Self> {
        match Self::parse(path) {
            Err(VulcanError::NotFound { .. }) => Ok(Self::new()),
            other => other,
        }
    }

    pub fn entries(&self) -> &[EnvEntry] {
        &self.entries
    }

    /// Keyed entries, in file order.
    pub fn pairs(&self) -> impl Iterator<Item = &EnvEntry> {
        self.entries.iter().filter(|e| !e.is_comment)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs().map(|e| e.key.as_str())
    }

    /// Value of the first entry with `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// Value of `key`, or `""` when absent.
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Apply `updates` in memory.
    ///
    /// Existing keys keep their line position. Missing keys are appended in
    /// the order given. Keys not mentioned are untouched.
    pub fn update<K, V>(&mut self, updates: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in updates {
            let key = key.into();
            let value = value.into();

            let mut found = false;
            for entry in self.entries.iter_mut().filter(|e| !e.is_comment && e.key == key) {
                entry.value = value.clone();
                found = true;
            }
            if !found {
                self.entries.push(EnvEntry::pair(key, value));
            }
        }
    }

    /// Serialized file content.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.render());
            out.push('\n');
        }
        out
    }

    /// Write to `path` and force mode 0600.
    ///
    /// The full content is serialized before the target is touched.
    pub fn write(&self, path: &Path) -> Result<()> {
        let content = self.render();
        write_private(path, content.as_bytes())?;
        tracing::debug!("Wrote {} entries to {}", self.entries.len(), path.display());
        Ok(())
    }
}
