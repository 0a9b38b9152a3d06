//! Built-in defaults layer.
//!
//! Toolchain versions are read from the same pin files the application
//! uses (`.ruby-version`, `.nvmrc`) so the image build stays in step with
//! local development.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use super::schema::Settings;

/// Used when no `.ruby-version` is found.
pub const FALLBACK_RUBY_VERSION: &str = "3.4.7";

/// Used when no `.nvmrc` is found.
pub const FALLBACK_NODE_VERSION: &str = "24";

/// Directories searched for version pins, in order.
fn pin_search_dirs(project_root: &Path) -> Vec<PathBuf> {
    vec![
        project_root.to_path_buf(),
        PathBuf::from("."),
        PathBuf::from(".."),
        PathBuf::from("../.."),
    ]
}

/// Read the first non-empty version pin named `filename`.
pub fn read_version_file(dirs: &[PathBuf], filename: &str) -> Option<String> {
    dirs.iter().find_map(|dir| {
        let content = fs::read_to_string(dir.join(filename)).ok()?;
        let version = content.trim();
        let version = version.strip_prefix("ruby-").unwrap_or(version);
        if version.is_empty() {
            None
        } else {
            Some(version.to_string())
        }
    })
}

/// Default settings for a project rooted at `project_root`.
pub fn default_settings(project_root: &Path) -> Settings {
    let dirs = pin_search_dirs(project_root);
    let mut settings = Settings::default();

    if let Some(v) = read_version_file(&dirs, ".ruby-version") {
        settings.build.ruby_version = v;
    }
    if let Some(v) = read_version_file(&dirs, ".nvmrc") {
        settings.build.node_version = v;
    }

    settings
}

/// Default settings as a value tree, for merging.
pub fn defaults_value(project_root: &Path) -> Value {
    serde_yaml::to_value(default_settings(project_root))
        .unwrap_or_else(|_| Value::Mapping(Default::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn ruby_prefix_is_stripped() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".ruby-version"), "ruby-3.3.1\n").unwrap();

        let v = read_version_file(&[temp.path().to_path_buf()], ".ruby-version");
        assert_eq!(v.as_deref(), Some("3.3.1"));
    }

    #[test]
    fn empty_pin_falls_through_to_next_dir() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(first.path().join(".nvmrc"), "  \n").unwrap();
        fs::write(second.path().join(".nvmrc"), "22\n").unwrap();

        let dirs = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(read_version_file(&dirs, ".nvmrc").as_deref(), Some("22"));
    }

    #[test]
    fn project_pins_override_fallbacks() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".ruby-version"), "3.2.0").unwrap();
        fs::write(temp.path().join(".nvmrc"), "20").unwrap();

        let settings = default_settings(temp.path());
        assert_eq!(settings.build.ruby_version, "3.2.0");
        assert_eq!(settings.build.node_version, "20");
    }

    #[test]
    fn defaults_value_is_a_mapping() {
        let temp = TempDir::new().unwrap();
        let value = defaults_value(temp.path());
        assert_eq!(value["ports"]["web"], 3000);
        assert_eq!(value["auth"]["oidc"]["discovery"], true);
    }
}
