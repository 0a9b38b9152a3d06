//! Configuration file discovery and loading.
//!
//! A config file is named `vulcan.<ext>` where `<ext>` is one of the
//! [`ConfigFormat`] extensions. It is searched for in the project root, the
//! current directory, and `~/.vulcan`, and the first match wins.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_yaml::Value;

use crate::error::{Result, VulcanError};

/// Base name of the structured config file.
pub const CONFIG_NAME: &str = "vulcan";

/// Structured formats understood by the loader and by `write_config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    /// Extensions searched for, in order.
    pub const EXTENSIONS: &'static [&'static str] = &["yaml", "yml", "json", "toml"];

    /// Detect the format of a config path from its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
    }
}

impl FromStr for ConfigFormat {
    type Err = VulcanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "" | "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            other => Err(VulcanError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

/// Directories searched for a config file, in priority order.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub search_dirs: Vec<PathBuf>,
}

impl ConfigPaths {
    /// Standard search path for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        let mut search_dirs = vec![project_root.to_path_buf(), PathBuf::from(".")];
        if let Some(home) = dirs::home_dir() {
            search_dirs.push(home.join(".vulcan"));
        }
        Self { search_dirs }
    }

    /// First existing `vulcan.<ext>` in the search path.
    pub fn find(&self) -> Option<PathBuf> {
        self.search_dirs.iter().find_map(|dir| {
            ConfigFormat::EXTENSIONS
                .iter()
                .map(|ext| dir.join(format!("{}.{}", CONFIG_NAME, ext)))
                .find(|candidate| candidate.is_file())
        })
    }
}

/// Find the application root for a CLI started in `cwd`.
///
/// The CLI usually lives in a subdirectory of the Rails application, so
/// the parent wins when it holds a `Gemfile`.
pub fn find_project_root(cwd: &Path) -> PathBuf {
    match cwd.parent() {
        Some(parent) if parent.join("Gemfile").is_file() => parent.to_path_buf(),
        _ => cwd.to_path_buf(),
    }
}

/// Load a config file as a raw value tree (for merging).
///
/// # Errors
///
/// Returns `NotFound` if the file doesn't exist.
/// Returns `ConfigParse` if the content is invalid for its format.
pub fn load_config_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            VulcanError::not_found(format!("Config file not found: {}", path.display()))
        } else {
            VulcanError::Io(e)
        }
    })?;

    let format = ConfigFormat::from_path(path).ok_or_else(|| VulcanError::ConfigParse {
        path: path.to_path_buf(),
        message: "unsupported config file extension".into(),
    })?;

    parse_config_value(&content, format).map_err(|message| VulcanError::ConfigParse {
        path: path.to_path_buf(),
        message,
    })
}

fn parse_config_value(content: &str, format: ConfigFormat) -> std::result::Result<Value, String> {
    if content.trim().is_empty() {
        return Ok(Value::Mapping(Default::default()));
    }

    let value: Value = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string())?,
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string())?,
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string())?,
    };

    match value {
        Value::Mapping(_) => Ok(value),
        Value::Null => Ok(Value::Mapping(Default::default())),
        _ => Err("top level must be a mapping".into()),
    }
}
