//! Layered settings resolution.
//!
//! Layers, lowest priority first:
//!
//! 1. Built-in defaults (with toolchain versions from pin files)
//! 2. `vulcan.{yaml,yml,json,toml}`
//! 3. `.env` at the project root
//! 4. Process environment (`VULCAN_*` plus compatibility aliases)
//! 5. Command-line flags
//!
//! Absent optional files skip their layer. A malformed config file is
//! reported on the [`Resolution`] and the snapshot is still built from the
//! remaining layers.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, VulcanError};

use super::defaults::{default_settings, defaults_value};
use super::dotenv::load_dotenv_layer;
use super::env_vars::{env_layer, process_env};
use super::layers::{ConfigLayer, LayerSource, LayerStack};
use super::loader::{load_config_value, ConfigFormat, ConfigPaths};
use super::overrides::FlagOverrides;
use super::schema::Settings;
use super::snapshot::{normalize, Snapshot};

/// Outcome of resolving settings.
#[derive(Debug)]
pub struct Resolution {
    pub snapshot: Snapshot,
    /// Error from the config file layer, if it failed to load.
    pub file_error: Option<VulcanError>,
}

impl Resolution {
    /// Treat a config file failure as fatal.
    pub fn into_result(self) -> Result<Snapshot> {
        match self.file_error {
            Some(e) => Err(e),
            None => Ok(self.snapshot),
        }
    }
}

/// Builds a [`Snapshot`] from every configuration layer.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use vulcan::config::ConfigResolver;
///
/// let temp = tempfile::TempDir::new().unwrap();
/// let mut env = HashMap::new();
/// env.insert("PORT".to_string(), "4000".to_string());
///
/// let snapshot = ConfigResolver::new(temp.path())
///     .with_search_dirs(vec![temp.path().to_path_buf()])
///     .with_env_source(env)
///     .resolve()
///     .into_result()
///     .unwrap();
///
/// assert_eq!(snapshot.get_int("ports.web"), 4000);
/// assert_eq!(snapshot.settings().ports.database, 5432);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    project_root: PathBuf,
    config_file: Option<PathBuf>,
    search: ConfigPaths,
    env: Option<HashMap<String, String>>,
    overrides: FlagOverrides,
}

impl ConfigResolver {
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_file: None,
            search: ConfigPaths::discover(project_root),
            env: None,
            overrides: FlagOverrides::default(),
        }
    }

    /// Use this config file instead of searching.
    pub fn with_config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config_file = path;
        self
    }

    /// Replace the config file search path.
    pub fn with_search_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.search = ConfigPaths { search_dirs: dirs };
        self
    }

    /// Read variables from `env` instead of the process environment.
    pub fn with_env_source(mut self, env: HashMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    pub fn with_overrides(mut self, overrides: FlagOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Resolve all layers into a snapshot.
    ///
    /// A config file whose values do not fit the settings types is dropped
    /// as a whole and reported as a parse error for that file; the other
    /// layers still apply.
    pub fn resolve(&self) -> Resolution {
        let defaults = defaults_value(&self.project_root);

        let mut file_error = None;
        let mut file_layer = None;
        if let Some(path) = self.config_file.clone().or_else(|| self.search.find()) {
            match load_config_value(&path) {
                Ok(value) => {
                    tracing::info!("Using config file: {}", path.display());
                    file_layer = Some((path, value));
                }
                Err(e) => {
                    tracing::debug!("Config file layer skipped: {}", e);
                    file_error = Some(e);
                }
            }
        }

        let mut upper = Vec::new();
        if let Some(layer) = load_dotenv_layer(&self.project_root.join(".env")) {
            upper.push(layer);
        }
        upper.push(match &self.env {
            Some(env) => env_layer(&defaults, env),
            None => env_layer(&defaults, &process_env()),
        });
        upper.push(self.overrides.to_layer());

        let build = |file: Option<&(PathBuf, serde_yaml::Value)>, upper: &[ConfigLayer]| {
            let mut stack = LayerStack::new();
            stack.push(ConfigLayer::from_value(LayerSource::Defaults, defaults.clone()));
            if let Some((path, value)) = file {
                stack.push(ConfigLayer::from_value(
                    LayerSource::ConfigFile(path.clone()),
                    value.clone(),
                ));
            }
            for layer in upper {
                stack.push(layer.clone());
            }
            let tree = normalize(&stack.merged(), &defaults);
            let settings = serde_yaml::from_value::<Settings>(tree.clone());
            (stack, tree, settings)
        };

        let (mut stack, mut tree, mut settings) = build(file_layer.as_ref(), &upper);
        let mut used_file = file_layer.as_ref().map(|(path, _)| path.clone());

        let rejected = match (&settings, &file_layer) {
            (Err(e), Some((path, _))) => Some(VulcanError::ConfigParse {
                path: path.clone(),
                message: e.to_string(),
            }),
            _ => None,
        };
        if let Some(err) = rejected {
            tracing::debug!("Config file layer dropped: {}", err);
            file_error = Some(err);
            (stack, tree, settings) = build(None, &upper);
            used_file = None;
        }

        let settings = match settings {
            Ok(settings) => settings,
            Err(e) => {
                if file_error.is_none() {
                    file_error = Some(VulcanError::validation(format!("Invalid settings: {}", e)));
                }
                stack = LayerStack::new();
                stack.push(ConfigLayer::from_value(LayerSource::Defaults, defaults.clone()));
                tree = normalize(&stack.merged(), &defaults);
                default_settings(&self.project_root)
            }
        };

        Resolution {
            snapshot: Snapshot::new(tree, settings, stack, used_file),
            file_error,
        }
    }
}

/// Serialize a snapshot's settings to `path`.
///
/// `format` is `yaml`, `yml`, `json`, or `toml`; empty means yaml.
pub fn write_config(snapshot: &Snapshot, path: &Path, format: &str) -> Result<()> {
    let format: ConfigFormat = format.parse()?;
    let settings = snapshot.settings();

    let content = match format {
        ConfigFormat::Yaml => serde_yaml::to_string(settings).map_err(anyhow::Error::from)?,
        ConfigFormat::Json => {
            let mut json = serde_json::to_string_pretty(settings).map_err(anyhow::Error::from)?;
            json.push('\n');
            json
        }
        ConfigFormat::Toml => toml::to_string_pretty(settings).map_err(anyhow::Error::from)?,
    };

    fs::write(path, content)?;
    Ok(())
}
