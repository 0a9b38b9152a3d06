//! Configuration layering.
//!
//! This module provides priority-ordered settings layers with source
//! tracking, so `build info` and `--debug` can say where a value came from.

use std::fmt;
use std::path::PathBuf;

use serde_yaml::{Mapping, Value};

use super::merger::merge_layers;
use super::path::{lookup, set_path};

/// Where a layer's values came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerSource {
    Defaults,
    ConfigFile(PathBuf),
    DotEnv(PathBuf),
    Environment,
    Flags,
}

impl fmt::Display for LayerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defaults => write!(f, "defaults"),
            Self::ConfigFile(path) => write!(f, "config file {}", path.display()),
            Self::DotEnv(path) => write!(f, "{}", path.display()),
            Self::Environment => write!(f, "environment"),
            Self::Flags => write!(f, "command-line flags"),
        }
    }
}

/// One layer of settings values.
///
/// # Example
///
/// ```
/// use vulcan::config::{ConfigLayer, LayerSource};
///
/// let mut layer = ConfigLayer::new(LayerSource::Flags);
/// layer.set("build.image", "vulcan-custom");
///
/// assert!(layer.contains("build.image"));
/// assert!(!layer.contains("build.version"));
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLayer {
    /// Values in this layer, as a nested tree.
    pub values: Value,
    /// Source of this layer.
    pub source: LayerSource,
}

impl ConfigLayer {
    /// Create an empty layer.
    pub fn new(source: LayerSource) -> Self {
        Self {
            values: Value::Mapping(Mapping::new()),
            source,
        }
    }

    /// Create a layer from an already-built tree.
    pub fn from_value(source: LayerSource, values: Value) -> Self {
        let values = if values.is_null() {
            Value::Mapping(Mapping::new())
        } else {
            values
        };
        Self { values, source }
    }

    /// Set a value at a dotted path.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        set_path(&mut self.values, path, value.into());
    }

    /// Check if this layer supplies a (non-null) value at `path`.
    pub fn contains(&self, path: &str) -> bool {
        lookup(&self.values, path).is_some_and(|v| !v.is_null())
    }

    /// Check if this layer carries no values.
    pub fn is_empty(&self) -> bool {
        self.values.as_mapping().is_none_or(Mapping::is_empty)
    }
}

/// Layers from lowest to highest priority.
///
/// # Example
///
/// ```
/// use vulcan::config::{ConfigLayer, LayerSource, LayerStack};
///
/// let mut stack = LayerStack::new();
///
/// let mut defaults = ConfigLayer::new(LayerSource::Defaults);
/// defaults.set("ports.web", 3000);
/// defaults.set("ports.database", 5432);
/// stack.push(defaults);
///
/// let mut env = ConfigLayer::new(LayerSource::Environment);
/// env.set("ports.web", "4000");
/// stack.push(env);
///
/// let merged = stack.merged();
/// assert_eq!(merged["ports"]["web"], "4000");
/// assert_eq!(merged["ports"]["database"], 5432);
/// assert_eq!(stack.source_of("ports.web"), Some(&LayerSource::Environment));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayerStack {
    layers: Vec<ConfigLayer>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self { layers: vec![] }
    }

    /// Add a layer. Later layers have higher priority.
    pub fn push(&mut self, layer: ConfigLayer) {
        tracing::debug!("Applying {} layer", layer.source);
        self.layers.push(layer);
    }

    /// Merge every layer into one tree.
    pub fn merged(&self) -> Value {
        merge_layers(self.layers.iter().map(|l| &l.values))
    }

    /// Source of the highest-priority layer that supplies `path`.
    pub fn source_of(&self, path: &str) -> Option<&LayerSource> {
        self.layers
            .iter()
            .rev()
            .find(|layer| layer.contains(path))
            .map(|layer| &layer.source)
    }

    /// Get all layers (lowest priority first).
    pub fn layers(&self) -> &[ConfigLayer] {
        &self.layers
    }
}
