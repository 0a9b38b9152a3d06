//! Resolved, immutable settings view.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use super::layers::{LayerSource, LayerStack};
use super::path::lookup;
use super::schema::Settings;

/// The merged settings handed to a command.
///
/// Lookups are permissive: an unknown path yields the zero value of the
/// requested type rather than an error.
#[derive(Debug, Clone)]
pub struct Snapshot {
    tree: Value,
    settings: Settings,
    layers: LayerStack,
    config_file: Option<PathBuf>,
}

impl Snapshot {
    pub(crate) fn new(
        tree: Value,
        settings: Settings,
        layers: LayerStack,
        config_file: Option<PathBuf>,
    ) -> Self {
        Self {
            tree,
            settings,
            layers,
            config_file,
        }
    }

    /// Typed view of the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The merged value tree.
    pub fn tree(&self) -> &Value {
        &self.tree
    }

    /// Config file that contributed a layer, if any.
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Which layer supplied the value at `path`.
    pub fn source_of(&self, path: &str) -> Option<&LayerSource> {
        self.layers.source_of(path)
    }

    pub fn get_string(&self, path: &str) -> String {
        match lookup(&self.tree, path) {
            Some(value) => scalar_to_string(value).unwrap_or_default(),
            None => String::new(),
        }
    }

    pub fn get_int(&self, path: &str) -> i64 {
        match lookup(&self.tree, path) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            Some(Value::Bool(b)) => i64::from(*b),
            _ => 0,
        }
    }

    pub fn get_bool(&self, path: &str) -> bool {
        match lookup(&self.tree, path) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => parse_bool(s).unwrap_or(false),
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            _ => false,
        }
    }

    pub fn get_strings(&self, path: &str) -> Vec<String> {
        match lookup(&self.tree, path) {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(Value::String(s)) => split_list(s),
            _ => Vec::new(),
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Boolean text as accepted by environment variables.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}

fn split_list(s: &str) -> Vec<String> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

/// Coerce string leaves in `tree` to the type of the matching default.
///
/// Values from `.env` and the environment arrive as text; this gives the
/// typed view something it can deserialize. Text that cannot be read as
/// the expected type becomes that type's zero value.
pub fn normalize(tree: &Value, defaults: &Value) -> Value {
    normalize_at(tree, defaults, "")
}

fn normalize_at(tree: &Value, defaults: &Value, path: &str) -> Value {
    match (tree, defaults) {
        (Value::Mapping(map), Value::Mapping(default_map)) => {
            let mut out = Mapping::new();
            for (key, value) in map {
                let child_path = match key.as_str() {
                    Some(k) if path.is_empty() => k.to_string(),
                    Some(k) => format!("{}.{}", path, k),
                    None => path.to_string(),
                };
                let normalized = match default_map.get(key) {
                    Some(default) => normalize_at(value, default, &child_path),
                    None => value.clone(),
                };
                out.insert(key.clone(), normalized);
            }
            Value::Mapping(out)
        }
        (Value::String(s), Value::Number(_)) => match s.trim().parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => {
                tracing::warn!("{} expects a number, got '{}'", path, s);
                Value::from(0)
            }
        },
        (Value::String(s), Value::Bool(_)) => match parse_bool(s) {
            Some(b) => Value::Bool(b),
            None => {
                tracing::warn!("{} expects true or false, got '{}'", path, s);
                Value::Bool(false)
            }
        },
        (Value::String(s), Value::Sequence(_)) => {
            Value::Sequence(split_list(s).into_iter().map(Value::String).collect())
        }
        (Value::Number(_) | Value::Bool(_), Value::String(_)) => {
            Value::String(scalar_to_string(tree).unwrap_or_default())
        }
        _ => tree.clone(),
    }
}
