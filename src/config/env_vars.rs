//! Process environment layer.

use std::collections::HashMap;

use serde_yaml::Value;

use super::layers::{ConfigLayer, LayerSource};
use super::path::{env_var_name, leaf_paths};

/// Unprefixed variables bound for Docker and Rails compatibility.
pub const COMPAT_BINDINGS: &[(&str, &str)] = &[
    ("PORT", "ports.web"),
    ("DATABASE_PORT", "ports.database"),
    ("PROMETHEUS_PORT", "ports.prometheus"),
    ("DATABASE_URL", "database.url"),
    ("POSTGRES_PASSWORD", "database.password"),
    ("RAILS_ENV", "app.environment"),
];

/// Snapshot of the real process environment.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars().collect()
}

fn present<'a>(env: &'a HashMap<String, String>, name: &str) -> Option<&'a String> {
    env.get(name).filter(|v| !v.is_empty())
}

/// Build the environment layer for every leaf path in `defaults`.
///
/// `VULCAN_<PATH>` beats an unprefixed compatibility alias for the same
/// path. Empty variables are treated as unset.
pub fn env_layer(defaults: &Value, env: &HashMap<String, String>) -> ConfigLayer {
    let mut layer = ConfigLayer::new(LayerSource::Environment);

    for &(name, path) in COMPAT_BINDINGS {
        if let Some(value) = present(env, name) {
            tracing::debug!("{} -> {}", name, path);
            layer.set(path, value.as_str());
        }
    }

    for path in leaf_paths(defaults) {
        let name = env_var_name(&path);
        if let Some(value) = present(env, &name) {
            tracing::debug!("{} -> {}", name, path);
            layer.set(&path, value.as_str());
        }
    }

    layer
}
