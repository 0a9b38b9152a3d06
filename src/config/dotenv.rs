//! `.env` → settings translation.
//!
//! Only the keys in [`DOTENV_MAPPINGS`] participate, and only when their
//! value is non-empty. Boolean coercion is applied to keys that follow the
//! `VULCAN_ENABLE_*` / `*_ENABLED` naming convention; every other value
//! enters the tree as a raw string and is typed when the snapshot is built.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_yaml::Value;

use crate::envfile::EnvFile;

use super::layers::{ConfigLayer, LayerSource};

/// `.env` key → settings path.
pub const DOTENV_MAPPINGS: &[(&str, &str)] = &[
    ("PORT", "ports.web"),
    ("DATABASE_PORT", "ports.database"),
    ("PROMETHEUS_PORT", "ports.prometheus"),
    ("POSTGRES_PASSWORD", "database.password"),
    ("DATABASE_URL", "database.url"),
    ("VULCAN_IMAGE", "build.image"),
    ("VULCAN_VERSION", "build.version"),
    ("VULCAN_APP_URL", "app.url"),
    ("VULCAN_CONTACT_EMAIL", "app.contact_email"),
    ("VULCAN_WELCOME_TEXT", "app.welcome_text"),
    ("VULCAN_ENABLE_OIDC", "auth.oidc.enabled"),
    ("VULCAN_OIDC_ISSUER_URL", "auth.oidc.issuer_url"),
    ("VULCAN_OIDC_CLIENT_ID", "auth.oidc.client_id"),
    ("VULCAN_OIDC_CLIENT_SECRET", "auth.oidc.client_secret"),
    ("VULCAN_OIDC_REDIRECT_URI", "auth.oidc.redirect_uri"),
    ("VULCAN_OIDC_PROVIDER_TITLE", "auth.oidc.provider_title"),
    ("VULCAN_ENABLE_LDAP", "auth.ldap.enabled"),
    ("VULCAN_LDAP_HOST", "auth.ldap.host"),
    ("VULCAN_LDAP_PORT", "auth.ldap.port"),
    ("VULCAN_LDAP_BASE", "auth.ldap.base"),
    ("VULCAN_ENABLE_LOCAL_LOGIN", "auth.local_login"),
    ("VULCAN_ENABLE_USER_REGISTRATION", "auth.user_registration"),
    ("VULCAN_SESSION_TIMEOUT", "auth.session_timeout"),
    ("RAILS_ENV", "app.environment"),
];

/// Whether a `.env` key gets `"true"`/`"false"` coerced to a boolean.
pub fn coerces_to_bool(key: &str) -> bool {
    key.ends_with("_ENABLED") || key.starts_with("VULCAN_ENABLE_")
}

/// `KEY=value` pairs of `.env` content, parsed the same way the store
/// parses them. Later duplicates win.
pub fn parse_pairs(content: &str) -> HashMap<String, String> {
    EnvFile::parse_str(content)
        .pairs()
        .map(|e| (e.key.clone(), e.value.clone()))
        .collect()
}

/// Build the `.env` layer from parsed pairs.
pub fn layer_from_pairs(source: LayerSource, pairs: &HashMap<String, String>) -> ConfigLayer {
    let mut layer = ConfigLayer::new(source);

    for (key, path) in DOTENV_MAPPINGS {
        let Some(raw) = pairs.get(*key).filter(|v| !v.is_empty()) else {
            continue;
        };
        let value = if coerces_to_bool(key) {
            Value::Bool(raw.to_lowercase() == "true")
        } else {
            Value::String(raw.clone())
        };
        layer.set(path, value);
    }

    layer
}

/// Load the `.env` layer for a project, if the file exists.
pub fn load_dotenv_layer(path: &Path) -> Option<ConfigLayer> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Skipping {}: {}", path.display(), e);
            }
            return None;
        }
    };
    let pairs = parse_pairs(&content);
    Some(layer_from_pairs(
        LayerSource::DotEnv(path.to_path_buf()),
        &pairs,
    ))
}
