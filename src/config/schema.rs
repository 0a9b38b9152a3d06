//! Typed settings tree.
//!
//! These structs are the typed view of a resolved snapshot. Their `Default`
//! impls hold the built-in defaults, except the two toolchain versions which
//! come from version-pin files (see [`crate::config::defaults`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root of the settings tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub build: BuildSettings,
    pub ports: PortSettings,
    pub docker: DockerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub app: AppSettings,
}

/// Image build configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    pub ruby_version: String,
    pub node_version: String,
    pub bundler_version: String,
    pub registry: String,
    pub image: String,
    pub version: String,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            ruby_version: super::defaults::FALLBACK_RUBY_VERSION.into(),
            node_version: super::defaults::FALLBACK_NODE_VERSION.into(),
            bundler_version: "2.6.5".into(),
            registry: "mitre".into(),
            image: "vulcan".into(),
            version: "latest".into(),
        }
    }
}

impl BuildSettings {
    /// Full image reference, `registry/image:version`.
    pub fn image_ref(&self) -> String {
        format!("{}/{}:{}", self.registry, self.image, self.version)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortSettings {
    pub web: i64,
    pub database: i64,
    pub prometheus: i64,
}

impl Default for PortSettings {
    fn default() -> Self {
        Self {
            web: 3000,
            database: 5432,
            prometheus: 9394,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerSettings {
    pub dockerfile: String,
    pub platforms: Vec<String>,
    pub build_args: BTreeMap<String, String>,
}

impl Default for DockerSettings {
    fn default() -> Self {
        Self {
            dockerfile: "Dockerfile.production".into(),
            platforms: vec!["linux/amd64".into()],
            build_args: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: i64,
    pub name: String,
    pub user: String,
    pub password: String,
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 5432,
            name: "vulcan_development".into(),
            user: "postgres".into(),
            password: String::new(),
            url: String::new(),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub local_login: bool,
    pub user_registration: bool,
    /// Minutes.
    pub session_timeout: i64,
    pub oidc: OidcSettings,
    pub ldap: LdapSettings,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            local_login: true,
            user_registration: true,
            session_timeout: 60,
            oidc: OidcSettings::default(),
            ldap: LdapSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OidcSettings {
    pub enabled: bool,
    pub discovery: bool,
    pub provider_title: String,
    pub issuer_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl Default for OidcSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            discovery: true,
            provider_title: String::new(),
            issuer_url: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LdapSettings {
    pub enabled: bool,
    pub host: String,
    pub port: i64,
    pub base: String,
    pub bind_dn: String,
    pub password: String,
    pub encryption: String,
    pub title: String,
    pub attribute: String,
}

impl Default for LdapSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            host: String::new(),
            port: 389,
            base: String::new(),
            bind_dn: String::new(),
            password: String::new(),
            encryption: String::new(),
            title: String::new(),
            attribute: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub environment: String,
    pub url: String,
    pub contact_email: String,
    pub welcome_text: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            environment: "development".into(),
            url: "http://localhost:3000".into(),
            contact_email: "admin@example.com".into(),
            welcome_text: "Welcome to Vulcan".into(),
        }
    }
}
