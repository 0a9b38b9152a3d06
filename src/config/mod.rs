//! Configuration resolution for Vulcan.
//!
//! This module merges five layers into one immutable [`Snapshot`]:
//! - Built-in defaults in [`schema`] and [`defaults`]
//! - Config file discovery and loading in [`loader`]
//! - `.env` translation in [`dotenv`]
//! - Process environment bindings in [`env_vars`]
//! - Command-line overrides in [`overrides`]
//!
//! Merging lives in [`merger`], source tracking in [`layers`], and the
//! orchestration in [`resolver`].

pub mod defaults;
pub mod dotenv;
pub mod env_vars;
pub mod layers;
pub mod loader;
pub mod merger;
pub mod overrides;
pub mod path;
pub mod resolver;
pub mod schema;
pub mod snapshot;

pub use layers::{ConfigLayer, LayerSource, LayerStack};
pub use loader::{find_project_root, load_config_value, ConfigFormat, ConfigPaths};
pub use merger::{deep_merge, merge_layers};
pub use overrides::FlagOverrides;
pub use resolver::{write_config, ConfigResolver, Resolution};
pub use schema::{
    AppSettings, AuthSettings, BuildSettings, DatabaseSettings, DockerSettings, LdapSettings,
    OidcSettings, PortSettings, Settings,
};
pub use snapshot::Snapshot;
