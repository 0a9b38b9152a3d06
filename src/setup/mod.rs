//! First-time configuration.
//!
//! - [`SetupConfig`] - Typed wizard answers
//! - [`render_env_file`] - Pure `.env` serializer
//! - [`DEV_STEPS`] / [`PREREQUISITES`] - What `setup dev` runs

pub mod config;
pub mod render;
pub mod steps;

pub use config::{
    oidc_redirect_uri, AuthMethod, LdapConfig, OidcConfig, SetupConfig, SmtpConfig,
};
pub use render::render_env_file;
pub use steps::{SetupStep, DEV_STEPS, PREREQUISITES};
