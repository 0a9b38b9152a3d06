//! Vulcan - operator CLI for the Vulcan Rails application.
//!
//! Vulcan wraps the day-to-day chores of running the app: interactive
//! setup of `.env`, layered configuration, Docker image builds, service
//! lifecycle, database maintenance, and user administration.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Layered configuration resolution
//! - [`envfile`] - `.env` parsing and atomic rewriting
//! - [`error`] - Error types and result aliases
//! - [`project`] - The project root and its environment
//! - [`secrets`] - Secret detection, masking, and generation
//! - [`setup`] - Setup plans and `.env` rendering
//! - [`shell`] - External command execution and host probes
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use vulcan::envfile::EnvFile;
//!
//! let env = EnvFile::parse_str("RAILS_ENV=production\nVULCAN_APP_URL=https://vulcan.example.org\n");
//! assert_eq!(env.value("RAILS_ENV"), "production");
//! assert!(env.contains("VULCAN_APP_URL"));
//! ```

pub mod auth;
pub mod build;
pub mod cli;
pub mod config;
pub mod docker;
pub mod envfile;
pub mod error;
pub mod fsutil;
pub mod project;
pub mod secrets;
pub mod setup;
pub mod shell;
pub mod ui;
pub mod user;
pub mod validate;

pub use error::{Result, VulcanError};
