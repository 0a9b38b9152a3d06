//! Error types for Vulcan operations.
//!
//! This module defines [`VulcanError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - `NotFound` is for optional resources that are absent; callers decide
//!   whether that means "not configured yet" or a hard failure
//! - `ConfigParse` carries the offending file path
//! - `Validation` never accompanies a persisted write
//! - Use `anyhow::Error` (via `VulcanError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Vulcan operations.
#[derive(Debug, Error)]
pub enum VulcanError {
    /// An expected resource (`.env`, config file, snapshot) does not exist.
    #[error("{what}")]
    NotFound { what: String },

    /// Failed to parse a structured configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// A value failed a domain rule.
    #[error("{message}")]
    Validation { message: String },

    /// `write_config` was asked for a format it cannot produce.
    #[error("unsupported format: {format}")]
    UnsupportedFormat { format: String },

    /// External command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VulcanError {
    /// Shorthand for a [`VulcanError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`VulcanError::NotFound`].
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }
}

/// Result type alias for Vulcan operations.
pub type Result<T> = std::result::Result<T, VulcanError>;
