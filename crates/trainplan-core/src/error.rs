//! Core error types for trainplan-core.
//!
//! A small thiserror hierarchy: one top-level [`CoreError`] with
//! domain-specific sub-enums for parsing and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for trainplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Plan parsing errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while extracting metadata from a plan document.
///
/// Only two conditions are fatal to an extraction: the source document being
/// unreadable, and the document carrying no recognizable phase indicator.
/// Every other miss degrades to a default value inside the parser.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Source document does not exist
    #[error("Workout plan not found: {path}")]
    PlanNotFound { path: PathBuf },

    /// Source document exists but could not be read
    #[error("Failed to read plan {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No phase declaration or phase heading anywhere in the document
    #[error("Could not determine current training phase")]
    PhaseNotFound,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not name a known configuration field
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Could not prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
