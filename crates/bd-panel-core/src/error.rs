//! Error types for snapshot loading and configuration.
//!
//! Ingestion and resolution never fail; these cover the file boundaries
//! around them.

use std::io;

/// Failures loading a response snapshot document.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read response snapshot: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse response snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid response snapshot: {0}")]
    Invalid(String),
}

/// Failures loading panel configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read panel config: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse panel config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}
