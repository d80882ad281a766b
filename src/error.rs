//! Error types for touchpad gesture classification
//!
//! The classifier itself never fails; these errors come from the surfaces
//! around it (configuration, recorded traces, FFI argument decoding).

use thiserror::Error;

/// Errors that can occur outside the classifier core
#[derive(Debug, Error)]
pub enum GestureError {
    #[error("Failed to parse trace: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Invalid TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid sample: {0}")]
    InvalidSample(String),

    #[error("Sample {index} is out of order: {timestamp_ms}ms after {previous_ms}ms")]
    OutOfOrder {
        index: usize,
        previous_ms: u64,
        timestamp_ms: u64,
    },
}
