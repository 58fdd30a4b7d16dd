//! Error types for telemetry ingestion.
//!
//! Only resource-level failures are represented here. Malformed or incomplete
//! telemetry lines are transient noise: the codec discards them and they never
//! become a [`TrackError`].
//!
//! ## Error Categories
//!
//! - **Transport Errors**: the link to the device failed or disconnected
//! - **File Errors**: configuration or replay files could not be read or written
//! - **Config Errors**: a configuration value is out of range
//! - **Parse Errors**: a configuration document is not valid JSON
//! - **Encode Errors**: an outbound message could not be serialized
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use trackline::TrackError;
//!
//! let error = TrackError::transport_failed("device unplugged");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for trackline operations.
pub type Result<T, E = TrackError> = std::result::Result<T, E>;

/// Main error type for trackline operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TrackError {
    #[error("Transport failure: {reason}")]
    Transport {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("File error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration value for '{key}': {details}")]
    Config { key: String, details: String },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("Failed to encode outbound message")]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    #[error("Output channel is closed")]
    OutputClosed,
}

impl TrackError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            TrackError::Transport { .. } => true,
            TrackError::Timeout { .. } => true,
            TrackError::File { .. } => false,
            TrackError::Config { .. } => false,
            TrackError::Parse { .. } => false,
            TrackError::Encode { .. } => false,
            TrackError::OutputClosed => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TrackError::Transport { .. } => vec![
                "Check that the device is connected",
                "Verify the serial port and baud rate",
                "Start a new session with a freshly opened transport",
            ],
            TrackError::File { .. } => vec![
                "Check file exists and is readable",
                "Check file permissions",
                "Ensure sufficient disk space",
            ],
            TrackError::Config { .. } => vec![
                "Check the configured viewport bounds are ordered",
                "Use a positive buffer size",
                "Delete the configuration file to restore defaults",
            ],
            TrackError::Parse { .. } => vec![
                "Check the configuration file is valid JSON",
                "Verify numeric fields contain numbers",
            ],
            TrackError::Encode { .. } => vec![
                "Use string keys for outbound mappings",
                "Avoid non-finite floating point values",
            ],
            TrackError::Timeout { .. } => vec![
                "Increase timeout duration",
                "Check the transport is not blocked by another process",
            ],
            TrackError::OutputClosed => vec![
                "Start a new session before sending",
                "Replay sessions have no outbound transport",
            ],
        }
    }

    /// Helper constructor for transport errors.
    pub fn transport_failed(reason: impl Into<String>) -> Self {
        TrackError::Transport { reason: reason.into(), source: None }
    }

    /// Helper constructor for transport errors with source.
    pub fn transport_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        TrackError::Transport { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        TrackError::File { path, source }
    }

    /// Helper constructor for configuration errors.
    pub fn invalid_config(key: impl Into<String>, details: impl Into<String>) -> Self {
        TrackError::Config { key: key.into(), details: details.into() }
    }

    /// Helper constructor for parse errors.
    pub fn parse_error(context: impl Into<String>, details: impl Into<String>) -> Self {
        TrackError::Parse { context: context.into(), details: details.into() }
    }
}

impl From<std::io::Error> for TrackError {
    fn from(err: std::io::Error) -> Self {
        TrackError::Transport { reason: err.to_string(), source: Some(Box::new(err)) }
    }
}

impl From<serde_json::Error> for TrackError {
    fn from(err: serde_json::Error) -> Self {
        TrackError::Encode { source: err }
    }
}
