//! Error types for contentsync operations.
//!
//! This module defines [`ContentError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Ordinary "not found" conditions are `Ok(None)`, never errors
//! - [`ContentError::RateLimited`] is the one provider failure callers react to
//! - Configuration errors are only raised while building a service
//! - Use `anyhow::Error` (via `ContentError::Other`) for unexpected errors

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for contentsync operations.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The provider refused the request because the rate-limit budget is spent.
    #[error("{}", rate_limit_message(.reset_at))]
    RateLimited { reset_at: Option<DateTime<Utc>> },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Persisted application state could not be read back.
    #[error("Failed to parse application state at {path}: {message}")]
    StateParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn rate_limit_message(reset_at: &Option<DateTime<Utc>>) -> String {
    match reset_at {
        Some(at) => format!("Rate limit reached until {}", at.to_rfc3339()),
        None => "Rate limit reached".to_string(),
    }
}

impl ContentError {
    /// Whether this error is a rate-limit signal.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ContentError::RateLimited { .. })
    }
}

/// Result type alias for contentsync operations.
pub type Result<T> = std::result::Result<T, ContentError>;
