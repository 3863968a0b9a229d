//! Application error types for collection-watch
//!
//! This module defines the error types used throughout the application.
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while talking to the Automation Hub API
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    /// Network timeout
    #[error("Network timeout")]
    NetworkTimeout,

    /// Connection refused or host unreachable
    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    /// Credentials rejected (HTTP 401 / 403)
    #[error("Credentials rejected: HTTP {0}")]
    Unauthorized(u16),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Any other non-success status
    #[error("Unexpected response: HTTP {0}")]
    Status(u16),

    /// Response body could not be decoded
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Generic network error
    #[error("Network error: {0}")]
    Network(String),
}

/// Application-level error type
///
/// Every variant is fatal for a run.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, malformed or invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The API rejected the configured credentials
    #[error("Authentication failed: {0}")]
    Authentication(FetchError),

    /// Unreachable endpoint or malformed response
    #[error("Network error: {0}")]
    Network(FetchError),

    /// Failure writing the report
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Unauthorized(_) => AppError::Authentication(err),
            other => AppError::Network(other),
        }
    }
}

impl AppError {
    /// Short machine-friendly name of the error kind, used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Config(_) => "configuration",
            AppError::Authentication(_) => "authentication",
            AppError::Network(_) => "network",
            AppError::Output(_) => "output",
        }
    }
}
