//! Core error types for gandalf-connect-core.
//!
//! Every failure that reaches a caller of the SDK surface is a
//! [`ConnectError`]: a flat [`ErrorCode`] plus a human-readable message.
//! Transport errors live in [`crate::api::GraphqlClientError`] and are
//! translated before they leave the crate.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Kind of a [`ConnectError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The redirect URL carried no `dataKey` query parameter.
    DataKeyNotFound,
    /// The public key does not resolve to a registered application.
    InvalidPublicKey,
    /// The requested services, traits or activities are not acceptable.
    InvalidService,
    /// The redirect URL is not a well-formed absolute URL.
    InvalidRedirectUrl,
    /// The time frame of a service failed date validation.
    InvalidTimeFrame,
}

impl ErrorCode {
    /// Stable name of the code, as exposed by the other Gandalf SDKs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DataKeyNotFound => "DataKeyNotFound",
            ErrorCode::InvalidPublicKey => "InvalidPublicKey",
            ErrorCode::InvalidService => "InvalidService",
            ErrorCode::InvalidRedirectUrl => "InvalidRedirectURL",
            ErrorCode::InvalidTimeFrame => "InvalidTimeFrame",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every fallible SDK operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ConnectError {
    pub code: ErrorCode,
    pub message: String,
}

impl ConnectError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn data_key_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DataKeyNotFound, message)
    }

    pub fn invalid_public_key(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidPublicKey, message)
    }

    pub fn invalid_service(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidService, message)
    }

    pub fn invalid_redirect_url(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRedirectUrl, message)
    }

    pub fn invalid_time_frame(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidTimeFrame, message)
    }
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

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home/config directory could not be prepared
    #[error("Configuration directory unavailable: {0}")]
    DirectoryUnavailable(#[from] std::io::Error),
}

/// Result type alias for ConnectError
pub type Result<T, E = ConnectError> = std::result::Result<T, E>;
