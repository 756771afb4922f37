//! Error types and handling for `skycast`

use std::time::Duration;
use thiserror::Error;

/// Main error type for the `skycast` library
#[derive(Error, Debug)]
pub enum SkycastError {
    /// Transport-level failure talking to the upstream service
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Upstream answered with a non-success HTTP status
    #[error("Upstream returned status {code}: {body}")]
    UpstreamStatus { code: u16, body: String },

    /// Upstream payload could not be decoded
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// The upstream call did not finish before the deadline
    #[error("Request timed out after {}ms", after.as_millis())]
    Timeout { after: Duration },

    /// The feed contained no usable points
    #[error("No weather data available")]
    EmptyData,

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Cache operation errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Fieldless discriminant of [`SkycastError`], for callers that branch on the kind only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    UpstreamStatus,
    Decode,
    Timeout,
    EmptyData,
    Validation,
    Config,
    Cache,
    Io,
}

impl SkycastError {
    /// Create a new network error wrapping the transport failure
    pub fn network<S: Into<String>>(message: S, source: reqwest::Error) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            SkycastError::Network { .. } => ErrorKind::Network,
            SkycastError::UpstreamStatus { .. } => ErrorKind::UpstreamStatus,
            SkycastError::Decode { .. } => ErrorKind::Decode,
            SkycastError::Timeout { .. } => ErrorKind::Timeout,
            SkycastError::EmptyData => ErrorKind::EmptyData,
            SkycastError::Validation { .. } => ErrorKind::Validation,
            SkycastError::Config { .. } => ErrorKind::Config,
            SkycastError::Cache { .. } => ErrorKind::Cache,
            SkycastError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SkycastError::Network { .. } => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
            SkycastError::UpstreamStatus { code, .. } => {
                format!("The weather service rejected the request (HTTP {code}).")
            }
            SkycastError::Decode { .. } => {
                "The weather service sent data that could not be understood.".to_string()
            }
            SkycastError::Timeout { .. } => {
                "The weather service took too long to respond. Please try again.".to_string()
            }
            SkycastError::EmptyData => "No weather data is available for this location.".to_string(),
            SkycastError::Validation { message } => format!("Invalid input: {message}"),
            SkycastError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            SkycastError::Cache { .. } => {
                "Cache operation failed. You may need to clear your cache.".to_string()
            }
            SkycastError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
