//! Error handling for domain scanning operations.
//!
//! Only a handful of these are ever fatal: a dictionary that cannot be
//! fetched, a configuration that does not validate, or an output/checkpoint
//! file that cannot be written. Network failures during a single probe are
//! folded into an indeterminate probe outcome by the prober and never reach
//! the user.

use std::fmt;
use std::time::Duration;

/// Main error type for domain scanning operations.
#[derive(Debug, Clone)]
pub enum HuntError {
    /// The dictionary resource could not be retrieved
    FetchError { source: String, message: String },

    /// Network-related errors (client construction, connection, etc.)
    NetworkError {
        message: String,
        source: Option<String>,
    },

    /// Configuration errors (invalid settings, unparsable TOML, etc.)
    ConfigError { message: String },

    /// File I/O errors on the checkpoint, output or config files
    FileError { path: String, message: String },

    /// Timeout errors when operations take too long
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Generic internal errors that don't fit other categories
    Internal { message: String },
}

impl HuntError {
    /// Create a new dictionary fetch error.
    pub fn fetch<S: Into<String>, M: Into<String>>(source: S, message: M) -> Self {
        Self::FetchError {
            source: source.into(),
            message: message.into(),
        }
    }

    /// Create a new network error.
    pub fn network<M: Into<String>>(message: M) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl fmt::Display for HuntError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchError { source, message } => {
                write!(f, "Failed to fetch dictionary '{}': {}", source, message)
            }
            Self::NetworkError { message, source } => {
                if let Some(source) = source {
                    write!(f, "Network error: {} (source: {})", message, source)
                } else {
                    write!(f, "Network error: {}", message)
                }
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for HuntError {}

impl From<reqwest::Error> for HuntError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::network_with_source("Connection failed", err.to_string())
        } else {
            Self::network_with_source("HTTP request failed", err.to_string())
        }
    }
}
