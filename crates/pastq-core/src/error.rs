//! Error types module
//!
//! All client-side errors are unified under the `AppError` enum: validation
//! failures raised before any request is made, authentication failures,
//! rejected or unreachable API calls, and local storage failures. Storage
//! failures are the only class callers are expected to downgrade to a
//! warning rather than abort on.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like storage quota problems
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    /// The server rejected the request. `message` carries the server's
    /// `error`/`message` field when one was present, otherwise "HTTP {status}".
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Storage(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl AppError {
    /// Build the error for a rejected API response. Prefers the server's
    /// `error` then `message` body field, then the raw body, then the status.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .or_else(|| v.get("message"))
                    .and_then(|m| m.as_str())
                    .map(|s| s.to_string())
            })
            .filter(|s| !s.is_empty())
            .or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .unwrap_or_else(|| format!("HTTP {}", status));

        AppError::Api { status, message }
    }

    /// Message suitable for the one-line status output (the toast equivalent).
    pub fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::Api { message, .. } => message.clone(),
            AppError::Network(msg) => msg.clone(),
            AppError::Storage(msg) => msg.clone(),
            AppError::Internal(_) => "Internal error".to_string(),
        }
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidInput(_)
            | AppError::Unauthorized(_)
            | AppError::NotFound(_)
            | AppError::PayloadTooLarge(_) => LogLevel::Debug,
            AppError::Storage(_) => LogLevel::Warn,
            AppError::Api { .. } | AppError::Network(_) | AppError::Internal(_) => LogLevel::Error,
        }
    }

    /// Storage errors never fail an operation: in-memory state stays valid.
    pub fn is_warning_only(&self) -> bool {
        matches!(self, AppError::Storage(_))
    }
}
