// src/error.rs

//! Unified error handling for the admin client.

use std::fmt;

use thiserror::Error;

use crate::models::FormMessage;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Fallback text when the backend gives nothing usable.
pub const UNKNOWN_ERROR: &str = "An unknown error occurred.";

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport failed (connection, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Client-side validation failed before anything was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backend rejected the request
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: FormMessage },

    /// Backend has no record for the requested id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation not permitted in the current form or dialog state
    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),

    /// A view reported a failure it had already rendered
    #[error("{0}")]
    Reported(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a backend error from a status code and rendered message.
    pub fn api(status: u16, message: FormMessage) -> Self {
        Self::Api { status, message }
    }

    /// Create a not-found error for the given resource.
    pub fn not_found(what: impl fmt::Display) -> Self {
        Self::NotFound(what.to_string())
    }

    /// Create an invalid transition error.
    pub fn transition(message: impl Into<String>) -> Self {
        Self::InvalidTransition(message.into())
    }

    /// Wrap a message that was already shown to the user.
    pub fn reported(message: impl fmt::Display) -> Self {
        Self::Reported(message.to_string())
    }

    /// Message shown to the user in a form.
    ///
    /// Backend messages are surfaced verbatim, including multi-line lists.
    pub fn user_message(&self) -> FormMessage {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::NotFound(what) => FormMessage::Single(format!("{what} was not found.")),
            Self::Validation(message) | Self::Reported(message) => {
                FormMessage::Single(message.clone())
            }
            Self::Http(e) if e.is_timeout() || e.is_connect() => {
                FormMessage::Single("Unable to reach the server. Please try again.".to_string())
            }
            _ => FormMessage::Single(UNKNOWN_ERROR.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_keeps_message_list() {
        let err = AppError::api(
            400,
            FormMessage::Many(vec!["name is required".into(), "email is invalid".into()]),
        );
        assert_eq!(err.user_message().lines().len(), 2);
    }

    #[test]
    fn not_found_is_readable() {
        let err = AppError::not_found("Student S1");
        assert_eq!(
            err.user_message(),
            FormMessage::Single("Student S1 was not found.".into())
        );
    }

    #[test]
    fn config_error_falls_back_to_unknown() {
        let err = AppError::config("bad");
        assert_eq!(err.user_message(), FormMessage::Single(UNKNOWN_ERROR.into()));
    }
}
