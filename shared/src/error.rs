//! Error types for Little API Lambda functions.

use thiserror::Error;

use crate::config::Environment;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Message returned in place of internal error details outside development.
pub const GENERIC_INTERNAL_MESSAGE: &str = "internal server error, please try again";

/// Errors that can occur while serving a proxied endpoint.
#[derive(Error, Debug)]
pub enum Error {
    /// Client sent malformed or out-of-range input
    #[error("{0}")]
    Validation(String),

    /// Upstream reported the requested resource as absent
    #[error("{0}")]
    NotFound(String),

    /// Request used an HTTP method the endpoint does not serve
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Upstream call failed, timed out, or broke its response contract
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::NotFound(_) => 404,
            Error::MethodNotAllowed => 405,
            _ => 500,
        }
    }

    /// Whether the message is safe to show callers in every environment.
    pub fn is_client_facing(&self) -> bool {
        self.status_code() < 500
    }

    /// Message placed in the response envelope.
    ///
    /// Client errors are always shown as-is. Server errors only expose their
    /// details in development; elsewhere they collapse to
    /// [`GENERIC_INTERNAL_MESSAGE`].
    pub fn public_message(&self, environment: Environment) -> String {
        if self.is_client_facing() || environment.is_development() {
            self.to_string()
        } else {
            GENERIC_INTERNAL_MESSAGE.to_string()
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Upstream(format!("request timed out: {}", err))
        } else {
            Error::Upstream(err.to_string())
        }
    }
}
