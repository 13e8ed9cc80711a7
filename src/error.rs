//! Error types for the Dotypos API client.
//!
//! Every fallible operation in this crate returns [`Error`]. Access token
//! expiry is handled inside the request executor and never shows up here;
//! a rejected refresh token does, as [`Error::RefreshTokenExpired`].

use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for Dotypos operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all Dotypos API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// A listing endpoint answered with an unexpected status
    #[error("API error: status={status}, message={message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Human-readable error message
        message: String,
        /// Raw response body for debugging
        body: Value,
    },

    /// The refresh token was rejected by the signin endpoint.
    ///
    /// The library cannot recover from this; the caller has to obtain new
    /// credentials out of band.
    #[error("Refresh token expired; re-authentication required")]
    RefreshTokenExpired,

    /// The signin endpoint failed in a way the client does not recognise.
    #[error("Unknown signin error: {status}: {body}")]
    UnknownError {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The access token was rejected again right after being renewed.
    #[error("Access denied for `{path}` after token renewal")]
    AccessDenied {
        /// Resource path of the rejected request
        path: String,
    },

    /// A response did not have the expected shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns `true` if this error is potentially transient and the
    /// operation could be retried.
    ///
    /// # Example
    ///
    /// ```
    /// use dotypos_rs::Error;
    ///
    /// fn handle_error(err: Error) {
    ///     if err.is_retryable() {
    ///         println!("Retrying operation...");
    ///     }
    /// }
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) => true,
            Error::Api { status, .. } | Error::UnknownError { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Error::RefreshTokenExpired | Error::AccessDenied { .. } | Error::UnknownError { .. }
        )
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (invalid input, bad request, etc.).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 400 && *status < 500,
            Error::InvalidInput(_) | Error::Config(_) | Error::UrlParse(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Api { status, .. } | Error::UnknownError { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Create an API error from a response
    pub(crate) fn from_api_response(status: u16, body: Value) -> Self {
        let message = ["message", "error", "detail"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .unwrap_or("Unknown API error")
            .to_string();

        Error::Api {
            status,
            message,
            body,
        }
    }
}
