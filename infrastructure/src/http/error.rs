//! Error types for the HTTP transport

use campaign_chat_application::TransportError;
use thiserror::Error;

/// Result type alias for HTTP transport setup
pub type Result<T> = std::result::Result<T, HttpTransportError>;

/// Errors raised while building or sending a chat request
#[derive(Error, Debug)]
pub enum HttpTransportError {
    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),
}

impl From<HttpTransportError> for TransportError {
    fn from(err: HttpTransportError) -> Self {
        TransportError::Connection(err.to_string())
    }
}
