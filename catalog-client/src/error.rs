//! Client error types

use shared::EnvelopeError;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with `success: false`
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status when the rejection came with a non-2xx code
        status: Option<u16>,
    },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Base URL or path could not be turned into a request URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Authentication required
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Text suitable for showing to the operator
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Http(e) if e.is_timeout() => "Request timed out".to_string(),
            ClientError::Http(e) if e.is_connect() => {
                "Could not reach the catalog server".to_string()
            }
            ClientError::Http(_) => "Network error".to_string(),
            ClientError::Serialization(_) | ClientError::InvalidResponse(_) => {
                "Unexpected response from the catalog server".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Whether the server rejected the request (as opposed to the call failing)
    pub fn is_rejection(&self) -> bool {
        matches!(self, ClientError::Api { .. })
    }
}

impl From<EnvelopeError> for ClientError {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::Rejected { message } => ClientError::Api {
                message,
                status: None,
            },
            EnvelopeError::MissingData => ClientError::InvalidResponse(err.to_string()),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
