//! API Response types
//!
//! Every catalog endpoint answers with the same envelope:
//! ```json
//! { "success": true, "data": { ... } }
//! { "success": false, "message": "Product not found" }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message used when the server rejects a request without saying why
pub const DEFAULT_FAILURE_MESSAGE: &str = "Request failed";

/// Uniform `{success, data|message}` response wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Whether the server accepted the request
    pub success: bool,
    /// Response payload (present on success for data-returning endpoints)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message (usually present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Reasons an envelope cannot be turned into a value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// `success: false`
    #[error("{message}")]
    Rejected { message: String },

    /// `success: true` but the expected `data` field is absent
    #[error("Response is missing data")]
    MissingData,
}

impl<T> Envelope<T> {
    /// Create a failed envelope
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Failure message, falling back to a generic one when the server sent none
    pub fn failure_message(&self) -> String {
        self.message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(DEFAULT_FAILURE_MESSAGE)
            .to_string()
    }

    /// Accept the envelope, keeping `data` optional
    pub fn into_result(self) -> Result<Option<T>, EnvelopeError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(EnvelopeError::Rejected {
                message: self.failure_message(),
            })
        }
    }

    /// Accept the envelope and require `data`
    pub fn into_data(self) -> Result<T, EnvelopeError> {
        self.into_result()?.ok_or(EnvelopeError::MissingData)
    }
}
