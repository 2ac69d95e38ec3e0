//! Controller error types

use thiserror::Error;

use crate::controller::PhaseKind;
use crate::draft::DraftError;

/// ListController 错误类型
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Client error: {0}")]
    Client(#[from] catalog_client::ClientError),

    #[error("Invalid draft: {0}")]
    Draft(#[from] DraftError),

    #[error("Cannot {action} while {phase}")]
    InvalidPhase {
        action: &'static str,
        phase: PhaseKind,
    },

    #[error("An update is already in progress")]
    UpdateInFlight,

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Subcategory {0} is not offered for the selected category")]
    UnknownSubcategory(String),
}

impl ControllerError {
    /// Text suitable for showing to the operator
    pub fn user_message(&self) -> String {
        match self {
            ControllerError::Client(e) => e.user_message(),
            ControllerError::Draft(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}

pub type ControllerResult<T> = Result<T, ControllerError>;
