//! Error types for the application core.

use std::path::PathBuf;

use thiserror::Error;

use lead_client::{ApiError, CredentialError};

/// Errors returned by controllers.
///
/// Controllers have already reported these to the user through view
/// events; callers use them for exit codes and logging.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdminError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Page sizes start at 1.
    #[error("page size must be at least 1")]
    InvalidPageSize,

    /// The export could not be written.
    #[error("failed to write export to {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The form did not pass validation.
    #[error("invalid fields: {}", .fields.join(", "))]
    Invalid { fields: Vec<String> },
}

impl AdminError {
    /// Returns a user-friendly message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message().to_string(),
            Self::Credential(e) => e.user_message().to_string(),
            Self::InvalidPageSize => "O tamanho da página deve ser maior que zero.".to_string(),
            Self::Export { .. } => "Ocorreu um erro ao exportar os leads.".to_string(),
            Self::Invalid { fields } => {
                format!("Corrija os campos: {}", fields.join(", "))
            }
        }
    }

    /// Whether the session was rejected.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_unauthorized())
    }
}

/// Result type alias for controller operations.
pub type Result<T> = std::result::Result<T, AdminError>;
