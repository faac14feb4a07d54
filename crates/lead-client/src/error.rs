//! Error types for the lead API boundary.

use thiserror::Error;

/// Failures of a call to the lead API.
///
/// The variants separate "the session is gone" from "the server could not
/// be reached" and "the server refused", so callers only log the user out
/// when the credential was actually rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApiError {
    /// The credential is missing, expired or rejected (401/403).
    #[error("not authorized")]
    Unauthorized,

    /// The requested resource does not exist (404).
    #[error("not found")]
    NotFound,

    /// Connection, DNS, TLS or timeout failure.
    #[error("server unreachable: {0}")]
    Unreachable(String),

    /// Any other non-success status.
    #[error("server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// The client could not be built from its configuration.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

/// Longest response body kept in [`ApiError::Server`].
const MAX_ERROR_BODY: usize = 512;

impl ApiError {
    /// Map a non-success status code and body to an error.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound,
            _ => Self::Server {
                status,
                message: truncate(body.trim(), MAX_ERROR_BODY),
            },
        }
    }

    /// Returns a user-friendly message suitable for a notification.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Unauthorized => "Sessão expirada. Faça login novamente.",
            Self::NotFound => "Registro não encontrado.",
            Self::Unreachable(_) => "Não foi possível conectar ao servidor.",
            Self::Server { .. } | Self::Decode(_) => "O servidor retornou um erro inesperado.",
            Self::InvalidConfig(_) => "Configuração inválida do cliente.",
        }
    }

    /// Whether the credential should be discarded.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Whether a retry could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unreachable(_) => true,
            Self::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.is_builder() {
            Self::InvalidConfig(err.to_string())
        } else if let Some(status) = err.status() {
            Self::from_status(status.as_u16(), &err.to_string())
        } else {
            Self::Unreachable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Result type alias for API calls.
pub type Result<T> = std::result::Result<T, ApiError>;
