use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid lead id: {0:?}")]
    InvalidLeadId(String),
    #[error("credential must not be empty")]
    EmptyCredential,
}

pub type Result<T> = std::result::Result<T, ModelError>;
