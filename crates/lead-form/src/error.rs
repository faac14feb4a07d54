use thiserror::Error;

/// Errors raised while describing forms, never while validating them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FormError {
    /// A rule referenced a validator the registry does not know.
    #[error("unknown validator: {0}")]
    UnknownValidator(String),
}

pub type Result<T> = std::result::Result<T, FormError>;
