//! Library error type.
//!
//! Validation failures ([`VaultError::InvalidInput`]) and registry misses
//! ([`VaultError::NotFound`]) are separate variants so callers can tell a
//! malformed request from a well-formed one that matched nothing. A lookup
//! miss in [`crate::lookup`] is not an error at all.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("{0}")]
    InvalidInput(#[from] InputProblem),

    #[error("word not found: {word}")]
    NotFound { word: String },

    #[error("table not found in document: {0}")]
    MissingTable(String),

    #[error("word payload could not be encoded: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Why an input was rejected before any lookup happened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputProblem {
    #[error("Input cannot be null")]
    Null,

    #[error("Invalid type: expected text, found {found}")]
    WrongType { found: &'static str },

    #[error("Invalid input: numeric text {0:?}")]
    NumericText(String),

    #[error("Invalid input: missing required field `{0}`")]
    MissingField(&'static str),

    #[error("Invalid input: word already tagged: {0}")]
    AlreadyTagged(String),

    #[error("Invalid update: meaning required")]
    EmptyMeaning,

    #[error("Invalid text input")]
    EmptyText,
}

pub type Result<T, E = VaultError> = std::result::Result<T, E>;

impl VaultError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, VaultError::InvalidInput(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, VaultError::NotFound { .. })
    }
}
