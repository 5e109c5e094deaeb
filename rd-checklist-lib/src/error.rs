use rd_checklist_db::{OperationError, SchemaError};
use thiserror::Error;

/// Errors returned by [`crate::Checklist`].
#[derive(Debug, Error)]
pub enum ChecklistError {
    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Caller-facing classification of a [`ChecklistError`].
///
/// Everything except `Storage` is a recoverable request error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown set, card, or (card, rarity) pair.
    NotFound,
    /// Override attempted on a field outside the entity's table.
    InvalidField,
    /// Malformed or out-of-range value.
    InvalidValue,
    /// Database failure.
    Storage,
}

impl ChecklistError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Operation(OperationError::NotFound { .. }) => ErrorKind::NotFound,
            Self::Operation(OperationError::InvalidField { .. }) => ErrorKind::InvalidField,
            Self::Operation(OperationError::InvalidValue(_)) => ErrorKind::InvalidValue,
            Self::Operation(OperationError::Sqlite(_)) | Self::Schema(_) => ErrorKind::Storage,
        }
    }
}
