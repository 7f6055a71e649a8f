//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, single failures. Field-level validation
/// of a record is reported as a collection by the owning module, not here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (parse failure, or an attempt to change a
    /// record's identity).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A value cannot be represented by the domain type it was offered to.
    #[error("value out of range: {0}")]
    OutOfRange(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRange(msg.into())
    }
}
