//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent rejected user intents.
///
/// The mutation functions themselves never fail; these are raised by the
/// session before it calls into them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("child label is empty")]
    EmptyLabel,

    #[error("root node cannot be removed")]
    RootNotRemovable,
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
