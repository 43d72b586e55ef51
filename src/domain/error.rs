//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::NodeId;

/// Domain errors are raised only by the explicit value API.
///
/// Keyboard commands never fail; a stale handle there is a silent no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
