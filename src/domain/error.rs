//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed hierarchies.
/// Missing ids and orphans are not errors; lookups report them as empty results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The parent chain loops back onto itself. Carries the `Debug` rendering
    /// of the id that closed the loop.
    #[error("cycle detected in hierarchy at id: {0}")]
    CycleDetected(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
