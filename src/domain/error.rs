//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors are invariant violations of the tree engine.
///
/// Expected conditions (duplicate key, key not found) are not errors; they are
/// reported through [`Insertion`](crate::domain::Insertion) and `Option` results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("index range {low}..={high} out of bounds for sequence of length {len}")]
    RangeOutOfBounds { low: usize, high: usize, len: usize },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;
