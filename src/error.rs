//! Error types for cellstore operations.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CellStoreError>;

/// Errors returned by cellstore operations.
///
/// "Not found" is never an error: queries over regions with no stored rooms
/// return empty result lists.
#[derive(Error, Debug)]
pub enum CellStoreError {
    /// Input rejected before any engine access: coordinates outside the
    /// valid ranges, non-finite values, or an invalid configuration.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Degenerate or malformed query region.
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    /// A covering computation produced zero cells, leaving the query with no
    /// scannable range.
    #[error("impossible covering: region produced no cells")]
    EmptyCovering,

    /// A stored payload or key could not be decoded.
    #[error("corrupt payload: {0}")]
    CorruptPayload(String),

    /// A value could not be encoded. The surrounding transaction is aborted;
    /// nothing is written.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Failure in the underlying storage engine.
    #[error("storage error: {0}")]
    Storage(#[from] redb::Error),
}

impl From<redb::DatabaseError> for CellStoreError {
    fn from(err: redb::DatabaseError) -> Self {
        CellStoreError::Storage(err.into())
    }
}

impl From<redb::TransactionError> for CellStoreError {
    fn from(err: redb::TransactionError) -> Self {
        CellStoreError::Storage(err.into())
    }
}

impl From<redb::TableError> for CellStoreError {
    fn from(err: redb::TableError) -> Self {
        CellStoreError::Storage(err.into())
    }
}

impl From<redb::StorageError> for CellStoreError {
    fn from(err: redb::StorageError) -> Self {
        CellStoreError::Storage(err.into())
    }
}

impl From<redb::CommitError> for CellStoreError {
    fn from(err: redb::CommitError) -> Self {
        CellStoreError::Storage(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CellStoreError::InvalidInput("latitude 91 outside [-90, 90]".to_string());
        assert_eq!(err.to_string(), "invalid input: latitude 91 outside [-90, 90]");

        let err = CellStoreError::EmptyCovering;
        assert!(err.to_string().contains("no cells"));
    }

    #[test]
    fn test_corrupt_payload_carries_context() {
        let err = CellStoreError::CorruptPayload("cell key must be exactly 8 bytes, got 3".to_string());
        assert!(err.to_string().contains("8 bytes"));
    }
}
