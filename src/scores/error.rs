//! Storage error types.

use thiserror::Error;

/// Failure at the storage boundary.
///
/// Storage errors never change game state; a lost game stays lost even if
/// its score could not be saved.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    /// The store could not be reached
    #[error("Score storage unavailable: {0}")]
    Unavailable(String),

    /// The store refused the record
    #[error("Score storage rejected the record: {0}")]
    Rejected(String),

    /// A stored record could not be read back
    #[error("Stored score record is corrupt: {0}")]
    Corrupt(String),
}
