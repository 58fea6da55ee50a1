//! Storage layer error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the storage layer.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to open database file {path:?}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Byte range out of page bounds: offset {offset} + length {len} exceeds {page_size}")]
    OutOfRange {
        offset: usize,
        len: usize,
        page_size: usize,
    },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
