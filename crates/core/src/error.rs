//! Error taxonomy for catalog operations.

use thiserror::Error;

use crate::validation::ValidationError;

/// Convenience alias used throughout the catalog core.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Failures surfaced by [`RecordStore`](crate::store::RecordStore) operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Submitted fields were rejected before any mutation happened.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The referenced record is not part of the collection.
    #[error("game not found: {0}")]
    NotFound(String),

    /// Reading or writing the key-value store failed.
    ///
    /// For writes the in-memory change has already been applied.
    #[error("persistence failed: {0}")]
    Persistence(#[from] StorageError),
}

/// Failures raised by a [`KeyValueStore`](crate::storage::KeyValueStore).
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem access failed.
    #[error("I/O error on key `{key}`: {source}")]
    Io {
        /// Key being read or written.
        key: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The write would exceed the store's capacity.
    #[error("storage quota exceeded writing `{key}` ({requested} bytes, limit {limit})")]
    QuotaExceeded {
        /// Key being written.
        key: String,
        /// Total bytes the store would hold after the write.
        requested: usize,
        /// Configured capacity in bytes.
        limit: usize,
    },

    /// Stored bytes could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
