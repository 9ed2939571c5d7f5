//! # Error Types
//!
//! Store-level errors.
//!
//! Only one condition in this layer is an error: the persistence backend
//! failing to save. Everything else (unknown ids, duplicate adds, double
//! returns) is an expected no-op reported through [`crate::store::Outcome`].

use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by the state store.
///
/// A `Persistence` error is non-fatal: the in-memory mutation has already
/// applied, the session keeps working from memory, and the caller may retry
/// the save or warn the user that persistence is degraded.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage adapter failed to save a collection.
    #[error("failed to persist {key}: {source}")]
    Persistence {
        key: &'static str,
        #[source]
        source: StorageError,
    },
}

/// Convenience type alias for Results with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;
