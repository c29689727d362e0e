//! Store error types.

use thiserror::Error;

/// Errors surfaced by a [`Store`](crate::Store) backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A write would break a unique index.
    #[error("duplicate value '{value}' for unique field '{field}' in collection '{collection}'")]
    DuplicateKey {
        collection: String,
        field: String,
        value: String,
    },

    /// A value could not be turned into a document.
    #[error("value is not a document: {0}")]
    NotADocument(String),

    /// Failed to (de)serialize a document.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend itself failed.
    #[error("store backend error: {0}")]
    Backend(String),
}
