use catalog_db::{ObjectId, StoreError};
use thiserror::Error;

/// Failures of shop operations.
#[derive(Error, Debug)]
pub enum ShopError {
    /// A caller-supplied identifier is not well formed.
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),

    /// An update carried no fields.
    #[error("required fields are missing")]
    MissingFields,

    /// The record to update, or a record just written, is gone.
    #[error("shop '{0}' not found")]
    NotFound(ObjectId),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Settings(#[from] anyhow::Error),
}
