pub mod adapter;
pub mod mem;

use thiserror::Error;

pub use adapter::{Collection, DocumentStore, Order};
pub use mem::MemStore;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistence failures surfaced to the caller. The core never retries;
/// `Transient` is reported upward for the caller to decide on retry policy.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("transient store failure: {0}")]
    Transient(String),
}

impl StoreError {
    pub fn not_found(collection: Collection, id: &str) -> Self {
        StoreError::NotFound {
            collection: collection.name().to_owned(),
            id: id.to_owned(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
