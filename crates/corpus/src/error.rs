use thiserror::Error;

/// Errors raised by corpus stores.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// No record with the requested id, or the record is not of the
    /// requested kind.
    #[error("record not found: {id}")]
    RecordNotFound { id: String },

    /// The storage backend itself failed.
    #[error("corpus backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(id: impl Into<String>) -> Self {
        StoreError::RecordNotFound { id: id.into() }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        StoreError::Backend(message.into())
    }
}
