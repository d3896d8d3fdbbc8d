/// Errors that can occur during object storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The address does not map back to an object in this store.
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The object key is empty or would escape the store's namespace.
    #[error("invalid object key: {0}")]
    InvalidKey(String),
    #[error("object exceeds size limit ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },
    /// The remote backend rejected or failed the request.
    #[error("storage backend error: {0}")]
    Backend(String),
}

