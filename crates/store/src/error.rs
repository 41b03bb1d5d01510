/// Crate-wide result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem fault while reading or writing a document.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A document on disk is not valid JSON for the expected shape.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
