//! Error types for the store.

use tk_core::CoreError;

/// Errors that can occur while reading or writing the database.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database rejected a query.
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// A record failed validation or a stored blob could not be parsed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// No row with this id exists.
    #[error("no {table} row with id {id}")]
    NotFound {
        /// Table that was searched.
        table: &'static str,
        /// The missing id.
        id: i64,
    },

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The zip container could not be read or written.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image data in an archive was not valid base64.
    #[error("invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),

    /// An archive was readable but its contents were not.
    #[error("malformed archive: {0}")]
    Archive(String),
}

/// Convenience result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
