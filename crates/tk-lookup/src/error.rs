//! Error types for content lookups.

use tk_core::CoreError;

/// Errors from the external content source.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// No API key is configured.
    #[error("lookups are not configured: set lookup.api_key or TABLEKEEPER_LOOKUP__API_KEY")]
    NotConfigured,

    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API error: {status}")]
    Api {
        /// HTTP status code.
        status: u16,
    },

    /// The service returned no message.
    #[error("the service returned an empty response")]
    EmptyResponse,

    /// The reply contained no usable JSON object.
    #[error("no record found for \"{subject}\"")]
    NoRecord {
        /// The subject that was looked up.
        subject: String,
    },

    /// The JSON did not fit the record schema.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience result type for lookups.
pub type LookupResult<T> = Result<T, LookupError>;
