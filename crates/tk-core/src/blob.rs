//! Attributes stored as JSON text columns.
//!
//! The store keeps several sheet attributes as serialized text. Each one
//! is a concrete type implementing [`Blob`], so a value read back from the
//! database is the same value that was written.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{CoreError, CoreResult};

/// A value persisted as a JSON text column.
pub trait Blob: Serialize + DeserializeOwned + Default {
    /// Field name used in error messages.
    const FIELD: &'static str;

    /// Decode from stored text. Blank text yields the default value.
    fn parse_blob(text: &str) -> CoreResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(text).map_err(|e| CoreError::Blob {
            field: Self::FIELD,
            message: e.to_string(),
        })
    }

    /// Encode for storage.
    fn to_blob(&self) -> CoreResult<String> {
        serde_json::to_string(self).map_err(|e| CoreError::Blob {
            field: Self::FIELD,
            message: e.to_string(),
        })
    }
}

impl<T> Blob for Vec<T>
where
    T: Serialize + DeserializeOwned,
{
    const FIELD: &'static str = "list";
}
