/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when building or decoding records.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A required field is missing or a value is out of range.
    #[error("validation error: {0}")]
    Validation(String),

    /// A stored JSON attribute could not be decoded or encoded.
    #[error("invalid {field} data: {message}")]
    Blob {
        /// The attribute being decoded.
        field: &'static str,
        /// What went wrong.
        message: String,
    },

    /// An ability name was not one of STR, DEX, CON, INT, WIS, CHA.
    #[error("unknown ability: \"{0}\"")]
    UnknownAbility(String),

    /// A skill name did not match any 5e skill.
    #[error("unknown skill: \"{0}\"")]
    UnknownSkill(String),

    /// A reference kind was not creature, spell, or item.
    #[error("unknown reference kind: \"{0}\" (expected creature, spell, or item)")]
    UnknownReferenceKind(String),

    /// A quest status was not active, completed, or failed.
    #[error("unknown quest status: \"{0}\" (expected active, completed, or failed)")]
    UnknownQuestStatus(String),
}
