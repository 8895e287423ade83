//! Error types for the mechanics engine.

/// Errors that can occur during mechanics operations.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A participant index does not refer to anyone in the encounter.
    #[error("no participant at index {index} (encounter has {len})")]
    IndexOutOfRange {
        /// The index that was requested.
        index: usize,
        /// Number of participants at the time of the call.
        len: usize,
    },

    /// A dice expression could not be understood.
    #[error("invalid dice expression: {0}")]
    InvalidDice(String),

    /// A check name was not an ability, save, or skill.
    #[error("unknown check: \"{0}\" (try DEX, save:WIS, or Stealth)")]
    UnknownCheck(String),

    /// A status name was not alive, unconscious, or dead.
    #[error("unknown status: \"{0}\" (expected alive, unconscious, or dead)")]
    UnknownStatus(String),

    /// No lookup draft is waiting for confirmation.
    #[error("no pending draft to confirm")]
    NoDraft,
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
