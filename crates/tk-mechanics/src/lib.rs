//! Table mechanics for Tablekeeper.
//!
//! Provides dice resolution with advantage and disadvantage, a bounded roll
//! history, the initiative tracker for encounters, d20 checks against
//! character sheets, and the [`Session`] object that ties them together
//! for one sitting at the table.

pub mod checks;
pub mod config;
pub mod dice;
pub mod encounter;
pub mod error;
pub mod history;
pub mod resolution;
pub mod session;

pub use checks::CheckKind;
pub use config::SessionConfig;
pub use dice::{DicePool, DiceRequest, Die, RollMode, RollResult};
pub use encounter::{
    Encounter, InitiativeSource, Joined, MAX_COPIES, Participant, ParticipantKind,
    ParticipantTemplate, Status,
};
pub use error::{MechError, MechResult};
pub use history::{HistoryEntry, RollHistory};
pub use resolution::{Resolution, resolve};
pub use session::Session;
