//! Core types for Tablekeeper: characters, campaigns, and reference data.
//!
//! This crate defines the records that the store persists and the
//! mechanics engine reads. Free-form sheet attributes (ability scores,
//! proficiencies, currency, spells) are explicit types that serialize to
//! and from the JSON text kept in the database.

/// Abilities, skills, and ability score maps.
pub mod ability;
/// Typed JSON text attributes.
pub mod blob;
/// Campaign notes: quests, locations, NPCs, events, and images.
pub mod campaign;
/// Player character sheets.
pub mod character;
/// Error types used throughout the crate.
pub mod error;
/// Creature, spell, and item reference records.
pub mod reference;

/// Re-export ability types.
pub use ability::{Ability, AbilityScores, Skill, proficiency_bonus};
/// Re-export the blob trait.
pub use blob::Blob;
/// Re-export campaign record types.
pub use campaign::{Campaign, CampaignEvent, CampaignImage, ImageInfo, Location, Npc, Quest, QuestStatus};
/// Re-export character sheet types.
pub use character::{Character, Currency, SpellList, SpellSlots};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export reference record types.
pub use reference::{Creature, Item, ReferenceKind, ReferenceRecord, Spell};
