//! Encounter participants and the templates they are seeded from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tk_core::{Ability, Character, Creature};

use crate::error::MechError;

/// Where a participant came from. Provenance only; all kinds behave alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantKind {
    /// Seeded from a stored character sheet.
    Character,
    /// Seeded from a reference creature.
    Creature,
    /// Entered by hand.
    Custom,
}

impl fmt::Display for ParticipantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Character => "character",
            Self::Creature => "creature",
            Self::Custom => "custom",
        })
    }
}

/// Condition of a participant.
///
/// Damage to 0 HP makes a participant unconscious and healing brings them
/// back. `Dead` is only ever set by hand and is never left automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Up and acting.
    #[default]
    Alive,
    /// At 0 HP.
    Unconscious,
    /// Out of the fight for good.
    Dead,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Alive => "alive",
            Self::Unconscious => "unconscious",
            Self::Dead => "dead",
        })
    }
}

impl FromStr for Status {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alive" | "up" => Ok(Self::Alive),
            "unconscious" | "down" | "ko" => Ok(Self::Unconscious),
            "dead" => Ok(Self::Dead),
            other => Err(MechError::UnknownStatus(other.to_string())),
        }
    }
}

/// Base stats used to create a participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantTemplate {
    /// Display name.
    pub name: String,
    /// Provenance tag.
    pub kind: ParticipantKind,
    /// Maximum hit points.
    pub hp_max: i32,
    /// Starting hit points, clamped to `[0, hp_max]` on creation.
    pub hp_current: i32,
    /// Armor class, display only.
    pub armor_class: i32,
    /// Added to 1d20 when initiative is rolled.
    pub initiative_bonus: i32,
}

impl ParticipantTemplate {
    /// A hand-entered participant at full health.
    pub fn custom(name: impl Into<String>, hp_max: i32, armor_class: i32) -> Self {
        Self {
            name: name.into(),
            kind: ParticipantKind::Custom,
            hp_max,
            hp_current: hp_max,
            armor_class,
            initiative_bonus: 0,
        }
    }

    /// Seed from a character sheet, keeping its current hit points.
    pub fn from_character(character: &Character) -> Self {
        Self {
            name: character.name.clone(),
            kind: ParticipantKind::Character,
            hp_max: character.hp_max,
            hp_current: character.hp_current,
            armor_class: character.armor_class,
            initiative_bonus: character.initiative_modifier(),
        }
    }

    /// Seed from a creature stat block at full health.
    pub fn from_creature(creature: &Creature) -> Self {
        let hp = creature.hit_point_value();
        Self {
            name: creature.name.clone(),
            kind: ParticipantKind::Creature,
            hp_max: hp,
            hp_current: hp,
            armor_class: creature.armor_class_value(),
            initiative_bonus: creature.scores().modifier(Ability::Dexterity),
        }
    }

    /// Set the initiative bonus.
    pub fn with_initiative_bonus(mut self, bonus: i32) -> Self {
        self.initiative_bonus = bonus;
        self
    }
}

/// One combatant in an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Display name, not necessarily unique.
    pub name: String,
    /// Provenance tag.
    pub kind: ParticipantKind,
    /// Maximum hit points.
    pub hp_max: i32,
    /// Current hit points, always within `[0, hp_max]`.
    pub hp_current: i32,
    /// Armor class.
    pub armor_class: i32,
    /// Turn order value; higher acts first.
    pub initiative: i32,
    /// Bonus used when initiative was rolled.
    pub initiative_bonus: i32,
    /// Current condition.
    pub status: Status,
}

impl Participant {
    /// Create an alive participant from a template and an initiative value.
    pub fn new(template: ParticipantTemplate, initiative: i32) -> Self {
        let hp_max = template.hp_max.max(0);
        Self {
            name: template.name,
            kind: template.kind,
            hp_max,
            hp_current: template.hp_current.clamp(0, hp_max),
            armor_class: template.armor_class,
            initiative,
            initiative_bonus: template.initiative_bonus,
            status: Status::Alive,
        }
    }

    /// Apply damage (negative) or healing (positive).
    ///
    /// Hit points are clamped to `[0, hp_max]`. Reaching 0 knocks the
    /// participant unconscious unless already dead; healing above 0
    /// revives an unconscious participant.
    pub fn apply_hp_delta(&mut self, delta: i32) {
        self.hp_current = self.hp_current.saturating_add(delta).clamp(0, self.hp_max);
        if self.hp_current == 0 {
            if self.status != Status::Dead {
                self.status = Status::Unconscious;
            }
        } else if self.status == Status::Unconscious {
            self.status = Status::Alive;
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) HP {}/{} AC {} Init {} [{}]",
            self.name,
            self.kind,
            self.hp_current,
            self.hp_max,
            self.armor_class,
            self.initiative,
            self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_template_uses_sheet() {
        let mut c = Character::new("Aria");
        c.hp_max = 24;
        c.hp_current = 17;
        c.armor_class = 15;
        c.ability_scores.dexterity = 16;
        let t = ParticipantTemplate::from_character(&c);
        assert_eq!(t.kind, ParticipantKind::Character);
        assert_eq!((t.hp_max, t.hp_current, t.armor_class), (24, 17, 15));
        assert_eq!(t.initiative_bonus, 3);
    }

    #[test]
    fn creature_template_parses_text_stats() {
        let mut goblin = Creature::named("Goblin");
        goblin.hit_points = "7 (2d6)".into();
        goblin.armor_class = "15 (leather armor, shield)".into();
        goblin.set_score(Ability::Dexterity, 14);
        let t = ParticipantTemplate::from_creature(&goblin);
        assert_eq!((t.hp_max, t.hp_current, t.armor_class), (7, 7, 15));
        assert_eq!(t.initiative_bonus, 2);
    }

    #[test]
    fn creature_template_defaults() {
        let t = ParticipantTemplate::from_creature(&Creature::named("Mystery"));
        assert_eq!((t.hp_max, t.armor_class), (0, 10));
    }

    #[test]
    fn new_participant_clamps_hp() {
        let mut t = ParticipantTemplate::custom("Bandit", 11, 12);
        t.hp_current = 40;
        let p = Participant::new(t, 9);
        assert_eq!(p.hp_current, 11);
        assert_eq!(p.status, Status::Alive);
    }

    #[test]
    fn dead_is_never_overwritten() {
        let mut p = Participant::new(ParticipantTemplate::custom("Zombie", 22, 8), 5);
        p.status = Status::Dead;
        p.apply_hp_delta(-30);
        assert_eq!(p.status, Status::Dead);
        p.apply_hp_delta(10);
        assert_eq!(p.status, Status::Dead);
        assert_eq!(p.hp_current, 10);
    }

    #[test]
    fn status_parse() {
        assert_eq!("Dead".parse::<Status>().unwrap(), Status::Dead);
        assert_eq!("down".parse::<Status>().unwrap(), Status::Unconscious);
        assert!("sleepy".parse::<Status>().is_err());
    }
}
