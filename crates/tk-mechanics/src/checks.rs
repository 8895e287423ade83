//! Ability checks, saving throws, and skill checks for a character sheet.

use std::fmt;
use std::str::FromStr;

use tk_core::{Ability, Character, Skill};

use crate::dice::{DiceRequest, RollMode};
use crate::error::{MechError, MechResult};

/// What a d20 check is testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// A raw ability check.
    Ability(Ability),
    /// A saving throw.
    Save(Ability),
    /// A skill check.
    Skill(Skill),
}

impl CheckKind {
    /// Total modifier for this check on a character.
    ///
    /// Saves and skills add the proficiency bonus when the character is
    /// proficient.
    pub fn modifier(self, character: &Character) -> i32 {
        let scores = &character.ability_scores;
        match self {
            Self::Ability(ability) => scores.modifier(ability),
            Self::Save(ability) => {
                let proficient = character.save_proficiencies.contains(&ability);
                scores.modifier(ability) + proficiency_if(proficient, character)
            }
            Self::Skill(skill) => {
                let proficient = character.skill_proficiencies.contains(&skill);
                scores.modifier(skill.ability()) + proficiency_if(proficient, character)
            }
        }
    }

    /// Roll label, e.g. "Aria Stealth".
    pub fn label(self, character: &Character) -> String {
        format!("{} {self}", character.name)
    }

    /// The 1d20 request for this check.
    pub fn request(self, character: &Character, mode: RollMode) -> DiceRequest {
        DiceRequest::d20(self.modifier(character)).with_mode(mode)
    }
}

fn proficiency_if(proficient: bool, character: &Character) -> i32 {
    if proficient {
        character.proficiency_bonus()
    } else {
        0
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ability(a) => write!(f, "{} check", a.code()),
            Self::Save(a) => write!(f, "{} save", a.code()),
            Self::Skill(s) => f.write_str(s.name()),
        }
    }
}

impl FromStr for CheckKind {
    type Err = MechError;

    /// Accepts `DEX`, `dexterity`, `save:WIS`, `Stealth`, `sleight-of-hand`.
    fn from_str(s: &str) -> MechResult<Self> {
        let trimmed = s.trim();
        let unknown = || MechError::UnknownCheck(trimmed.to_string());
        if let Some((prefix, rest)) = trimmed.split_once(':') {
            if prefix.trim().eq_ignore_ascii_case("save") {
                return rest.parse().map(Self::Save).map_err(|_| unknown());
            }
            return Err(unknown());
        }
        if let Ok(ability) = trimmed.parse::<Ability>() {
            return Ok(Self::Ability(ability));
        }
        trimmed.parse::<Skill>().map(Self::Skill).map_err(|_| unknown())
    }
}
