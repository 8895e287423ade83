//! Player character sheets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ability::{Ability, AbilityScores, Skill, proficiency_bonus};
use crate::blob::Blob;
use crate::error::{CoreError, CoreResult};

/// Coins carried by a character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// Platinum pieces.
    #[serde(default)]
    pub pp: u32,
    /// Gold pieces.
    #[serde(default)]
    pub gp: u32,
    /// Electrum pieces.
    #[serde(default)]
    pub ep: u32,
    /// Silver pieces.
    #[serde(default)]
    pub sp: u32,
    /// Copper pieces.
    #[serde(default)]
    pub cp: u32,
}

impl Blob for Currency {
    const FIELD: &'static str = "currency";
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} pp, {} gp, {} ep, {} sp, {} cp",
            self.pp, self.gp, self.ep, self.sp, self.cp
        )
    }
}

/// Known or prepared spells grouped by spell level (0 = cantrips).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpellList(pub BTreeMap<u8, Vec<String>>);

impl SpellList {
    /// Add a spell at the given level, keeping insertion order within a level.
    pub fn add(&mut self, level: u8, name: impl Into<String>) {
        self.0.entry(level).or_default().push(name.into());
    }

    /// Total number of spells across all levels.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Whether no spells are recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Blob for SpellList {
    const FIELD: &'static str = "spells";
}

/// Spell slots per slot level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpellSlots(pub BTreeMap<u8, u32>);

const FULL_CASTER_SLOTS: [[u32; 9]; 20] = [
    [2, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 0, 0, 0, 0, 0, 0, 0, 0],
    [4, 2, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 2, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 1, 0, 0, 0, 0, 0],
    [4, 3, 3, 2, 0, 0, 0, 0, 0],
    [4, 3, 3, 3, 1, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 1],
    [4, 3, 3, 3, 3, 1, 1, 1, 1],
    [4, 3, 3, 3, 3, 2, 1, 1, 1],
    [4, 3, 3, 3, 3, 2, 2, 1, 1],
];

impl SpellSlots {
    /// Standard full-caster slots for a character level (1-20).
    pub fn full_caster(level: i32) -> Self {
        let row = (level.clamp(1, 20) - 1) as usize;
        let slots = FULL_CASTER_SLOTS[row]
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(i, count)| (i as u8 + 1, *count))
            .collect();
        Self(slots)
    }

    /// Slots available at one slot level.
    pub fn at(&self, slot_level: u8) -> u32 {
        self.0.get(&slot_level).copied().unwrap_or(0)
    }
}

impl Blob for SpellSlots {
    const FIELD: &'static str = "spell_slots";
}

/// A player character sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Row id, `None` until first saved.
    pub id: Option<i64>,
    /// Owning campaign, if any.
    pub campaign_id: Option<i64>,
    /// Character name (required).
    pub name: String,
    /// Name of the player running the character.
    pub player_name: String,
    /// Race or species.
    pub race: String,
    /// Class name.
    pub class: String,
    /// Subclass name.
    pub subclass: String,
    /// Character level, 1-20.
    pub level: i32,
    /// Background.
    pub background: String,
    /// Alignment.
    pub alignment: String,
    /// Experience points.
    pub xp: i64,
    /// The six ability scores.
    pub ability_scores: AbilityScores,
    /// Saving throws the character is proficient in.
    pub save_proficiencies: Vec<Ability>,
    /// Skills the character is proficient in.
    pub skill_proficiencies: Vec<Skill>,
    /// Maximum hit points.
    pub hp_max: i32,
    /// Current hit points.
    pub hp_current: i32,
    /// Temporary hit points.
    pub hp_temp: i32,
    /// Armor class.
    pub armor_class: i32,
    /// Walking speed in feet.
    pub speed: i32,
    /// Extra initiative bonus on top of the DEX modifier.
    pub initiative_bonus: i32,
    /// Class and racial features, in display order.
    pub features: Vec<String>,
    /// Equipment, in display order.
    pub equipment: Vec<String>,
    /// Coins carried.
    pub currency: Currency,
    /// Spells by level.
    pub spells: SpellList,
    /// Spell slots by slot level.
    pub spell_slots: SpellSlots,
    /// Free-text notes.
    pub notes: String,
    /// Creation timestamp as stored.
    pub created_at: Option<String>,
    /// Last update timestamp as stored.
    pub updated_at: Option<String>,
}

impl Character {
    /// A level 1 character with 5e defaults (AC 10, speed 30, all scores 10).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            campaign_id: None,
            name: name.into(),
            player_name: String::new(),
            race: String::new(),
            class: String::new(),
            subclass: String::new(),
            level: 1,
            background: String::new(),
            alignment: String::new(),
            xp: 0,
            ability_scores: AbilityScores::default(),
            save_proficiencies: Vec::new(),
            skill_proficiencies: Vec::new(),
            hp_max: 0,
            hp_current: 0,
            hp_temp: 0,
            armor_class: 10,
            speed: 30,
            initiative_bonus: 0,
            features: Vec::new(),
            equipment: Vec::new(),
            currency: Currency::default(),
            spells: SpellList::default(),
            spell_slots: SpellSlots::default(),
            notes: String::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Check the fields a save requires.
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("character name is required".into()));
        }
        if !(1..=20).contains(&self.level) {
            return Err(CoreError::Validation(format!(
                "level must be between 1 and 20, got {}",
                self.level
            )));
        }
        if self.hp_max < 0 || self.hp_temp < 0 {
            return Err(CoreError::Validation("hit points cannot be negative".into()));
        }
        Ok(())
    }

    /// Proficiency bonus for the character's level.
    pub fn proficiency_bonus(&self) -> i32 {
        proficiency_bonus(self.level)
    }

    /// Initiative modifier: DEX modifier plus any extra bonus.
    pub fn initiative_modifier(&self) -> i32 {
        self.ability_scores
            .modifier(Ability::Dexterity)
            .saturating_add(self.initiative_bonus)
    }

    /// Adjust current hit points by `delta`, clamped to `[0, hp_max]`.
    /// Returns the new value.
    pub fn adjust_hp(&mut self, delta: i32) -> i32 {
        self.hp_current = self.hp_current.saturating_add(delta).clamp(0, self.hp_max.max(0));
        self.hp_current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_character_defaults() {
        let c = Character::new("Aria");
        assert_eq!(c.level, 1);
        assert_eq!(c.armor_class, 10);
        assert_eq!(c.speed, 30);
        assert_eq!(c.proficiency_bonus(), 2);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn validation_rejects_blank_name_and_bad_level() {
        assert!(Character::new("  ").validate().is_err());
        let mut c = Character::new("Aria");
        c.level = 21;
        assert!(c.validate().is_err());
    }

    #[test]
    fn initiative_uses_dex() {
        let mut c = Character::new("Aria");
        c.ability_scores.dexterity = 16;
        c.initiative_bonus = 1;
        assert_eq!(c.initiative_modifier(), 4);
    }

    #[test]
    fn hp_clamps() {
        let mut c = Character::new("Aria");
        c.hp_max = 12;
        c.hp_current = 12;
        assert_eq!(c.adjust_hp(-20), 0);
        assert_eq!(c.adjust_hp(5), 5);
        assert_eq!(c.adjust_hp(50), 12);
    }

    #[test]
    fn currency_round_trip() {
        let coins = Currency { pp: 1, gp: 25, ep: 0, sp: 7, cp: 3 };
        let blob = coins.to_blob().unwrap();
        assert_eq!(Currency::parse_blob(&blob).unwrap(), coins);
        assert_eq!(Currency::parse_blob(r#"{"gp": 5}"#).unwrap().gp, 5);
    }

    #[test]
    fn spell_list_keys_are_level_strings() {
        let mut spells = SpellList::default();
        spells.add(0, "Fire Bolt");
        spells.add(1, "Shield");
        spells.add(1, "Magic Missile");
        let blob = spells.to_blob().unwrap();
        assert_eq!(
            blob,
            r#"{"0":["Fire Bolt"],"1":["Shield","Magic Missile"]}"#
        );
        assert_eq!(SpellList::parse_blob(&blob).unwrap(), spells);
        assert_eq!(spells.len(), 3);
    }

    #[test]
    fn full_caster_slot_table() {
        let slots = SpellSlots::full_caster(5);
        assert_eq!(slots.at(1), 4);
        assert_eq!(slots.at(2), 3);
        assert_eq!(slots.at(3), 2);
        assert_eq!(slots.at(4), 0);
        let top = SpellSlots::full_caster(20);
        assert_eq!(top.at(9), 1);
        assert_eq!(top.at(7), 2);
        let blob = top.to_blob().unwrap();
        assert_eq!(SpellSlots::parse_blob(&blob).unwrap(), top);
    }
}
