//! Reference records: creatures, spells, and magic items.
//!
//! Reference data is keyed by name. Stat blocks keep most values as the
//! free text printed in the source books ("135 (18d10+36)", "15 (chain
//! mail)"); helpers here pull the numbers out when the tracker needs them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ability::{Ability, AbilityScores, modifier_for};
use crate::error::{CoreError, CoreResult};

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(\d+)").unwrap());
static MODIFIER_LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([+-]?\d+\)").unwrap());

/// Item rarities in ascending order.
pub const RARITIES: [&str; 6] = ["common", "uncommon", "rare", "very rare", "legendary", "artifact"];

/// The integer at the start of a stat string, e.g. 135 in "135 (18d10+36)".
pub fn leading_number(text: &str) -> Option<i32> {
    LEADING_NUMBER
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

/// An ability score from text like "21 (+5)" or "21". Defaults to 10.
pub fn stat_value(text: &str) -> i32 {
    leading_number(text).unwrap_or(10)
}

/// The parenthesised modifier from text like "21 (+5)". Defaults to "(+0)".
pub fn modifier_label(text: &str) -> String {
    MODIFIER_LABEL
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "(+0)".to_string())
}

/// Format a modifier as a stat-block label, e.g. "(+3)" or "(-1)".
pub fn signed_label(modifier: i32) -> String {
    format!("({modifier:+})")
}

/// The three kinds of reference record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// A monster or NPC stat block.
    Creature,
    /// A spell.
    Spell,
    /// A magic or mundane item.
    Item,
}

impl ReferenceKind {
    /// All kinds.
    pub const ALL: [ReferenceKind; 3] = [Self::Creature, Self::Spell, Self::Item];

    /// Lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Creature => "creature",
            Self::Spell => "spell",
            Self::Item => "item",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReferenceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "creature" | "creatures" | "monster" | "monsters" => Ok(Self::Creature),
            "spell" | "spells" => Ok(Self::Spell),
            "item" | "items" => Ok(Self::Item),
            _ => Err(CoreError::UnknownReferenceKind(s.to_string())),
        }
    }
}

/// A creature stat block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct Creature {
    /// Row id, `None` until first saved.
    pub id: Option<i64>,
    /// Unique name.
    pub name: String,
    /// Size and type, e.g. "Large dragon".
    pub size: String,
    pub alignment: String,
    /// Challenge rating text, e.g. "5 (1,800 XP)".
    pub challenge: String,
    /// Hit point text, e.g. "65 (10d8+20)".
    pub hit_points: String,
    /// Armor class text, e.g. "15 (chain mail)".
    pub armor_class: String,
    pub speed: String,
    pub str_score: i32,
    pub dex_score: i32,
    pub con_score: i32,
    pub int_score: i32,
    pub wis_score: i32,
    pub cha_score: i32,
    pub str_mod: String,
    pub dex_mod: String,
    pub con_mod: String,
    pub int_mod: String,
    pub wis_mod: String,
    pub cha_mod: String,
    pub skills: String,
    pub saving_throws: String,
    pub senses: String,
    pub languages: String,
    /// Traits, actions, and legendary actions as Markdown.
    pub abilities: String,
    pub tags: Vec<String>,
    /// Where the record came from ("bestiary", "manual", "lookup").
    pub source: String,
}

impl Default for Creature {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            size: String::new(),
            alignment: String::new(),
            challenge: String::new(),
            hit_points: String::new(),
            armor_class: String::new(),
            speed: String::new(),
            str_score: 10,
            dex_score: 10,
            con_score: 10,
            int_score: 10,
            wis_score: 10,
            cha_score: 10,
            str_mod: "(+0)".into(),
            dex_mod: "(+0)".into(),
            con_mod: "(+0)".into(),
            int_mod: "(+0)".into(),
            wis_mod: "(+0)".into(),
            cha_mod: "(+0)".into(),
            skills: String::new(),
            saving_throws: String::new(),
            senses: String::new(),
            languages: String::new(),
            abilities: String::new(),
            tags: Vec::new(),
            source: String::new(),
        }
    }
}

impl Creature {
    /// A creature with just a name and default stats.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The six scores as an [`AbilityScores`] map.
    pub fn scores(&self) -> AbilityScores {
        AbilityScores {
            strength: self.str_score,
            dexterity: self.dex_score,
            constitution: self.con_score,
            intelligence: self.int_score,
            wisdom: self.wis_score,
            charisma: self.cha_score,
        }
    }

    /// Set a score and recompute its modifier label.
    pub fn set_score(&mut self, ability: Ability, score: i32) {
        let label = signed_label(modifier_for(score));
        let (slot, mod_slot) = match ability {
            Ability::Strength => (&mut self.str_score, &mut self.str_mod),
            Ability::Dexterity => (&mut self.dex_score, &mut self.dex_mod),
            Ability::Constitution => (&mut self.con_score, &mut self.con_mod),
            Ability::Intelligence => (&mut self.int_score, &mut self.int_mod),
            Ability::Wisdom => (&mut self.wis_score, &mut self.wis_mod),
            Ability::Charisma => (&mut self.cha_score, &mut self.cha_mod),
        };
        *slot = score;
        *mod_slot = label;
    }

    /// The printed modifier label for one ability.
    pub fn modifier_label(&self, ability: Ability) -> &str {
        match ability {
            Ability::Strength => &self.str_mod,
            Ability::Dexterity => &self.dex_mod,
            Ability::Constitution => &self.con_mod,
            Ability::Intelligence => &self.int_mod,
            Ability::Wisdom => &self.wis_mod,
            Ability::Charisma => &self.cha_mod,
        }
    }

    /// Average hit points from the hit point text, or 0 if absent.
    pub fn hit_point_value(&self) -> i32 {
        leading_number(&self.hit_points).unwrap_or(0)
    }

    /// Armor class from the armor class text, or 10 if absent.
    pub fn armor_class_value(&self) -> i32 {
        leading_number(&self.armor_class).unwrap_or(10)
    }

    /// Check required fields.
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("creature name is required".into()));
        }
        Ok(())
    }
}

/// A spell description.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct Spell {
    /// Row id, `None` until first saved.
    pub id: Option<i64>,
    /// Unique name.
    pub name: String,
    /// Spell level, 0 for cantrips.
    pub level: i32,
    pub school: String,
    pub casting_time: String,
    pub range: String,
    pub components: String,
    pub duration: String,
    pub description: String,
    /// Comma-separated class list.
    pub classes: String,
    pub source: String,
}

impl Spell {
    /// "Cantrip" or "Level N".
    pub fn level_label(&self) -> String {
        if self.level == 0 {
            "Cantrip".to_string()
        } else {
            format!("Level {}", self.level)
        }
    }

    /// Check required fields.
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("spell name is required".into()));
        }
        if !(0..=9).contains(&self.level) {
            return Err(CoreError::Validation(format!(
                "spell level must be between 0 and 9, got {}",
                self.level
            )));
        }
        Ok(())
    }
}

/// An item description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    /// Row id, `None` until first saved.
    pub id: Option<i64>,
    /// Unique name.
    pub name: String,
    /// Category, e.g. "Weapon" or "Wondrous Item".
    #[serde(rename = "type")]
    pub item_type: String,
    /// One of [`RARITIES`].
    pub rarity: String,
    /// Rules text.
    pub description: String,
    /// Additional key/value properties (damage, weight, attunement...).
    pub properties: BTreeMap<String, serde_json::Value>,
    /// Where the record came from.
    pub source: String,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            item_type: String::new(),
            rarity: "common".into(),
            description: String::new(),
            properties: BTreeMap::new(),
            source: String::new(),
        }
    }
}

impl Item {
    /// Check required fields and the rarity label.
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("item name is required".into()));
        }
        let rarity = self.rarity.trim().to_lowercase();
        if !RARITIES.contains(&rarity.as_str()) {
            return Err(CoreError::Validation(format!(
                "unknown rarity \"{}\" (expected one of: {})",
                self.rarity,
                RARITIES.join(", ")
            )));
        }
        Ok(())
    }
}

/// Any one reference record.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceRecord {
    /// A creature.
    Creature(Creature),
    /// A spell.
    Spell(Spell),
    /// An item.
    Item(Item),
}

impl ReferenceRecord {
    /// Build a record of the given kind from a JSON object.
    /// Missing fields take their defaults; unknown fields are ignored.
    pub fn from_json(kind: ReferenceKind, value: serde_json::Value) -> CoreResult<Self> {
        let blob_err = |e: serde_json::Error| CoreError::Blob {
            field: "reference record",
            message: e.to_string(),
        };
        let record = match kind {
            ReferenceKind::Creature => Self::Creature(serde_json::from_value(value).map_err(blob_err)?),
            ReferenceKind::Spell => Self::Spell(serde_json::from_value(value).map_err(blob_err)?),
            ReferenceKind::Item => Self::Item(serde_json::from_value(value).map_err(blob_err)?),
        };
        Ok(record)
    }

    /// The record's kind.
    pub fn kind(&self) -> ReferenceKind {
        match self {
            Self::Creature(_) => ReferenceKind::Creature,
            Self::Spell(_) => ReferenceKind::Spell,
            Self::Item(_) => ReferenceKind::Item,
        }
    }

    /// The record's unique name.
    pub fn name(&self) -> &str {
        match self {
            Self::Creature(c) => &c.name,
            Self::Spell(s) => &s.name,
            Self::Item(i) => &i.name,
        }
    }

    /// Overwrite the `source` field.
    pub fn set_source(&mut self, source: &str) {
        let slot = match self {
            Self::Creature(c) => &mut c.source,
            Self::Spell(s) => &mut s.source,
            Self::Item(i) => &mut i.source,
        };
        *slot = source.to_string();
    }

    /// Check required fields.
    pub fn validate(&self) -> CoreResult<()> {
        match self {
            Self::Creature(c) => c.validate(),
            Self::Spell(s) => s.validate(),
            Self::Item(i) => i.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_from_stat_text() {
        assert_eq!(leading_number("135 (18d10+36)"), Some(135));
        assert_eq!(leading_number("  17 (natural armor)"), Some(17));
        assert_eq!(leading_number("see below"), None);
        assert_eq!(stat_value("21 (+5)"), 21);
        assert_eq!(stat_value("—"), 10);
        assert_eq!(modifier_label("21 (+5)"), "(+5)");
        assert_eq!(modifier_label("8 (-1)"), "(-1)");
        assert_eq!(modifier_label("8"), "(+0)");
        assert_eq!(signed_label(3), "(+3)");
        assert_eq!(signed_label(-2), "(-2)");
        assert_eq!(signed_label(0), "(+0)");
    }

    #[test]
    fn creature_hp_and_ac() {
        let mut goblin = Creature::named("Goblin");
        assert_eq!(goblin.hit_point_value(), 0);
        assert_eq!(goblin.armor_class_value(), 10);
        goblin.hit_points = "7 (2d6)".into();
        goblin.armor_class = "15 (leather armor, shield)".into();
        assert_eq!(goblin.hit_point_value(), 7);
        assert_eq!(goblin.armor_class_value(), 15);
    }

    #[test]
    fn set_score_updates_label() {
        let mut ogre = Creature::named("Ogre");
        ogre.set_score(Ability::Strength, 19);
        assert_eq!(ogre.str_score, 19);
        assert_eq!(ogre.modifier_label(Ability::Strength), "(+4)");
        assert_eq!(ogre.scores().strength, 19);
    }

    #[test]
    fn kind_parsing() {
        assert_eq!("Monsters".parse::<ReferenceKind>().unwrap(), ReferenceKind::Creature);
        assert_eq!("spell".parse::<ReferenceKind>().unwrap(), ReferenceKind::Spell);
        assert!("vehicle".parse::<ReferenceKind>().is_err());
    }

    #[test]
    fn record_from_json_fills_defaults() {
        let value = serde_json::json!({
            "name": "Bag of Holding",
            "type": "Wondrous Item",
            "rarity": "uncommon",
            "properties": {"weight": "15 lb."},
            "extra": true
        });
        let record = ReferenceRecord::from_json(ReferenceKind::Item, value).unwrap();
        assert_eq!(record.kind(), ReferenceKind::Item);
        assert_eq!(record.name(), "Bag of Holding");
        let ReferenceRecord::Item(item) = record else {
            panic!("expected item");
        };
        assert_eq!(item.item_type, "Wondrous Item");
        assert_eq!(item.properties["weight"], "15 lb.");
    }

    #[test]
    fn record_validation() {
        let spell = Spell {
            name: "Wish".into(),
            level: 10,
            ..Spell::default()
        };
        assert!(spell.validate().is_err());
        let item = Item {
            name: "Rope".into(),
            rarity: "mythic".into(),
            ..Item::default()
        };
        assert!(item.validate().is_err());
        assert!(Item { name: "Rope".into(), ..Item::default() }.validate().is_ok());
    }
}
