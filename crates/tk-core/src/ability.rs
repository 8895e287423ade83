use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// One of the six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ability {
    /// Strength.
    #[serde(rename = "STR")]
    Strength,
    /// Dexterity.
    #[serde(rename = "DEX")]
    Dexterity,
    /// Constitution.
    #[serde(rename = "CON")]
    Constitution,
    /// Intelligence.
    #[serde(rename = "INT")]
    Intelligence,
    /// Wisdom.
    #[serde(rename = "WIS")]
    Wisdom,
    /// Charisma.
    #[serde(rename = "CHA")]
    Charisma,
}

impl Ability {
    /// All abilities in sheet order.
    pub const ALL: [Ability; 6] = [
        Self::Strength,
        Self::Dexterity,
        Self::Constitution,
        Self::Intelligence,
        Self::Wisdom,
        Self::Charisma,
    ];

    /// The three-letter code used on sheets and in stored data.
    pub fn code(self) -> &'static str {
        match self {
            Self::Strength => "STR",
            Self::Dexterity => "DEX",
            Self::Constitution => "CON",
            Self::Intelligence => "INT",
            Self::Wisdom => "WIS",
            Self::Charisma => "CHA",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Ability {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "str" | "strength" => Ok(Self::Strength),
            "dex" | "dexterity" => Ok(Self::Dexterity),
            "con" | "constitution" => Ok(Self::Constitution),
            "int" | "intelligence" => Ok(Self::Intelligence),
            "wis" | "wisdom" => Ok(Self::Wisdom),
            "cha" | "charisma" => Ok(Self::Charisma),
            _ => Err(CoreError::UnknownAbility(s.to_string())),
        }
    }
}

/// The 5e skill list. Each skill is keyed to one ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Skill {
    Acrobatics,
    #[serde(rename = "Animal Handling")]
    AnimalHandling,
    Arcana,
    Athletics,
    Deception,
    History,
    Insight,
    Intimidation,
    Investigation,
    Medicine,
    Nature,
    Perception,
    Performance,
    Persuasion,
    Religion,
    #[serde(rename = "Sleight of Hand")]
    SleightOfHand,
    Stealth,
    Survival,
}

impl Skill {
    /// All skills in alphabetical order.
    pub const ALL: [Skill; 18] = [
        Self::Acrobatics,
        Self::AnimalHandling,
        Self::Arcana,
        Self::Athletics,
        Self::Deception,
        Self::History,
        Self::Insight,
        Self::Intimidation,
        Self::Investigation,
        Self::Medicine,
        Self::Nature,
        Self::Perception,
        Self::Performance,
        Self::Persuasion,
        Self::Religion,
        Self::SleightOfHand,
        Self::Stealth,
        Self::Survival,
    ];

    /// Display name as printed on a sheet.
    pub fn name(self) -> &'static str {
        match self {
            Self::Acrobatics => "Acrobatics",
            Self::AnimalHandling => "Animal Handling",
            Self::Arcana => "Arcana",
            Self::Athletics => "Athletics",
            Self::Deception => "Deception",
            Self::History => "History",
            Self::Insight => "Insight",
            Self::Intimidation => "Intimidation",
            Self::Investigation => "Investigation",
            Self::Medicine => "Medicine",
            Self::Nature => "Nature",
            Self::Perception => "Perception",
            Self::Performance => "Performance",
            Self::Persuasion => "Persuasion",
            Self::Religion => "Religion",
            Self::SleightOfHand => "Sleight of Hand",
            Self::Stealth => "Stealth",
            Self::Survival => "Survival",
        }
    }

    /// The ability this skill is rolled with.
    pub fn ability(self) -> Ability {
        match self {
            Self::Athletics => Ability::Strength,
            Self::Acrobatics | Self::SleightOfHand | Self::Stealth => Ability::Dexterity,
            Self::Arcana
            | Self::History
            | Self::Investigation
            | Self::Nature
            | Self::Religion => Ability::Intelligence,
            Self::AnimalHandling
            | Self::Insight
            | Self::Medicine
            | Self::Perception
            | Self::Survival => Ability::Wisdom,
            Self::Deception | Self::Intimidation | Self::Performance | Self::Persuasion => {
                Ability::Charisma
            }
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Skill {
    type Err = CoreError;

    /// Case-insensitive; spaces, underscores and hyphens are interchangeable.
    fn from_str(s: &str) -> CoreResult<Self> {
        let wanted = normalize_skill(s);
        Self::ALL
            .into_iter()
            .find(|skill| normalize_skill(skill.name()) == wanted)
            .ok_or_else(|| CoreError::UnknownSkill(s.to_string()))
    }
}

fn normalize_skill(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lowest legal ability score.
pub const MIN_SCORE: i32 = 1;
/// Highest legal ability score.
pub const MAX_SCORE: i32 = 30;

fn default_score() -> i32 {
    10
}

/// The six ability scores of a character or creature.
///
/// Stored as a JSON object keyed by ability code. Missing keys read as 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    /// Strength score.
    #[serde(rename = "STR", default = "default_score")]
    pub strength: i32,
    /// Dexterity score.
    #[serde(rename = "DEX", default = "default_score")]
    pub dexterity: i32,
    /// Constitution score.
    #[serde(rename = "CON", default = "default_score")]
    pub constitution: i32,
    /// Intelligence score.
    #[serde(rename = "INT", default = "default_score")]
    pub intelligence: i32,
    /// Wisdom score.
    #[serde(rename = "WIS", default = "default_score")]
    pub wisdom: i32,
    /// Charisma score.
    #[serde(rename = "CHA", default = "default_score")]
    pub charisma: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::uniform(10)
    }
}

impl AbilityScores {
    /// All six scores set to the same value.
    pub fn uniform(score: i32) -> Self {
        Self {
            strength: score,
            dexterity: score,
            constitution: score,
            intelligence: score,
            wisdom: score,
            charisma: score,
        }
    }

    /// The score for one ability.
    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    /// Replace the score for one ability, clamped to
    /// [`MIN_SCORE`]..=[`MAX_SCORE`].
    pub fn set(&mut self, ability: Ability, score: i32) {
        let slot = match ability {
            Ability::Strength => &mut self.strength,
            Ability::Dexterity => &mut self.dexterity,
            Ability::Constitution => &mut self.constitution,
            Ability::Intelligence => &mut self.intelligence,
            Ability::Wisdom => &mut self.wisdom,
            Ability::Charisma => &mut self.charisma,
        };
        *slot = score.clamp(MIN_SCORE, MAX_SCORE);
    }

    /// The modifier for one ability: `floor((score - 10) / 2)`.
    pub fn modifier(&self, ability: Ability) -> i32 {
        modifier_for(self.get(ability))
    }

    /// Apply assignments like `"STR=15, DEX=14"` on top of these scores.
    pub fn with_assignments(mut self, text: &str) -> CoreResult<Self> {
        for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| CoreError::Validation(format!("expected ABILITY=SCORE, got \"{part}\"")))?;
            let ability: Ability = key.parse()?;
            let score: i32 = value.trim().parse().map_err(|_| {
                CoreError::Validation(format!("score for {ability} is not a number: \"{}\"", value.trim()))
            })?;
            if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
                return Err(CoreError::Validation(format!(
                    "score for {ability} must be between {MIN_SCORE} and {MAX_SCORE}, got {score}"
                )));
            }
            self.set(ability, score);
        }
        Ok(self)
    }
}

impl crate::blob::Blob for AbilityScores {
    const FIELD: &'static str = "ability_scores";
}

/// Ability modifier for a raw score. Scores stored outside
/// [`MIN_SCORE`]..=[`MAX_SCORE`] count as the nearer bound.
pub fn modifier_for(score: i32) -> i32 {
    (score.clamp(MIN_SCORE, MAX_SCORE) - 10).div_euclid(2)
}

/// Proficiency bonus by character level (levels outside 1-20 use +2).
pub fn proficiency_bonus(level: i32) -> i32 {
    match level {
        1..=20 => 2 + (level - 1) / 4,
        _ => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::Blob;
    use proptest::prelude::*;

    #[test]
    fn modifiers_round_down() {
        assert_eq!(modifier_for(10), 0);
        assert_eq!(modifier_for(11), 0);
        assert_eq!(modifier_for(9), -1);
        assert_eq!(modifier_for(8), -1);
        assert_eq!(modifier_for(1), -5);
        assert_eq!(modifier_for(20), 5);
        assert_eq!(modifier_for(30), 10);
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        assert_eq!(modifier_for(i32::MIN), -5);
        assert_eq!(modifier_for(0), -5);
        assert_eq!(modifier_for(i32::MAX), 10);

        let mut scores = AbilityScores::default();
        scores.set(Ability::Strength, i32::MIN);
        scores.set(Ability::Charisma, 99);
        assert_eq!(scores.strength, MIN_SCORE);
        assert_eq!(scores.charisma, MAX_SCORE);

        let scores = AbilityScores::parse_blob(r#"{"STR": -2147483648}"#).unwrap();
        assert_eq!(scores.modifier(Ability::Strength), -5);
        assert!(
            AbilityScores::default()
                .with_assignments("STR=-2147483648")
                .is_err()
        );
    }

    #[test]
    fn proficiency_by_level() {
        assert_eq!(proficiency_bonus(1), 2);
        assert_eq!(proficiency_bonus(4), 2);
        assert_eq!(proficiency_bonus(5), 3);
        assert_eq!(proficiency_bonus(9), 4);
        assert_eq!(proficiency_bonus(13), 5);
        assert_eq!(proficiency_bonus(17), 6);
        assert_eq!(proficiency_bonus(20), 6);
        assert_eq!(proficiency_bonus(0), 2);
    }

    #[test]
    fn ability_parsing() {
        assert_eq!("dex".parse::<Ability>().unwrap(), Ability::Dexterity);
        assert_eq!("Wisdom".parse::<Ability>().unwrap(), Ability::Wisdom);
        assert!("luck".parse::<Ability>().is_err());
    }

    #[test]
    fn skill_parsing_and_ability() {
        let skill: Skill = "sleight of hand".parse().unwrap();
        assert_eq!(skill, Skill::SleightOfHand);
        assert_eq!(skill.ability(), Ability::Dexterity);
        assert_eq!("animal_handling".parse::<Skill>().unwrap(), Skill::AnimalHandling);
        assert_eq!(Skill::Athletics.ability(), Ability::Strength);
        assert!("juggling".parse::<Skill>().is_err());
    }

    #[test]
    fn skill_serializes_as_display_name() {
        let json = serde_json::to_string(&vec![Skill::SleightOfHand, Skill::Stealth]).unwrap();
        assert_eq!(json, r#"["Sleight of Hand","Stealth"]"#);
    }

    #[test]
    fn scores_blob_uses_codes() {
        let mut scores = AbilityScores::default();
        scores.set(Ability::Dexterity, 16);
        let blob = scores.to_blob().unwrap();
        assert!(blob.contains("\"DEX\":16"));
        assert_eq!(scores.modifier(Ability::Dexterity), 3);
    }

    #[test]
    fn missing_keys_default_to_ten() {
        let scores = AbilityScores::parse_blob(r#"{"STR": 18}"#).unwrap();
        assert_eq!(scores.strength, 18);
        assert_eq!(scores.charisma, 10);
        assert_eq!(AbilityScores::parse_blob("").unwrap(), AbilityScores::default());
    }

    #[test]
    fn assignments() {
        let scores = AbilityScores::default()
            .with_assignments("STR=15, dex=14,CHA = 8")
            .unwrap();
        assert_eq!(scores.strength, 15);
        assert_eq!(scores.dexterity, 14);
        assert_eq!(scores.charisma, 8);
        assert!(AbilityScores::default().with_assignments("STR").is_err());
        assert!(AbilityScores::default().with_assignments("STR=31").is_err());
        assert!(AbilityScores::default().with_assignments("LCK=3").is_err());
    }

    proptest! {
        #[test]
        fn scores_round_trip(values in proptest::array::uniform6(1i32..=30)) {
            let mut scores = AbilityScores::default();
            for (ability, value) in Ability::ALL.into_iter().zip(values) {
                scores.set(ability, value);
            }
            let blob = scores.to_blob().unwrap();
            prop_assert_eq!(AbilityScores::parse_blob(&blob).unwrap(), scores);
        }
    }
}
