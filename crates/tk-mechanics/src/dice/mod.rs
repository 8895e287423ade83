//! Dice types, requests, and rolling.
//!
//! Supports standard polyhedral dice (d4 through d100) and dice with any
//! other number of sides. A [`DiceRequest`] describes one roll: how many
//! dice, which die, a flat modifier, and whether advantage applies.

pub mod pool;
pub mod roll;

pub use pool::DicePool;
pub use roll::RollResult;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};

/// Most dice one request may roll.
pub const MAX_DICE: u32 = 20;

/// Most sides a die may have.
pub const MAX_SIDES: u32 = 100;

/// Largest flat modifier, in either direction.
pub const MAX_MODIFIER: i32 = 20;

/// A polyhedral die type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Die {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
    /// Percentile die (1-100).
    D100,
    /// A die with a custom number of sides.
    Custom(u32),
}

impl Die {
    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
            Self::D100 => 100,
            Self::Custom(n) => n,
        }
    }

    /// The die with the given number of sides.
    pub fn from_sides(sides: u32) -> Self {
        match sides {
            4 => Self::D4,
            6 => Self::D6,
            8 => Self::D8,
            10 => Self::D10,
            12 => Self::D12,
            20 => Self::D20,
            100 => Self::D100,
            n => Self::Custom(n),
        }
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// Whether a roll is made normally, with advantage, or with disadvantage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RollMode {
    /// Roll once.
    #[default]
    Normal,
    /// Roll twice, keep the higher raw sum.
    Advantage,
    /// Roll twice, keep the lower raw sum.
    Disadvantage,
}

impl RollMode {
    /// Combine the two checkbox-style flags.
    ///
    /// Advantage and disadvantage cancel: with both set the roll is normal.
    pub fn from_flags(advantage: bool, disadvantage: bool) -> Self {
        match (advantage, disadvantage) {
            (true, false) => Self::Advantage,
            (false, true) => Self::Disadvantage,
            _ => Self::Normal,
        }
    }

    /// Short tag used in roll traces.
    pub fn tag(self) -> Option<&'static str> {
        match self {
            Self::Normal => None,
            Self::Advantage => Some("Adv"),
            Self::Disadvantage => Some("Dis"),
        }
    }
}

/// One roll to make: `count` dice of one type plus a flat modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRequest {
    /// Number of dice (at least 1).
    pub count: u32,
    /// The die to roll.
    pub die: Die,
    /// Flat modifier added after the dice are summed.
    pub modifier: i32,
    /// Normal, advantage, or disadvantage.
    pub mode: RollMode,
}

impl DiceRequest {
    /// A normal roll of `count` dice.
    pub fn new(count: u32, die: Die, modifier: i32) -> Self {
        Self {
            count,
            die,
            modifier,
            mode: RollMode::Normal,
        }
    }

    /// A single d20 plus a modifier.
    pub fn d20(modifier: i32) -> Self {
        Self::new(1, Die::D20, modifier)
    }

    /// Set the roll mode.
    pub fn with_mode(mut self, mode: RollMode) -> Self {
        self.mode = mode;
        self
    }

    /// Check the request against the table limits: 1 to [`MAX_DICE`] dice
    /// of 1 to [`MAX_SIDES`] sides, and a modifier within
    /// [`MAX_MODIFIER`] of zero.
    pub fn validate(&self) -> MechResult<()> {
        if !(1..=MAX_DICE).contains(&self.count) {
            return Err(MechError::InvalidDice(format!(
                "{self}: roll between 1 and {MAX_DICE} dice"
            )));
        }
        if !(1..=MAX_SIDES).contains(&self.die.sides()) {
            return Err(MechError::InvalidDice(format!(
                "{self}: dice have between 1 and {MAX_SIDES} sides"
            )));
        }
        if !(-MAX_MODIFIER..=MAX_MODIFIER).contains(&self.modifier) {
            return Err(MechError::InvalidDice(format!(
                "{self}: modifier must be between -{MAX_MODIFIER} and +{MAX_MODIFIER}"
            )));
        }
        Ok(())
    }

    /// The dice part of the notation, e.g. "2d6".
    pub fn dice_notation(&self) -> String {
        format!("{}{}", self.count, self.die)
    }
}

impl std::fmt::Display for DiceRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dice_notation())?;
        if self.modifier != 0 {
            write!(f, "{:+}", self.modifier)?;
        }
        Ok(())
    }
}

impl FromStr for DiceRequest {
    type Err = MechError;

    /// Parse standard notation: `2d6+3`, `d20`, `1d8 - 1`, `D100`.
    fn from_str(s: &str) -> MechResult<Self> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        let invalid = || MechError::InvalidDice(s.trim().to_string());

        let (count_part, rest) = compact.split_once('d').ok_or_else(invalid)?;
        let count = if count_part.is_empty() {
            1
        } else {
            count_part.parse::<u32>().map_err(|_| invalid())?
        };

        let (sides_part, modifier) = match rest.find(['+', '-']) {
            Some(i) => (&rest[..i], rest[i..].parse::<i32>().map_err(|_| invalid())?),
            None => (rest, 0),
        };
        let sides = sides_part.parse::<u32>().map_err(|_| invalid())?;

        if count == 0 || sides == 0 {
            return Err(invalid());
        }
        let request = Self::new(count, Die::from_sides(sides), modifier);
        request.validate()?;
        Ok(request)
    }
}
