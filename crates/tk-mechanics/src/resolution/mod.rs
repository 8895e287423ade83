//! Turning a [`DiceRequest`] into a total.
//!
//! A normal roll draws one set of dice. Advantage and disadvantage draw two
//! full sets and keep the one with the higher (or lower) raw sum; the
//! modifier is applied only after the choice. Ties keep the first set.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::dice::{DicePool, DiceRequest, RollMode, RollResult};

/// The outcome of one dice request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// What was rolled.
    pub request: DiceRequest,
    /// The set that counts toward the total.
    pub kept: RollResult,
    /// The discarded set, for advantage and disadvantage rolls.
    pub dropped: Option<RollResult>,
    /// Kept raw sum plus modifier.
    pub total: i64,
}

impl Resolution {
    /// Choose between already-rolled sets according to the request's mode.
    ///
    /// `second` is ignored for normal rolls.
    pub fn from_sets(request: DiceRequest, first: RollResult, second: Option<RollResult>) -> Self {
        let (kept, dropped) = match (request.mode, second) {
            (RollMode::Normal, _) | (_, None) => (first, None),
            (RollMode::Advantage, Some(second)) => {
                if first.total() >= second.total() {
                    (first, Some(second))
                } else {
                    (second, Some(first))
                }
            }
            (RollMode::Disadvantage, Some(second)) => {
                if first.total() <= second.total() {
                    (first, Some(second))
                } else {
                    (second, Some(first))
                }
            }
        };
        let total = i64::try_from(kept.total()).unwrap_or(i64::MAX) + i64::from(request.modifier);
        Self {
            request,
            kept,
            dropped,
            total,
        }
    }

    /// Human-readable trace for the roll log.
    ///
    /// A blank label falls back to the dice notation.
    pub fn trace(&self, label: &str) -> String {
        let label = if label.trim().is_empty() {
            self.request.dice_notation()
        } else {
            label.trim().to_string()
        };
        let modifier = self.request.modifier;
        match (&self.dropped, self.request.mode.tag()) {
            (Some(dropped), Some(tag)) => format!(
                "{label} [{tag}] -> {} (took {}, dropped {dropped}, mod {modifier:+})",
                self.total, self.kept
            ),
            _ => format!(
                "{label} -> {} ({}: {}, mod {modifier:+})",
                self.total,
                self.request.dice_notation(),
                self.kept
            ),
        }
    }
}

/// Roll a request.
pub fn resolve(request: &DiceRequest, rng: &mut StdRng) -> Resolution {
    let pool = DicePool::new(request.die, request.count);
    let first = pool.roll(rng);
    let second = match request.mode {
        RollMode::Normal => None,
        RollMode::Advantage | RollMode::Disadvantage => Some(pool.roll(rng)),
    };
    Resolution::from_sets(*request, first, second)
}
