//! Rolling a set of identical dice.

use rand::Rng;
use rand::rngs::StdRng;

use super::Die;
use super::roll::RollResult;

/// `count` dice of one type, rolled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DicePool {
    /// The die type.
    pub die: Die,
    /// How many dice are rolled.
    pub count: u32,
}

impl DicePool {
    /// Create a pool of `count` dice.
    pub fn new(die: Die, count: u32) -> Self {
        Self { die, count }
    }

    /// Roll every die in the pool using the given RNG.
    pub fn roll(&self, rng: &mut StdRng) -> RollResult {
        let sides = self.die.sides().max(1);
        let values = (0..self.count)
            .map(|_| rng.random_range(1..=sides))
            .collect();
        RollResult::new(self.die, values)
    }
}
