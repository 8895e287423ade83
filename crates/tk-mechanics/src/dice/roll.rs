//! Dice roll results.

use serde::{Deserialize, Serialize};

use super::Die;

/// The values rolled for one set of identical dice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// The type of die that was rolled.
    pub die: Die,
    /// Individual die values, in roll order.
    pub values: Vec<u32>,
}

impl RollResult {
    /// Wrap already-rolled values.
    pub fn new(die: Die, values: Vec<u32>) -> Self {
        Self { die, values }
    }

    /// Sum of all die values.
    pub fn total(&self) -> u64 {
        self.values.iter().map(|&v| u64::from(v)).sum()
    }
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.values.iter().map(u32::to_string).collect();
        write!(f, "[{}]", values.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total() {
        let r = RollResult::new(Die::D20, vec![15, 8]);
        assert_eq!(r.total(), 23);
    }

    #[test]
    fn total_does_not_wrap() {
        let r = RollResult::new(Die::Custom(u32::MAX), vec![u32::MAX, u32::MAX]);
        assert_eq!(r.total(), 2 * u64::from(u32::MAX));
        assert_eq!(RollResult::new(Die::D6, Vec::new()).total(), 0);
    }

    #[test]
    fn display() {
        let r = RollResult::new(Die::D6, vec![3, 5]);
        assert_eq!(r.to_string(), "[3, 5]");
    }
}
