use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority of a strategy for a given statistics snapshot.
///
/// Kept as its three parts so rankings can be explained, not just compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub base: i32,
    pub condition: i32,
    pub penalty: i32,
}

impl Score {
    pub const fn new(base: i32) -> Self {
        Self {
            base,
            condition: 0,
            penalty: 0,
        }
    }

    /// `base + condition - penalty`.
    pub const fn total(&self) -> i32 {
        self.base + self.condition - self.penalty
    }

    /// Add `points` to the condition bonus when `when` holds.
    pub fn bonus(mut self, when: bool, points: i32) -> Self {
        if when {
            self.condition += points;
        }
        self
    }

    /// Add `points` to the penalty when `when` holds.
    pub fn penalize(mut self, when: bool, points: i32) -> Self {
        if when {
            self.penalty += points;
        }
        self
    }
}

impl From<i32> for Score {
    fn from(base: i32) -> Self {
        Self::new(base)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (base {} + condition {} - penalty {})",
            self.total(),
            self.base,
            self.condition,
            self.penalty
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total() {
        let score = Score::new(300).bonus(true, 100).bonus(false, 50).penalize(true, 150);
        assert_eq!(score.base, 300);
        assert_eq!(score.condition, 100);
        assert_eq!(score.penalty, 150);
        assert_eq!(score.total(), 250);
    }

    #[test]
    fn test_from_int_is_base_only() {
        let score = Score::from(42);
        assert_eq!(score, Score::new(42));
        assert_eq!(score.total(), 42);
    }

    #[test]
    fn test_display() {
        let score = Score::new(200).bonus(true, 25);
        assert_eq!(score.to_string(), "225 (base 200 + condition 25 - penalty 0)");
    }
}
