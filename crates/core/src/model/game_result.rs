use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time::epoch;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameResultError {
    #[error("correct answers ({correct}) exceed total ({total})")]
    CorrectExceedsTotal { correct: u32, total: u32 },
}

/// Score of one finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    correct: u32,
    total: u32,
    completed_at: DateTime<Utc>,
}

impl GameResult {
    /// # Errors
    ///
    /// Returns `GameResultError::CorrectExceedsTotal` if `correct > total`.
    pub fn new(
        correct: u32,
        total: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, GameResultError> {
        if correct > total {
            return Err(GameResultError::CorrectExceedsTotal { correct, total });
        }
        Ok(Self {
            correct,
            total,
            completed_at,
        })
    }

    /// Builds a result without checking `correct <= total`.
    ///
    /// The best game's total is a running sum, and rows read back from storage
    /// may be partial, so neither is held to the per-game invariant.
    #[must_use]
    pub fn unchecked(correct: u32, total: u32, completed_at: DateTime<Utc>) -> Self {
        Self {
            correct,
            total,
            completed_at,
        }
    }

    /// The zero result used before any game has been stored.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            correct: 0,
            total: 0,
            completed_at: epoch(),
        }
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Strict comparison on correct answers; ties are not better.
    #[must_use]
    pub fn is_better_than(&self, other: &GameResult) -> bool {
        self.correct > other.correct
    }
}

impl Default for GameResult {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn rejects_more_correct_than_total() {
        let err = GameResult::new(11, 10, fixed_now()).unwrap_err();
        assert_eq!(
            err,
            GameResultError::CorrectExceedsTotal {
                correct: 11,
                total: 10
            }
        );
    }

    #[test]
    fn ties_are_not_better() {
        let a = GameResult::new(7, 10, fixed_now()).unwrap();
        let b = GameResult::new(7, 10, fixed_now()).unwrap();
        let c = GameResult::new(8, 10, fixed_now()).unwrap();
        assert!(!a.is_better_than(&b));
        assert!(c.is_better_than(&a));
    }

    #[test]
    fn unchecked_keeps_values_as_given() {
        let partial = GameResult::unchecked(5, 0, epoch());
        assert_eq!(partial.correct(), 5);
        assert_eq!(partial.total(), 0);
    }

    #[test]
    fn empty_result_is_zero_at_epoch() {
        let empty = GameResult::default();
        assert_eq!(empty.correct(), 0);
        assert_eq!(empty.total(), 0);
        assert_eq!(empty.completed_at(), epoch());
    }
}
