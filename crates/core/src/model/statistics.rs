use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::GameResult;

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// Outcome of offering a finished game to `record_if_best`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BestGameUpdate {
    Kept,
    Replaced { previous: GameResult },
}

/// Aggregates persisted across every game the player has finished.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatisticsRecord {
    games_played: u32,
    best_game: GameResult,
    total_answered: u64,
}

impl StatisticsRecord {
    /// Rehydrate a record from storage.
    #[must_use]
    pub fn from_persisted(games_played: u32, best_game: GameResult, total_answered: u64) -> Self {
        Self {
            games_played,
            best_game,
            total_answered,
        }
    }

    #[must_use]
    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    #[must_use]
    pub fn best_game(&self) -> GameResult {
        self.best_game
    }

    #[must_use]
    pub fn total_answered(&self) -> u64 {
        self.total_answered
    }

    /// Count one finished game and offer it as the new best.
    pub fn record_game(&mut self, correct: u32, total: u32, now: DateTime<Utc>) -> BestGameUpdate {
        self.games_played = self.games_played.saturating_add(1);
        self.total_answered = self.total_answered.saturating_add(u64::from(total));
        self.record_if_best(correct, now)
    }

    /// Replace the best game when `correct` is strictly higher.
    ///
    /// The replacement keeps a running total: `new.total = old.total + correct`,
    /// stamped with `now`. Ties keep the existing best.
    pub fn record_if_best(&mut self, correct: u32, now: DateTime<Utc>) -> BestGameUpdate {
        let previous = self.best_game;
        let candidate =
            GameResult::unchecked(correct, previous.total().saturating_add(correct), now);
        if !candidate.is_better_than(&previous) {
            return BestGameUpdate::Kept;
        }

        self.best_game = candidate;
        BestGameUpdate::Replaced { previous }
    }

    /// Percentage of the best game's running total over all questions asked.
    ///
    /// `best_game.total / (games_played * questions_per_game) * 100`, or `0`
    /// when nothing has been played yet.
    #[must_use]
    pub fn total_accuracy(&self, questions_per_game: u32) -> f64 {
        if self.games_played == 0 || self.best_game.total() == 0 || questions_per_game == 0 {
            return 0.0;
        }
        let asked = f64::from(self.games_played) * f64::from(questions_per_game);
        f64::from(self.best_game.total()) / asked * 100.0
    }

    #[must_use]
    pub fn summary(&self, questions_per_game: u32) -> StatisticsSummary {
        StatisticsSummary {
            games_played: self.games_played,
            best_game: self.best_game,
            total_accuracy: self.total_accuracy(questions_per_game),
            total_answered: self.total_answered,
        }
    }
}

//
// ─── SUMMARY ───────────────────────────────────────────────────────────────────
//

/// Read-only snapshot handed to the presentation layer after a game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatisticsSummary {
    pub games_played: u32,
    pub best_game: GameResult,
    pub total_accuracy: f64,
    pub total_answered: u64,
}
