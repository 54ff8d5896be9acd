use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("questions per game must be > 0")]
    InvalidQuestionsAmount,

    #[error("reveal delay must be > 0")]
    InvalidRevealDelay,

    #[error("rating threshold must be between 0 and 10")]
    InvalidRatingThreshold,
}

/// Tunables for a quiz round.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSettings {
    questions_amount: u32,
    reveal_delay: Duration,
    rating_threshold: f32,
}

impl QuizSettings {
    pub const DEFAULT_QUESTIONS_AMOUNT: u32 = 10;
    pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_secs(1);
    pub const DEFAULT_RATING_THRESHOLD: f32 = 7.0;

    /// # Errors
    ///
    /// Returns `SettingsError` if any value is out of range.
    pub fn new(
        questions_amount: u32,
        reveal_delay: Duration,
        rating_threshold: f32,
    ) -> Result<Self, SettingsError> {
        if questions_amount == 0 {
            return Err(SettingsError::InvalidQuestionsAmount);
        }
        if reveal_delay.is_zero() {
            return Err(SettingsError::InvalidRevealDelay);
        }
        if !(0.0..=10.0).contains(&rating_threshold) {
            return Err(SettingsError::InvalidRatingThreshold);
        }

        Ok(Self {
            questions_amount,
            reveal_delay,
            rating_threshold,
        })
    }

    #[must_use]
    pub fn questions_amount(&self) -> u32 {
        self.questions_amount
    }

    #[must_use]
    pub fn reveal_delay(&self) -> Duration {
        self.reveal_delay
    }

    #[must_use]
    pub fn rating_threshold(&self) -> f32 {
        self.rating_threshold
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            questions_amount: Self::DEFAULT_QUESTIONS_AMOUNT,
            reveal_delay: Self::DEFAULT_REVEAL_DELAY,
            rating_threshold: Self::DEFAULT_RATING_THRESHOLD,
        }
    }
}
