use std::time::Duration;

use quiz_core::model::{GameResult, Question, StatisticsSummary};

use crate::error::QuestionSourceError;

/// Identifies one game (or one loading attempt).
///
/// Bumped on every reset so completions requested by an earlier game can be
/// recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Inputs to the quiz state machine: player intents and async completions.
#[derive(Debug)]
pub enum QuizEvent {
    Start,
    Answer(bool),
    RetryAfterError,
    Restart,
    DataLoaded {
        generation: Generation,
        result: Result<(), QuestionSourceError>,
    },
    QuestionReceived {
        generation: Generation,
        result: Result<Option<Question>, QuestionSourceError>,
    },
    RevealElapsed {
        generation: Generation,
    },
    GameRecorded {
        generation: Generation,
        statistics: StatisticsSummary,
    },
}

/// Work the machine asks its driver to perform.
///
/// Each effect carries the generation that requested it; the matching
/// completion event must echo it back.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizEffect {
    LoadData {
        generation: Generation,
    },
    RequestQuestion {
        generation: Generation,
    },
    ScheduleReveal {
        generation: Generation,
        delay: Duration,
    },
    RecordGame {
        generation: Generation,
        result: GameResult,
    },
}

/// Signals for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizUpdate {
    ShowQuestion {
        text: String,
        image_ref: String,
        index_label: String,
    },
    AnswerFeedback {
        is_correct: bool,
    },
    ShowResults {
        result: GameResult,
        games_played: u32,
        best_game: GameResult,
        total_accuracy: f64,
    },
    ShowError {
        message: String,
    },
    LoadingChanged {
        is_loading: bool,
    },
}

/// Everything one step of the machine produced, in emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transition {
    pub updates: Vec<QuizUpdate>,
    pub effects: Vec<QuizEffect>,
}

impl Transition {
    /// A step that changed nothing.
    #[must_use]
    pub fn ignored() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.effects.is_empty()
    }

    pub(crate) fn update(&mut self, update: QuizUpdate) -> &mut Self {
        self.updates.push(update);
        self
    }

    pub(crate) fn effect(&mut self, effect: QuizEffect) -> &mut Self {
        self.effects.push(effect);
        self
    }
}
