use std::fmt;

use quiz_core::model::{GameProgress, GameResult, Question, QuizSettings, StatisticsSummary};
use tracing::{debug, info, warn};

use super::event::{Generation, QuizEffect, QuizEvent, QuizUpdate, Transition};
use crate::Clock;
use crate::error::QuestionSourceError;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Where the quiz currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Constructed, `start` not called yet.
    Idle,
    /// Waiting for the question source to load its data.
    Loading,
    /// A question is (or is about to be) on screen and accepts one answer.
    AwaitingAnswer,
    /// Answer feedback is shown; the next step runs when the reveal delay ends.
    Revealing,
    /// All questions answered.
    Finished,
    /// The question source failed; only `retry_after_error` moves on.
    Errored,
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuizPhase::Idle => "idle",
            QuizPhase::Loading => "loading",
            QuizPhase::AwaitingAnswer => "awaiting_answer",
            QuizPhase::Revealing => "revealing",
            QuizPhase::Finished => "finished",
            QuizPhase::Errored => "errored",
        };
        f.write_str(name)
    }
}

//
// ─── MACHINE ───────────────────────────────────────────────────────────────────
//

/// The quiz orchestrator.
///
/// Pure state machine: every operation returns a [`Transition`] listing the
/// view updates to emit and the effects (data loads, question requests, the
/// reveal timer, statistics writes) for a driver to run. Completions come
/// back through [`QuizStateMachine::handle`] tagged with the [`Generation`]
/// that requested them; anything from an older generation, or arriving in a
/// phase that is not waiting for it, is dropped.
pub struct QuizStateMachine {
    settings: QuizSettings,
    clock: Clock,
    phase: QuizPhase,
    progress: GameProgress,
    generation: Generation,
    finished: Option<GameResult>,
}

impl QuizStateMachine {
    #[must_use]
    pub fn new(settings: QuizSettings, clock: Clock) -> Self {
        let progress = GameProgress::new(settings.questions_amount());
        Self {
            settings,
            clock,
            phase: QuizPhase::Idle,
            progress,
            generation: Generation::default(),
            finished: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn progress(&self) -> &GameProgress {
        &self.progress
    }

    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    /// Result of the last finished game, once one exists.
    #[must_use]
    pub fn finished_result(&self) -> Option<GameResult> {
        self.finished
    }

    /// Dispatch one event.
    pub fn handle(&mut self, event: QuizEvent) -> Transition {
        match event {
            QuizEvent::Start => self.start(),
            QuizEvent::Answer(choice) => self.submit_answer(choice),
            QuizEvent::RetryAfterError => self.retry_after_error(),
            QuizEvent::Restart => self.restart(),
            QuizEvent::DataLoaded { generation, result } => self.on_data_loaded(generation, result),
            QuizEvent::QuestionReceived { generation, result } => {
                self.on_question_received(generation, result)
            }
            QuizEvent::RevealElapsed { generation } => self.on_reveal_elapsed(generation),
            QuizEvent::GameRecorded {
                generation,
                statistics,
            } => self.on_game_recorded(generation, statistics),
        }
    }

    /// Begin the first game: load data, then fetch the first question.
    pub fn start(&mut self) -> Transition {
        if self.phase != QuizPhase::Idle {
            debug!(phase = %self.phase, "start ignored");
            return Transition::ignored();
        }
        self.begin_loading()
    }

    /// Score the answer for the question on screen.
    ///
    /// Ignored unless a question is awaiting an answer, so repeated taps
    /// during the reveal delay are never counted twice.
    pub fn submit_answer(&mut self, choice: bool) -> Transition {
        if self.phase != QuizPhase::AwaitingAnswer {
            debug!(phase = %self.phase, "answer ignored");
            return Transition::ignored();
        }
        let Some(is_correct) = self.progress.evaluate(choice) else {
            debug!("answer ignored, no question on screen");
            return Transition::ignored();
        };

        self.phase = QuizPhase::Revealing;
        debug!(
            index = self.progress.current_index(),
            is_correct,
            correct_count = self.progress.correct_count(),
            "answer evaluated"
        );

        let mut transition = Transition::default();
        transition
            .update(QuizUpdate::AnswerFeedback { is_correct })
            .effect(QuizEffect::ScheduleReveal {
                generation: self.generation,
                delay: self.settings.reveal_delay(),
            });
        transition
    }

    /// Start over after a data-source failure.
    pub fn retry_after_error(&mut self) -> Transition {
        if self.phase != QuizPhase::Errored {
            debug!(phase = %self.phase, "retry ignored");
            return Transition::ignored();
        }
        self.begin_loading()
    }

    /// Play another round after the results were shown.
    ///
    /// The data set is already loaded, so this goes straight to the first
    /// question.
    pub fn restart(&mut self) -> Transition {
        if self.phase != QuizPhase::Finished {
            debug!(phase = %self.phase, "restart ignored");
            return Transition::ignored();
        }
        self.reset();
        self.phase = QuizPhase::AwaitingAnswer;
        info!(generation = self.generation.value(), "quiz restarted");

        let mut transition = Transition::default();
        transition.effect(QuizEffect::RequestQuestion {
            generation: self.generation,
        });
        transition
    }

    fn reset(&mut self) {
        self.progress.reset();
        self.finished = None;
        self.generation = self.generation.next();
    }

    fn begin_loading(&mut self) -> Transition {
        self.reset();
        self.phase = QuizPhase::Loading;
        info!(generation = self.generation.value(), "loading questions");

        let mut transition = Transition::default();
        transition
            .update(QuizUpdate::LoadingChanged { is_loading: true })
            .effect(QuizEffect::LoadData {
                generation: self.generation,
            });
        transition
    }

    fn is_stale(&self, generation: Generation) -> bool {
        if generation == self.generation {
            return false;
        }
        debug!(
            stale = generation.value(),
            current = self.generation.value(),
            "dropping stale completion"
        );
        true
    }

    fn fail(&mut self, message: String) -> Transition {
        warn!(phase = %self.phase, %message, "question source failed");
        let was_loading = self.phase == QuizPhase::Loading;
        self.phase = QuizPhase::Errored;

        let mut transition = Transition::default();
        if was_loading {
            transition.update(QuizUpdate::LoadingChanged { is_loading: false });
        }
        transition.update(QuizUpdate::ShowError { message });
        transition
    }

    fn on_data_loaded(
        &mut self,
        generation: Generation,
        result: Result<(), QuestionSourceError>,
    ) -> Transition {
        if self.is_stale(generation) || self.phase != QuizPhase::Loading {
            return Transition::ignored();
        }
        match result {
            Ok(()) => {
                let mut transition = Transition::default();
                transition.effect(QuizEffect::RequestQuestion { generation });
                transition
            }
            Err(err) => self.fail(err.to_string()),
        }
    }

    fn waiting_for_question(&self) -> bool {
        match self.phase {
            QuizPhase::Loading => true,
            QuizPhase::AwaitingAnswer => self.progress.current_question().is_none(),
            _ => false,
        }
    }

    fn on_question_received(
        &mut self,
        generation: Generation,
        result: Result<Option<Question>, QuestionSourceError>,
    ) -> Transition {
        if self.is_stale(generation) || !self.waiting_for_question() {
            return Transition::ignored();
        }
        let question = match result {
            Ok(Some(question)) => question,
            Ok(None) => return self.fail(QuestionSourceError::Exhausted.to_string()),
            Err(err) => return self.fail(err.to_string()),
        };

        let mut transition = Transition::default();
        if self.phase == QuizPhase::Loading {
            transition.update(QuizUpdate::LoadingChanged { is_loading: false });
        }
        self.phase = QuizPhase::AwaitingAnswer;
        transition.update(QuizUpdate::ShowQuestion {
            text: question.text().to_owned(),
            image_ref: question.image_ref().to_owned(),
            index_label: self.progress.index_label(),
        });
        self.progress.set_question(question);
        transition
    }

    fn on_reveal_elapsed(&mut self, generation: Generation) -> Transition {
        if self.is_stale(generation) || self.phase != QuizPhase::Revealing {
            return Transition::ignored();
        }

        let mut transition = Transition::default();
        if self.progress.advance() {
            self.phase = QuizPhase::AwaitingAnswer;
            transition.effect(QuizEffect::RequestQuestion { generation });
            return transition;
        }

        let result = match GameResult::new(
            self.progress.correct_count(),
            self.progress.questions_amount(),
            self.clock.now(),
        ) {
            Ok(result) => result,
            Err(err) => {
                // `correct_count <= questions_amount` holds by construction.
                warn!(error = %err, "could not build game result");
                self.phase = QuizPhase::Finished;
                return transition;
            }
        };

        self.phase = QuizPhase::Finished;
        self.finished = Some(result);
        info!(
            correct = result.correct(),
            total = result.total(),
            "quiz finished"
        );
        transition.effect(QuizEffect::RecordGame { generation, result });
        transition
    }

    fn on_game_recorded(
        &mut self,
        generation: Generation,
        statistics: StatisticsSummary,
    ) -> Transition {
        if self.is_stale(generation) || self.phase != QuizPhase::Finished {
            return Transition::ignored();
        }
        let Some(result) = self.finished else {
            return Transition::ignored();
        };

        let mut transition = Transition::default();
        transition.update(QuizUpdate::ShowResults {
            result,
            games_played: statistics.games_played,
            best_game: statistics.best_game,
            total_accuracy: statistics.total_accuracy,
        });
        transition
    }
}

impl fmt::Debug for QuizStateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizStateMachine")
            .field("phase", &self.phase)
            .field("generation", &self.generation)
            .field("current_index", &self.progress.current_index())
            .field("correct_count", &self.progress.correct_count())
            .field("has_question", &self.progress.current_question().is_some())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
