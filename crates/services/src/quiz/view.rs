use quiz_core::model::GameResult;
use tokio::sync::mpsc;

use super::event::QuizUpdate;

/// Presentation boundary driven by the quiz runtime.
///
/// Callbacks run on the runtime task, so implementations should hand work
/// off quickly rather than block.
pub trait QuizView: Send + Sync {
    fn on_show_question(&self, text: &str, image_ref: &str, index_label: &str);

    fn on_answer_feedback(&self, is_correct: bool);

    fn on_show_results(
        &self,
        result: &GameResult,
        games_played: u32,
        best_game: &GameResult,
        total_accuracy: f64,
    );

    fn on_show_error(&self, message: &str);

    fn on_loading_state_changed(&self, is_loading: bool);
}

impl QuizUpdate {
    /// Deliver this update to the matching `QuizView` callback.
    pub fn apply_to(&self, view: &dyn QuizView) {
        match self {
            QuizUpdate::ShowQuestion {
                text,
                image_ref,
                index_label,
            } => view.on_show_question(text, image_ref, index_label),
            QuizUpdate::AnswerFeedback { is_correct } => view.on_answer_feedback(*is_correct),
            QuizUpdate::ShowResults {
                result,
                games_played,
                best_game,
                total_accuracy,
            } => view.on_show_results(result, *games_played, best_game, *total_accuracy),
            QuizUpdate::ShowError { message } => view.on_show_error(message),
            QuizUpdate::LoadingChanged { is_loading } => view.on_loading_state_changed(*is_loading),
        }
    }
}

/// `QuizView` that forwards every signal into a channel.
///
/// Lets a front-end (or a test) consume updates as a stream. Sends after the
/// receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelView {
    updates: mpsc::UnboundedSender<QuizUpdate>,
}

impl ChannelView {
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<QuizUpdate>) {
        let (updates, rx) = mpsc::unbounded_channel();
        (Self { updates }, rx)
    }

    fn send(&self, update: QuizUpdate) {
        if self.updates.send(update).is_err() {
            tracing::trace!("update receiver dropped");
        }
    }
}

impl QuizView for ChannelView {
    fn on_show_question(&self, text: &str, image_ref: &str, index_label: &str) {
        self.send(QuizUpdate::ShowQuestion {
            text: text.to_owned(),
            image_ref: image_ref.to_owned(),
            index_label: index_label.to_owned(),
        });
    }

    fn on_answer_feedback(&self, is_correct: bool) {
        self.send(QuizUpdate::AnswerFeedback { is_correct });
    }

    fn on_show_results(
        &self,
        result: &GameResult,
        games_played: u32,
        best_game: &GameResult,
        total_accuracy: f64,
    ) {
        self.send(QuizUpdate::ShowResults {
            result: *result,
            games_played,
            best_game: *best_game,
            total_accuracy,
        });
    }

    fn on_show_error(&self, message: &str) {
        self.send(QuizUpdate::ShowError {
            message: message.to_owned(),
        });
    }

    fn on_loading_state_changed(&self, is_loading: bool) {
        self.send(QuizUpdate::LoadingChanged { is_loading });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn channel_view_preserves_updates() {
        let (view, mut rx) = ChannelView::new();
        let result = GameResult::new(3, 5, fixed_now()).unwrap();
        let updates = vec![
            QuizUpdate::LoadingChanged { is_loading: true },
            QuizUpdate::ShowQuestion {
                text: "Is this movie rated higher than 7?".into(),
                image_ref: "poster.jpg".into(),
                index_label: "1/5".into(),
            },
            QuizUpdate::AnswerFeedback { is_correct: false },
            QuizUpdate::ShowResults {
                result,
                games_played: 2,
                best_game: result,
                total_accuracy: 30.0,
            },
            QuizUpdate::ShowError {
                message: "boom".into(),
            },
        ];

        for update in &updates {
            update.apply_to(&view);
        }
        for expected in updates {
            assert_eq!(rx.try_recv().unwrap(), expected);
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn sending_after_receiver_drop_is_harmless() {
        let (view, rx) = ChannelView::new();
        drop(rx);
        view.on_answer_feedback(true);
    }
}
