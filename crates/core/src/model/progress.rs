use crate::model::Question;

/// Position and score within the game currently being played.
///
/// Invariants: `current_index < questions_amount` and
/// `correct_count <= current_index + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameProgress {
    questions_amount: u32,
    current_index: u32,
    correct_count: u32,
    current_question: Option<Question>,
}

impl GameProgress {
    /// `questions_amount` is expected to be non-zero (see `QuizSettings`).
    #[must_use]
    pub fn new(questions_amount: u32) -> Self {
        Self {
            questions_amount: questions_amount.max(1),
            current_index: 0,
            correct_count: 0,
            current_question: None,
        }
    }

    #[must_use]
    pub fn questions_amount(&self) -> u32 {
        self.questions_amount
    }

    #[must_use]
    pub fn current_index(&self) -> u32 {
        self.current_index
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current_question.as_ref()
    }

    /// Counter shown next to the question, e.g. `"3/10"`.
    #[must_use]
    pub fn index_label(&self) -> String {
        format!("{}/{}", self.current_index + 1, self.questions_amount)
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 == self.questions_amount
    }

    /// Back to the first question with a zero score.
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.correct_count = 0;
        self.current_question = None;
    }

    pub fn set_question(&mut self, question: Question) {
        self.current_question = Some(question);
    }

    /// Score the current question. Returns `None` when no question is on screen.
    pub fn evaluate(&mut self, choice: bool) -> Option<bool> {
        let is_correct = self.current_question.as_ref()?.is_correct(choice);
        if is_correct {
            self.correct_count += 1;
        }
        Some(is_correct)
    }

    /// Move to the next index and drop the answered question.
    ///
    /// Returns false (and changes nothing) on the last question.
    pub fn advance(&mut self) -> bool {
        if self.is_last_question() {
            return false;
        }
        self.current_index += 1;
        self.current_question = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(answer: bool) -> Question {
        Question::new("poster.jpg", "Is this movie rated higher than 7?", answer).unwrap()
    }

    #[test]
    fn label_is_one_based() {
        let mut progress = GameProgress::new(3);
        assert_eq!(progress.index_label(), "1/3");
        assert!(progress.advance());
        assert_eq!(progress.index_label(), "2/3");
    }

    #[test]
    fn evaluate_without_question_is_noop() {
        let mut progress = GameProgress::new(3);
        assert_eq!(progress.evaluate(true), None);
        assert_eq!(progress.correct_count(), 0);
    }

    #[test]
    fn advance_stops_at_last_question() {
        let mut progress = GameProgress::new(2);
        progress.set_question(question(true));
        assert_eq!(progress.evaluate(true), Some(true));
        assert!(progress.advance());
        assert!(progress.current_question().is_none());
        assert!(progress.is_last_question());
        assert!(!progress.advance());
        assert_eq!(progress.current_index(), 1);
        assert!(progress.correct_count() <= progress.current_index() + 1);
    }

    #[test]
    fn reset_clears_score_and_question() {
        let mut progress = GameProgress::new(2);
        progress.set_question(question(false));
        progress.evaluate(false);
        progress.advance();
        progress.reset();
        assert_eq!(progress.current_index(), 0);
        assert_eq!(progress.correct_count(), 0);
        assert!(progress.current_question().is_none());
    }
}
