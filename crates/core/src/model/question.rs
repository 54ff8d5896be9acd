use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,
}

/// A single yes/no question shown to the player.
///
/// Questions are immutable once issued; the quiz only ever holds a copy of
/// the one currently on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    image_ref: String,
    text: String,
    correct_answer: bool,
}

impl Question {
    /// Build a question, trimming the text.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if the text is blank.
    pub fn new(
        image_ref: impl Into<String>,
        text: impl Into<String>,
        correct_answer: bool,
    ) -> Result<Self, QuestionError> {
        let text = text.into().trim().to_owned();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }

        Ok(Self {
            image_ref: image_ref.into(),
            text,
            correct_answer,
        })
    }

    #[must_use]
    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn correct_answer(&self) -> bool {
        self.correct_answer
    }

    /// Returns true when `choice` matches the expected answer.
    #[must_use]
    pub fn is_correct(&self, choice: bool) -> bool {
        choice == self.correct_answer
    }
}
