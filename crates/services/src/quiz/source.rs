use async_trait::async_trait;
use quiz_core::model::Question;

use crate::error::QuestionSourceError;

/// Supplier of quiz questions.
///
/// `load_data` prepares the underlying dataset; `request_next_question`
/// yields one question at a time. `Ok(None)` means the source is exhausted,
/// which the quiz treats as a load failure.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// # Errors
    ///
    /// Returns `QuestionSourceError` if the dataset is unavailable or empty.
    async fn load_data(&self) -> Result<(), QuestionSourceError>;

    /// # Errors
    ///
    /// Returns `QuestionSourceError` if a question cannot be produced.
    async fn request_next_question(&self) -> Result<Option<Question>, QuestionSourceError>;
}
