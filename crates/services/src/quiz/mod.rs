mod event;
mod machine;
mod report;
mod runtime;
mod source;
mod view;

// Public API of the quiz subsystem.
pub use event::{Generation, QuizEffect, QuizEvent, QuizUpdate, Transition};
pub use machine::{QuizPhase, QuizStateMachine};
pub use report::{Alert, ERROR_TITLE, PLAY_AGAIN, RESULTS_TITLE, ResultsReport, TRY_AGAIN};
pub use runtime::{QuizHandle, QuizRuntime};
pub use source::QuestionSource;
pub use view::{ChannelView, QuizView};
