mod game_result;
mod progress;
mod question;
mod settings;
mod statistics;

pub use game_result::{GameResult, GameResultError};
pub use progress::GameProgress;
pub use question::{Question, QuestionError};
pub use settings::{QuizSettings, SettingsError};
pub use statistics::{BestGameUpdate, StatisticsRecord, StatisticsSummary};
