//! Command-line interface for the movie quiz.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use quiz_core::model::{QuizSettings, SettingsError};

/// Terminal movie trivia: guess whether a film beats the rating threshold.
#[derive(Parser, Debug)]
#[command(name = "movie-quiz")]
#[command(about = "Answer yes/no questions about movie ratings", long_about = None)]
#[command(version)]
pub struct Cli {
    /// SQLite database for statistics (path or sqlite:// URL)
    #[arg(
        long = "db",
        env = "QUIZ_DB_URL",
        default_value = "sqlite://movie_quiz.sqlite3"
    )]
    pub db_url: String,

    /// JSON file with the movie catalog; the built-in list is used when absent
    #[arg(long, env = "QUIZ_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Questions per round
    #[arg(
        long,
        env = "QUIZ_QUESTIONS",
        default_value_t = QuizSettings::DEFAULT_QUESTIONS_AMOUNT
    )]
    pub questions: u32,

    /// How long answer feedback stays up, in milliseconds
    #[arg(long = "reveal-ms", env = "QUIZ_REVEAL_MS", default_value_t = 1000)]
    pub reveal_ms: u64,

    /// Rating the questions compare against
    #[arg(
        long,
        env = "QUIZ_THRESHOLD",
        default_value_t = QuizSettings::DEFAULT_RATING_THRESHOLD
    )]
    pub threshold: f32,

    /// Keep statistics in memory instead of SQLite
    #[arg(long)]
    pub in_memory: bool,
}

impl Cli {
    /// Validated round settings from the parsed flags.
    pub fn settings(&self) -> Result<QuizSettings, SettingsError> {
        QuizSettings::new(
            self.questions,
            Duration::from_millis(self.reveal_ms),
            self.threshold,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_settings_defaults() {
        let cli = Cli::try_parse_from(["movie-quiz"]).unwrap();
        assert_eq!(cli.settings().unwrap(), QuizSettings::default());
        assert!(cli.catalog.is_none());
        assert!(!cli.in_memory);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "movie-quiz",
            "--questions",
            "3",
            "--reveal-ms",
            "250",
            "--threshold",
            "8.5",
            "--in-memory",
        ])
        .unwrap();
        let settings = cli.settings().unwrap();
        assert_eq!(settings.questions_amount(), 3);
        assert_eq!(settings.reveal_delay(), Duration::from_millis(250));
        assert_eq!(settings.rating_threshold(), 8.5);
        assert!(cli.in_memory);
    }

    #[test]
    fn zero_questions_is_rejected() {
        let cli = Cli::try_parse_from(["movie-quiz", "--questions", "0"]).unwrap();
        assert_eq!(
            cli.settings().unwrap_err(),
            SettingsError::InvalidQuestionsAmount
        );
    }
}
