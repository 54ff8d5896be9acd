use std::fmt;

use chrono::Local;
use quiz_core::model::GameResult;

pub const RESULTS_TITLE: &str = "This round is over!";
pub const PLAY_AGAIN: &str = "Play again";
pub const ERROR_TITLE: &str = "Error";
pub const TRY_AGAIN: &str = "Try again";

const BEST_GAME_DATE_FORMAT: &str = "%d.%m.%y %H:%M";

/// End-of-round message built from a `ShowResults` update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultsReport {
    pub result: GameResult,
    pub games_played: u32,
    pub best_game: GameResult,
    pub total_accuracy: f64,
}

impl fmt::Display for ResultsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let amount = self.result.total();
        writeln!(f, "Your result: {}/{}", self.result.correct(), amount)?;
        writeln!(f, "Quizzes played: {}", self.games_played)?;
        writeln!(
            f,
            "Record: {}/{} ({})",
            self.best_game.correct(),
            amount,
            self.best_game
                .completed_at()
                .with_timezone(&Local)
                .format(BEST_GAME_DATE_FORMAT)
        )?;
        write!(f, "Average accuracy: {:.2}%", self.total_accuracy)
    }
}

/// A modal prompt with one button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: &'static str,
    pub message: String,
    pub button_text: &'static str,
}

impl Alert {
    #[must_use]
    pub fn results(report: &ResultsReport) -> Self {
        Self {
            title: RESULTS_TITLE,
            message: report.to_string(),
            button_text: PLAY_AGAIN,
        }
    }

    #[must_use]
    pub fn load_error(message: impl Into<String>) -> Self {
        Self {
            title: ERROR_TITLE,
            message: message.into(),
            button_text: TRY_AGAIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn report_matches_round_summary_layout() {
        let result = GameResult::new(6, 10, fixed_now()).unwrap();
        let best = GameResult::new(9, 16, fixed_now()).unwrap();
        let report = ResultsReport {
            result,
            games_played: 3,
            best_game: best,
            total_accuracy: 53.333_333,
        };

        // The record date is shown in the player's local time zone.
        let local = fixed_now().with_timezone(&Local).format("%d.%m.%y %H:%M");
        assert_eq!(
            report.to_string(),
            format!(
                "Your result: 6/10\n\
                 Quizzes played: 3\n\
                 Record: 9/10 ({local})\n\
                 Average accuracy: 53.33%"
            )
        );
    }

    #[test]
    fn alerts_carry_titles_and_buttons() {
        let result = GameResult::new(1, 1, fixed_now()).unwrap();
        let report = ResultsReport {
            result,
            games_played: 1,
            best_game: result,
            total_accuracy: 100.0,
        };
        let alert = Alert::results(&report);
        assert_eq!(alert.title, RESULTS_TITLE);
        assert_eq!(alert.button_text, PLAY_AGAIN);

        let error = Alert::load_error("the movie list is empty");
        assert_eq!(error.title, ERROR_TITLE);
        assert_eq!(error.button_text, TRY_AGAIN);
        assert_eq!(error.message, "the movie list is empty");
    }
}
