//! Line-oriented terminal front-end for a running quiz.

use std::io::Write;

use anyhow::Result;
use services::quiz::{Alert, QuizUpdate, ResultsReport};
use services::{QuizHandle, RuntimeError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

/// What the next line typed by the player means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// Nothing is expected; input is ignored.
    Wait,
    /// A yes/no answer to the question on screen.
    Answer,
    /// Acknowledge a load error and try again.
    Retry,
    /// Acknowledge the results and start another round.
    PlayAgain,
}

/// Intent parsed from one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Answer(bool),
    Confirm,
    Quit,
    Unknown,
}

impl Input {
    pub fn parse(line: &str) -> Self {
        match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Input::Answer(true),
            "n" | "no" => Input::Answer(false),
            "q" | "quit" | "exit" => Input::Quit,
            "" => Input::Confirm,
            _ => Input::Unknown,
        }
    }
}

/// Text to print for an update and the prompt it leaves open.
pub fn render(update: &QuizUpdate) -> (String, Option<Prompt>) {
    match update {
        QuizUpdate::LoadingChanged { is_loading: true } => {
            ("Loading movies...".to_owned(), Some(Prompt::Wait))
        }
        QuizUpdate::LoadingChanged { is_loading: false } => (String::new(), None),
        QuizUpdate::ShowQuestion {
            text,
            image_ref,
            index_label,
        } => {
            let poster = if image_ref.is_empty() {
                String::new()
            } else {
                format!("Poster: {image_ref}\n")
            };
            (
                format!("\nQuestion {index_label}\n{poster}{text} [y/n]"),
                Some(Prompt::Answer),
            )
        }
        QuizUpdate::AnswerFeedback { is_correct } => {
            let text = if *is_correct { "Correct!" } else { "Wrong." };
            (text.to_owned(), Some(Prompt::Wait))
        }
        QuizUpdate::ShowResults {
            result,
            games_played,
            best_game,
            total_accuracy,
        } => {
            let report = ResultsReport {
                result: *result,
                games_played: *games_played,
                best_game: *best_game,
                total_accuracy: *total_accuracy,
            };
            (render_alert(&Alert::results(&report)), Some(Prompt::PlayAgain))
        }
        QuizUpdate::ShowError { message } => (
            render_alert(&Alert::load_error(message.as_str())),
            Some(Prompt::Retry),
        ),
    }
}

fn render_alert(alert: &Alert) -> String {
    format!(
        "\n== {} ==\n{}\n[Enter] {}  [q] Quit",
        alert.title, alert.message, alert.button_text
    )
}

/// Outcome of one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Sent,
    Ignored,
    Quit,
}

/// Map an input line onto the quiz handle.
pub fn dispatch(
    handle: &QuizHandle,
    prompt: Prompt,
    input: Input,
) -> Result<Dispatch, RuntimeError> {
    match (prompt, input) {
        (_, Input::Quit) => return Ok(Dispatch::Quit),
        (Prompt::Answer, Input::Answer(choice)) => handle.submit_answer(choice)?,
        (Prompt::Retry, Input::Confirm) => handle.retry_after_error()?,
        (Prompt::PlayAgain, Input::Confirm) => handle.restart()?,
        (prompt, input) => {
            debug!(?prompt, ?input, "input ignored");
            return Ok(Dispatch::Ignored);
        }
    }
    Ok(Dispatch::Sent)
}

/// Print updates and forward player input until the player quits or stdin closes.
pub async fn run(handle: QuizHandle, mut updates: UnboundedReceiver<QuizUpdate>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut prompt = Prompt::Wait;
    let mut stdout = std::io::stdout();

    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(update) = update else { break };
                let (text, next) = render(&update);
                if !text.is_empty() {
                    writeln!(stdout, "{text}")?;
                    stdout.flush()?;
                }
                if let Some(next) = next {
                    prompt = next;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let input = Input::parse(&line);
                match dispatch(&handle, prompt, input)? {
                    Dispatch::Quit => break,
                    Dispatch::Sent => prompt = Prompt::Wait,
                    Dispatch::Ignored if prompt == Prompt::Answer => {
                        writeln!(stdout, "Please answer y or n.")?;
                    }
                    Dispatch::Ignored => {}
                }
            }
        }
    }
    Ok(())
}
