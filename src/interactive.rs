use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

use crate::output::{format_progress_line, format_question};
use crate::session::{Session, Step};

/// One line of user input during `take`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Answer(i64),
    /// Empty line: keep the stored answer and move on
    Next,
    Back,
    Jump(String),
    Quit,
}

pub fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Input::Next);
    }
    match line {
        "b" | "back" => return Ok(Input::Back),
        "q" | "quit" => return Ok(Input::Quit),
        _ => {}
    }
    if let Some(rest) = line.strip_prefix("j ").or_else(|| line.strip_prefix("jump ")) {
        let category = rest.trim();
        if category.is_empty() {
            return Err("jump needs a category id".to_string());
        }
        return Ok(Input::Jump(category.to_string()));
    }
    line.parse::<i64>()
        .map(Input::Answer)
        .map_err(|_| format!("'{}' is not an answer; enter 1-5, b, j <category> or q", line))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Quit,
}

/// Where `take` writes its questions and prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStream {
    Stdout,
    /// Keeps stdout clean for machine-readable output
    Stderr,
}

impl PromptStream {
    pub fn for_output(json: bool) -> Self {
        if json {
            PromptStream::Stderr
        } else {
            PromptStream::Stdout
        }
    }

    pub fn writer(self) -> Box<dyn Write> {
        match self {
            PromptStream::Stdout => Box::new(io::stdout()),
            PromptStream::Stderr => Box::new(io::stderr()),
        }
    }
}

/// Prompt user with a message and return their trimmed input, or None at end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    message: &str,
) -> Result<Option<String>> {
    write!(out, "{}", message).context("Failed to write prompt")?;
    out.flush().context("Failed to flush prompt")?;
    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Drive a session from line-based input until every question is answered or
/// the user quits. End of input counts as quitting.
///
/// Reaching the last question with gaps left (after a jump) returns to the
/// first unanswered one.
pub fn run_session<R: BufRead, W: Write>(
    session: &mut Session,
    input: &mut R,
    out: &mut W,
    use_colors: bool,
) -> Result<Outcome> {
    loop {
        let (position, _) = session.position();
        let progress = session.progress()?;
        writeln!(out)?;
        writeln!(out, "{}", format_progress_line(position, &progress))?;
        writeln!(
            out,
            "{}",
            format_question(
                &session.current_section(),
                session.current(),
                session.current_answer(),
                use_colors
            )
        )?;

        let Some(line) = prompt(input, out, "> ")? else {
            return Ok(Outcome::Quit);
        };

        let parsed = match parse_input(&line) {
            Ok(parsed) => parsed,
            Err(message) => {
                writeln!(out, "{}", message)?;
                continue;
            }
        };

        let step = match parsed {
            Input::Quit => return Ok(Outcome::Quit),
            Input::Back => {
                session.back();
                continue;
            }
            Input::Jump(category) => {
                if let Err(e) = session.jump_to_category(&category) {
                    writeln!(out, "{}", e)?;
                }
                continue;
            }
            Input::Answer(value) => match session.answer(value) {
                Ok(()) => session.advance(),
                Err(e) => {
                    writeln!(out, "{}", e)?;
                    continue;
                }
            },
            Input::Next => session.advance(),
        };

        match step {
            Ok(_) if session.is_complete() => return Ok(Outcome::Completed),
            Ok(Step::Moved) => {}
            Ok(Step::Finished) => {
                // Reached the end after jumping past unanswered questions
                let resumed = Session::resume(session.schema(), session.answers().clone())?;
                *session = resumed;
            }
            Err(e) => writeln!(out, "{}", e)?,
        }
    }
}
