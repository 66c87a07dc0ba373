// src/prompt.rs

//! Yes/no confirmation prompts
//!
//! A confirmation prints a question, reads one line, and resolves to accept
//! (`y`), decline (`n`), or asks again on anything else. Callers take a
//! `&mut dyn Confirm` so tests can script the answers.

use crate::error::Result;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Outcome of reading one answer line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    /// Unrecognized input; prompt again
    Retry,
}

impl Answer {
    /// Interpret a raw input line
    pub fn parse(line: &str) -> Self {
        match line.trim().to_lowercase().as_str() {
            "y" => Answer::Yes,
            "n" => Answer::No,
            _ => Answer::Retry,
        }
    }
}

/// Something that can answer a yes/no question
pub trait Confirm {
    /// Ask `question` until a definite answer is given
    fn confirm(&mut self, question: &str) -> Result<bool>;

    /// Show a warning that precedes a confirmation
    fn notice(&mut self, message: &str) {
        println!("{message}");
    }
}

/// Reads answers from a line-oriented input and writes prompts to an output
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl LinePrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the controlling terminal
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Confirm for LinePrompt<R, W> {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        loop {
            write!(self.output, "{question}")?;
            self.output.flush()?;

            let mut line = String::new();
            // End of input can never produce an answer
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(false);
            }
            match Answer::parse(&line) {
                Answer::Yes => return Ok(true),
                Answer::No => return Ok(false),
                Answer::Retry => continue,
            }
        }
    }

    fn notice(&mut self, message: &str) {
        let _ = writeln!(self.output, "{message}");
    }
}

/// Accepts every confirmation without asking (`--yes`)
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _question: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Pre-recorded answers, for tests and scripted callers
///
/// Runs out to "no".
#[derive(Debug, Default)]
pub struct ScriptedAnswers {
    answers: VecDeque<bool>,
    /// Every question asked, in order
    pub asked: Vec<String>,
    /// Every warning shown, in order
    pub notices: Vec<String>,
}

impl ScriptedAnswers {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
            notices: Vec::new(),
        }
    }
}

impl Confirm for ScriptedAnswers {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        self.asked.push(question.to_string());
        Ok(self.answers.pop_front().unwrap_or(false))
    }

    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}
