//! Interactive selection prompt.
//!
//! The add command asks which range to use when more than one suggestion
//! survives. The trait keeps commands testable with a scripted prompt.

use sprout_core::{SproutError, SproutResult};
use std::io::{BufRead, Write};

/// A blocking single-choice question
pub trait Prompt {
    /// Ask the user to pick one of `choices`, returning its index
    fn select(&mut self, message: &str, choices: &[String]) -> SproutResult<usize>;
}

/// Numbered-menu prompt on stdin/stderr.
///
/// Stderr keeps the menu out of the report stream on stdout.
pub struct StdinPrompt;

impl StdinPrompt {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdinPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for StdinPrompt {
    fn select(&mut self, message: &str, choices: &[String]) -> SproutResult<usize> {
        let stdin = std::io::stdin();
        let mut stderr = std::io::stderr();

        let write_error = |e| SproutError::io("Failed to write prompt".to_string(), e);

        writeln!(stderr, "{}", message).map_err(write_error)?;
        for (index, choice) in choices.iter().enumerate() {
            writeln!(stderr, "  {}) {}", index + 1, choice).map_err(write_error)?;
        }

        loop {
            write!(stderr, "> ").map_err(write_error)?;
            stderr.flush().map_err(write_error)?;

            let mut line = String::new();
            let read = stdin
                .lock()
                .read_line(&mut line)
                .map_err(|e| SproutError::io("Failed to read answer".to_string(), e))?;
            if read == 0 {
                return Err(SproutError::PromptAborted {
                    reason: "stdin closed".to_string(),
                });
            }

            match line.trim().parse::<usize>() {
                Ok(choice) if (1..=choices.len()).contains(&choice) => return Ok(choice - 1),
                _ => {
                    writeln!(stderr, "Enter a number between 1 and {}", choices.len())
                        .map_err(write_error)?;
                }
            }
        }
    }
}
