//! Command orchestration behind the `cc-sdd` binary.

pub mod setup;

use std::io::{self, BufRead as _, IsTerminal as _, Write as _};

/// Asks the user whether to go ahead with an action.
#[cfg_attr(test, mockall::automock)]
pub trait Confirm {
    /// Show `prompt` and return `true` if the user agreed.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be written or the answer cannot
    /// be read.
    fn confirm(&self, prompt: &str) -> io::Result<bool>;
}

/// Prompts on stderr and reads the answer from stdin.
///
/// When stdin is not a terminal (pipes, CI) there is nobody to ask, so the
/// answer is always yes.
#[derive(Debug, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> io::Result<bool> {
        let stdin = io::stdin();
        if !stdin.is_terminal() {
            return Ok(true);
        }

        let mut stderr = io::stderr().lock();
        write!(stderr, "{prompt} [y/N] ")?;
        stderr.flush()?;

        let mut answer = String::new();
        stdin.lock().read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
