//! Interactive prompts used by `setup` and config repair
//!
//! Everything that asks the user a question goes through [`Prompt`] so the
//! config flow can be driven by canned answers in tests.

use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Write};

/// Source of answers for interactive configuration
pub trait Prompt {
    /// Ask a question; an empty answer yields `default` when one is given
    fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String>;

    /// Ask for a secret without echo
    ///
    /// Returns `None` when the user left the answer empty, so the caller can
    /// keep a value it already has.
    fn ask_secret(&mut self, question: &str, has_default: bool) -> Result<Option<String>>;

    /// Yes/no question, defaulting to no
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Prompts on the controlling terminal
pub struct StdinPrompt;

impl StdinPrompt {
    fn read_line(&self) -> Result<String> {
        read_answer(&mut io::stdin().lock())
    }
}

/// Read one trimmed line; end of input is an error, not an empty answer
fn read_answer(reader: &mut impl BufRead) -> Result<String> {
    let mut input = String::new();
    let read = reader
        .read_line(&mut input)
        .context("Failed to read from stdin")?;
    if read == 0 {
        bail!("stdin closed while waiting for an answer");
    }
    Ok(input.trim().to_string())
}

impl Prompt for StdinPrompt {
    fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String> {
        match default {
            Some(d) => print!("{} [{}]: ", question, d),
            None => print!("{}: ", question),
        }
        io::stdout().flush()?;

        let input = self.read_line()?;
        Ok(resolve_answer(input, default))
    }

    fn ask_secret(&mut self, question: &str, has_default: bool) -> Result<Option<String>> {
        let label = if has_default {
            format!("{} [keep current]: ", question)
        } else {
            format!("{}: ", question)
        };
        let input = rpassword::prompt_password(label).context("Failed to read secret")?;
        let input = input.trim().to_string();
        Ok((!input.is_empty()).then_some(input))
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        print!("{} (y/N) ", question);
        io::stdout().flush()?;

        let input = self.read_line()?;
        Ok(input.eq_ignore_ascii_case("y") || input.eq_ignore_ascii_case("yes"))
    }
}

/// Pick the typed answer, or the default when the answer is blank
pub fn resolve_answer(input: String, default: Option<&str>) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        default.unwrap_or_default().to_string()
    } else {
        trimmed.to_string()
    }
}
