//! Interactive prompting layer
//!
//! Workflows ask for input only through [`Prompter`], so they can be driven
//! by a terminal or by a scripted answer queue in tests. Every prompt blocks
//! until an answer arrives.
//!
//! Numbered menus are 1-based. An answer that is not a number in range
//! aborts the command with [`SelectionError::InvalidSelection`].

#[cfg(test)]
mod scripted;

#[cfg(test)]
pub use scripted::ScriptedPrompter;

use anyhow::{Result, anyhow};
use console::{Term, style};
use dialoguer::{Confirm, Input};
use nsai_core::selection::{SelectionError, parse_choice, parse_choice_or_default};

pub trait Prompter {
    /// Read one line of free text
    fn line(&mut self, label: &str) -> Result<String>;

    /// Ask a yes/no question
    fn confirm(&mut self, label: &str, default: bool) -> Result<bool>;

    /// Show a numbered menu
    fn show_menu(&mut self, title: &str, options: &[String]);

    /// Read a non-empty line
    fn required_line(&mut self, label: &str) -> Result<String> {
        let value = self.line(label)?;
        let value = value.trim();
        if value.is_empty() {
            return Err(anyhow!("{label} cannot be empty"));
        }
        Ok(value.to_string())
    }

    /// Show a menu and return the 0-based index of the chosen option
    fn choice(&mut self, title: &str, options: &[String]) -> Result<usize> {
        if options.is_empty() {
            return Err(SelectionError::Empty.into());
        }
        self.show_menu(title, options);
        let answer = self.line(&format!("Select an option (1-{})", options.len()))?;
        Ok(parse_choice(&answer, options.len())?)
    }

    /// Like [`Prompter::choice`], but an empty answer picks `default`
    fn choice_or_default(&mut self, title: &str, options: &[String], default: usize) -> Result<usize> {
        if options.is_empty() {
            return Err(SelectionError::Empty.into());
        }
        self.show_menu(title, options);
        let answer = self.line(&format!(
            "Select an option (1-{}, Enter for {})",
            options.len(),
            default + 1
        ))?;
        Ok(parse_choice_or_default(&answer, options.len())?.unwrap_or(default))
    }

    /// Block until the user presses Enter
    fn pause(&mut self, label: &str) -> Result<()> {
        self.line(label).map(|_| ())
    }
}

/// Restore the cursor after Ctrl+C and report the cancellation
fn handle_interrupt(err: dialoguer::Error) -> anyhow::Error {
    let _ = Term::stdout().show_cursor();
    anyhow!("Prompt cancelled: {err}")
}

/// Terminal-backed prompter
#[derive(Debug, Default)]
pub struct TermPrompter;

impl Prompter for TermPrompter {
    fn line(&mut self, label: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
            .map_err(handle_interrupt)
    }

    fn confirm(&mut self, label: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(label)
            .default(default)
            .interact()
            .map_err(handle_interrupt)
    }

    fn show_menu(&mut self, title: &str, options: &[String]) {
        println!();
        println!("{}", style(title).bold());
        for (i, option) in options.iter().enumerate() {
            println!("  {}. {option}", style(i + 1).cyan());
        }
    }
}
