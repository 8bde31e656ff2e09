//! Prompter that answers from a fixed script

use std::collections::VecDeque;

use anyhow::{Result, anyhow};

use super::Prompter;

/// Answers prompts in order from a queue
///
/// Running out of answers is an error, so a workflow that asks more
/// questions than expected fails loudly.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    /// Every label asked, in order
    pub asked: Vec<String>,
    /// Titles of the menus shown
    pub menus: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
            menus: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, label: &str) -> Result<String> {
        self.asked.push(label.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted answer for prompt '{label}'"))
    }
}

impl Prompter for ScriptedPrompter {
    fn line(&mut self, label: &str) -> Result<String> {
        self.next(label)
    }

    fn confirm(&mut self, label: &str, default: bool) -> Result<bool> {
        let answer = self.next(label)?;
        match answer.trim().to_lowercase().as_str() {
            "" => Ok(default),
            "y" | "yes" => Ok(true),
            "n" | "no" => Ok(false),
            other => Err(anyhow!("scripted answer '{other}' is not yes/no")),
        }
    }

    fn show_menu(&mut self, title: &str, _options: &[String]) {
        self.menus.push(title.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsai_core::SelectionError;

    fn options() -> Vec<String> {
        vec!["aws".to_string(), "gcp".to_string(), "azure".to_string()]
    }

    #[test]
    fn choice_is_zero_based() {
        let mut prompt = ScriptedPrompter::new(["2"]);
        assert_eq!(prompt.choice("Provider", &options()).unwrap(), 1);
        assert_eq!(prompt.menus, vec!["Provider"]);
    }

    #[test]
    fn out_of_range_choice_aborts() {
        let mut prompt = ScriptedPrompter::new(["7", "1"]);
        let err = prompt.choice("Provider", &options()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SelectionError>(),
            Some(SelectionError::InvalidSelection { .. })
        ));
        // No re-prompt
        assert_eq!(prompt.remaining(), 1);
    }

    #[test]
    fn blank_answer_takes_default() {
        let mut prompt = ScriptedPrompter::new([""]);
        assert_eq!(prompt.choice_or_default("Cluster", &options(), 2).unwrap(), 2);
    }

    #[test]
    fn empty_menu_is_an_error() {
        let mut prompt = ScriptedPrompter::new(["1"]);
        assert!(prompt.choice("Nothing", &[]).is_err());
    }

    #[test]
    fn required_line_rejects_blank() {
        let mut prompt = ScriptedPrompter::new(["   "]);
        assert!(prompt.required_line("Email").is_err());
    }

    #[test]
    fn exhausted_script_is_an_error() {
        let mut prompt = ScriptedPrompter::default();
        assert!(prompt.line("Email").is_err());
        assert_eq!(prompt.asked, vec!["Email"]);
    }
}
