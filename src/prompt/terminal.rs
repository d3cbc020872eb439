//! Interactive terminal prompter

use super::Prompter;
use crate::error::Result;
use dialoguer::{Confirm, Input, Password};

/// Prompter backed by the operator's terminal
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    /// Create a terminal prompter
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for TerminalPrompter {
    fn say(&mut self, text: &str) {
        println!("{text}");
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer.trim().to_string())
    }

    fn password(&mut self, prompt: &str) -> Result<String> {
        Ok(Password::new().with_prompt(prompt).interact()?)
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }
}
