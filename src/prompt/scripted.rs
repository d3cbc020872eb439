//! Scripted prompter for tests and non-interactive runs

use super::{parse_yes_no, Prompter};
use crate::error::{Error, Result};
use std::collections::VecDeque;

/// Prompter that answers from a fixed script and records what it was shown
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedPrompter {
    /// Create a prompter that replays `answers` in order
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Everything shown to the operator, prompts included
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Number of transcript lines containing `needle`
    pub fn count_shown(&self, needle: &str) -> usize {
        self.transcript.iter().filter(|l| l.contains(needle)).count()
    }

    /// Whether any transcript line contains `needle`
    pub fn was_shown(&self, needle: &str) -> bool {
        self.count_shown(needle) > 0
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next_answer(&mut self, prompt: &str) -> Result<String> {
        self.transcript.push(format!("? {prompt}"));
        self.answers
            .pop_front()
            .ok_or_else(|| Error::prompt(format!("no scripted answer for '{prompt}'")))
    }
}

impl Prompter for ScriptedPrompter {
    fn say(&mut self, text: &str) {
        self.transcript.push(text.to_string());
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        Ok(self.next_answer(prompt)?.trim().to_string())
    }

    fn password(&mut self, prompt: &str) -> Result<String> {
        self.next_answer(prompt)
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let answer = self.next_answer(prompt)?;
        if answer.trim().is_empty() {
            return Ok(false);
        }
        parse_yes_no(&answer)
            .ok_or_else(|| Error::prompt(format!("'{answer}' is not a yes/no answer")))
    }
}
