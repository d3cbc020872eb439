//! Operator prompting
//!
//! Everything that asks the operator a question goes through the
//! [`Prompter`] trait, so the review flow and credential resolution can be
//! driven by a terminal in production and by a script in tests.
//!
//! - [`TerminalPrompter`]: interactive terminal via `dialoguer`
//! - [`ScriptedPrompter`]: canned answers with a transcript of everything shown

mod scripted;
mod terminal;

pub use scripted::ScriptedPrompter;
pub use terminal::TerminalPrompter;

use crate::error::Result;

/// Capability for asking the operator questions
pub trait Prompter {
    /// Show informational text
    fn say(&mut self, text: &str);

    /// Read a line of free text (trimmed, may be empty)
    fn input(&mut self, prompt: &str) -> Result<String>;

    /// Read a secret without echoing it
    fn password(&mut self, prompt: &str) -> Result<String>;

    /// Ask a yes/no question; anything but an explicit yes is a no
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// One selectable option in a numbered menu
#[derive(Debug, Clone)]
pub struct Choice<T> {
    /// Value returned when selected
    pub value: T,
    /// Label the operator may type instead of the number
    pub label: &'static str,
    /// Short explanation shown next to the label
    pub help: &'static str,
}

impl<T> Choice<T> {
    /// Create a choice
    pub const fn new(value: T, label: &'static str, help: &'static str) -> Self {
        Self { value, label, help }
    }
}

/// Ask until `parse` accepts the answer
///
/// Rejections are shown to the operator and the same question is asked again.
pub fn ask_until<T, F>(prompter: &mut dyn Prompter, prompt: &str, mut parse: F) -> Result<T>
where
    F: FnMut(&str) -> std::result::Result<T, String>,
{
    loop {
        let answer = prompter.input(prompt)?;
        match parse(answer.trim()) {
            Ok(value) => return Ok(value),
            Err(reason) => prompter.say(&format!("❌ {reason}. Please try again.")),
        }
    }
}

/// Present a numbered menu and return the selected value
///
/// The operator may answer with the option number or its label. An empty
/// answer selects `default` when there is one; any other answer is rejected.
pub fn select<T: Clone>(
    prompter: &mut dyn Prompter,
    title: &str,
    options: &[Choice<T>],
    default: Option<usize>,
) -> Result<T> {
    prompter.say(title);
    for (i, option) in options.iter().enumerate() {
        prompter.say(&format!("{}. {} - {}", i + 1, option.label, option.help));
    }

    let prompt = match default {
        Some(d) => format!(
            "Choose an option (1-{}, default is {} for {})",
            options.len(),
            d + 1,
            options[d].label
        ),
        None => format!("Choose an option (1-{})", options.len()),
    };

    let index = ask_until(prompter, &prompt, |answer| {
        parse_choice(answer, options, default)
    })?;
    Ok(options[index].value.clone())
}

fn parse_choice<T>(
    answer: &str,
    options: &[Choice<T>],
    default: Option<usize>,
) -> std::result::Result<usize, String> {
    if answer.is_empty() {
        return default.ok_or_else(|| "A selection is required".to_string());
    }

    if let Ok(n) = answer.parse::<usize>() {
        if (1..=options.len()).contains(&n) {
            return Ok(n - 1);
        }
        return Err(format!("Choose a number between 1 and {}", options.len()));
    }

    options
        .iter()
        .position(|o| o.label.eq_ignore_ascii_case(answer))
        .ok_or_else(|| format!("'{answer}' is not one of the listed options"))
}

/// Interpret a yes/no answer typed as free text
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" => Some(true),
        "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
