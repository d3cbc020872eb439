//! Interactive review flow
//!
//! Closes every gap the transformer left in the draft config. Each decision
//! shows its allowed values, reads an answer through a
//! [`Prompter`](crate::prompt::Prompter), validates it and writes it into the
//! draft. Invalid answers are rejected and the same question is asked again.
//!
//! Once the queue is empty the draft is validated, shown with secrets masked,
//! and only handed on after the operator explicitly confirms it.

mod flow;

pub use flow::{parse_commit_interval, ReviewFlow, ReviewedConnector, KEY_BEARING_FORMATS};

#[cfg(test)]
mod tests;
