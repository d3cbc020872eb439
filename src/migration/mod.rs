//! Migration driver
//!
//! Sequences one run: fetch the legacy connector and its offsets, transform
//! the config, review it with the operator, and create the replacement.
//! All run state lives in a [`MigrationContext`] owned by the caller.

mod context;
mod driver;

pub use context::{MigrationContext, MigrationOutcome};
pub use driver::migrate;
