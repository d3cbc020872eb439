//! CLI module
//!
//! Command-line interface for migrating connectors.
//!
//! # Commands
//!
//! - `bigquery` - BigQuery Legacy sink to BigQuery Storage Write API sink
//! - `http` - HTTP V1 sink to HTTP V2 sink

mod commands;
mod runner;

pub use commands::{Cli, Commands, ConnectorArgs};
pub use runner::{Runner, KEYFILE_ENV};
