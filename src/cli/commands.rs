//! CLI commands and argument parsing

use crate::control_plane::DEFAULT_BASE_URL;
use crate::types::ConnectorKind;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Migrate Confluent Cloud sink connectors to their V2 successors
#[derive(Parser, Debug)]
#[command(name = "cc-connector-migrate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Control-plane base URL
    #[arg(long, global = true, env = "CONFLUENT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value = "30")]
    pub timeout_secs: u64,

    /// Retries for control-plane reads
    #[arg(long, global = true, default_value = "2")]
    pub max_retries: u32,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Migrate a BigQuery Legacy sink to the Storage Write API sink
    #[command(name = "bigquery")]
    BigQuery {
        #[command(flatten)]
        target: ConnectorArgs,

        /// Path to the GCP service-account keyfile [fallback: $GCP_KEYFILE_PATH]
        #[arg(long, conflicts_with = "keyfile_json")]
        keyfile: Option<PathBuf>,

        /// Inline GCP service-account keyfile JSON
        #[arg(long)]
        keyfile_json: Option<String>,

        /// Topic to table map (topic:table,...)
        #[arg(long)]
        topic_table_map: Option<String>,
    },

    /// Migrate an HTTP V1 sink to the HTTP V2 sink
    Http {
        #[command(flatten)]
        target: ConnectorArgs,
    },
}

impl Commands {
    /// Connector family the command migrates
    pub fn kind(&self) -> ConnectorKind {
        match self {
            Commands::BigQuery { .. } => ConnectorKind::BigQuery,
            Commands::Http { .. } => ConnectorKind::Http,
        }
    }

    /// Flags shared by every subcommand
    pub fn target(&self) -> &ConnectorArgs {
        match self {
            Commands::BigQuery { target, .. } | Commands::Http { target } => target,
        }
    }
}

/// Identifies the legacy connector and how to log in
#[derive(Args, Debug, Clone)]
pub struct ConnectorArgs {
    /// Name of the legacy connector
    #[arg(long)]
    pub connector: String,

    /// Environment id (env-...)
    #[arg(long)]
    pub environment: String,

    /// Kafka cluster id (lkc-...)
    #[arg(long)]
    pub cluster_id: String,

    /// JSON file with `email` and `password`
    #[arg(long)]
    pub credentials_file: Option<PathBuf>,
}
