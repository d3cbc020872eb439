// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Confluent Cloud connector migration
//!
//! Moves a legacy Confluent Cloud sink connector onto its successor without
//! losing its place in the input topics.
//!
//! ## Supported migrations
//!
//! - **BigQuery**: `BigQuerySink` (legacy) to `BigQueryStorageSink` (Storage Write API)
//! - **HTTP**: `HttpSink` (V1) to `HttpSinkV2`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cc_connector_migrate::{
//!     control_plane::{CloudControlPlane, ControlPlaneOptions},
//!     credentials::Credentials,
//!     migration::{migrate, MigrationContext},
//!     prompt::TerminalPrompter,
//!     ConnectorKind, Result,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     let credentials = Credentials::new("me@example.com", "secret");
//!     let control_plane = CloudControlPlane::connect(
//!         &ControlPlaneOptions::default(),
//!         credentials,
//!         "env-123456",
//!         "lkc-abc123",
//!     )?;
//!
//!     let mut ctx = MigrationContext::new(ConnectorKind::Http, "env-123456", "lkc-abc123", "my-sink");
//!     let outcome = migrate(&mut ctx, &control_plane, &mut TerminalPrompter::new()).await?;
//!     println!("{}", outcome.connector_id);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                              CLI                                 │
//! │        bigquery | http  →  credentials  →  migration::migrate    │
//! └──────────────────────────────────────────────────────────────────┘
//!                                 │
//! ┌───────────────┬───────────────┴──┬──────────────┬────────────────┐
//! │ Control plane │    Transform     │    Review    │    Prompt      │
//! ├───────────────┼──────────────────┼──────────────┼────────────────┤
//! │ status/config │ BigQuery → V2    │ decisions    │ terminal       │
//! │ offsets       │ HTTP V1 → V2     │ validation   │ scripted       │
//! │ create        │ dropped settings │ final review │                │
//! ├───────────────┴──────────────────┴──────────────┴────────────────┤
//! │          HTTP client (session auth, retry, backoff)              │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Core types shared across modules
pub mod types;

/// Connector configuration model
pub mod config;

/// Operator credentials
pub mod credentials;

/// Control-plane session authentication
pub mod auth;

/// HTTP client with retry and backoff
pub mod http;

/// Confluent Cloud connector API
pub mod control_plane;

/// Legacy to V2 config transformation
pub mod transform;

/// Operator prompting
pub mod prompt;

/// Interactive review of the transformed config
pub mod review;

/// Migration driver
pub mod migration;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{ConfigValue, ConnectorConfig};
pub use control_plane::{CloudControlPlane, ControlPlane};
pub use migration::{migrate, MigrationContext, MigrationOutcome};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
