//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::control_plane::{CloudControlPlane, ControlPlaneOptions};
use crate::credentials::CredentialResolver;
use crate::error::{Error, Result, ResultExt};
use crate::migration::{migrate, MigrationContext, MigrationOutcome};
use crate::prompt::{Prompter, TerminalPrompter};
use crate::transform::TransformOptions;
use crate::types::OptionStringExt;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Environment variable naming a default keyfile path
pub const KEYFILE_ENV: &str = "GCP_KEYFILE_PATH";

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command against the terminal
    pub async fn run(&self) -> Result<()> {
        let mut prompter = TerminalPrompter::new();
        let outcome = self.run_with(&mut prompter).await?;
        println!("{}", outcome.connector_id);
        Ok(())
    }

    /// Run the CLI command, asking `prompter` every question
    pub async fn run_with(&self, prompter: &mut dyn Prompter) -> Result<MigrationOutcome> {
        let command = &self.cli.command;
        let target = command.target();
        let mut ctx = MigrationContext::new(
            command.kind(),
            &target.environment,
            &target.cluster_id,
            &target.connector,
        )
        .with_options(self.transform_options()?);

        let mut resolver = CredentialResolver::new();
        if let Some(path) = &target.credentials_file {
            resolver = resolver.with_file(path);
        }
        let (credentials, source) = resolver
            .resolve(prompter)
            .context("resolving credentials")?;
        debug!("Credentials resolved from {source}");

        let control_plane = CloudControlPlane::connect(
            &self.control_plane_options(),
            credentials.clone(),
            &ctx.environment,
            &ctx.cluster_id,
        )?;
        ctx.credentials = Some(credentials);

        info!(
            "Migrating {} connector '{}' in {}/{}",
            ctx.kind, ctx.connector_name, ctx.environment, ctx.cluster_id
        );
        migrate(&mut ctx, &control_plane, prompter).await
    }

    fn control_plane_options(&self) -> ControlPlaneOptions {
        ControlPlaneOptions {
            base_url: self.cli.base_url.clone(),
            timeout: Duration::from_secs(self.cli.timeout_secs),
            max_retries: self.cli.max_retries,
        }
    }

    /// Keyfile and topic map supplied on the command line
    pub(crate) fn transform_options(&self) -> Result<TransformOptions> {
        self.transform_options_with(|key| std::env::var(key).ok())
    }

    /// Like [`Self::transform_options`], using `env` for variable lookup
    ///
    /// `--keyfile-json` and `--keyfile` take precedence over
    /// `GCP_KEYFILE_PATH`. An unreadable file named by the variable is
    /// skipped so the keyfile is asked for during review.
    pub(crate) fn transform_options_with<F>(&self, env: F) -> Result<TransformOptions>
    where
        F: Fn(&str) -> Option<String>,
    {
        let target = self.cli.command.target();
        let mut options = TransformOptions::new(&target.connector);

        if let Commands::BigQuery {
            keyfile,
            keyfile_json,
            topic_table_map,
            ..
        } = &self.cli.command
        {
            if let Some(json) = keyfile_json {
                options = options.with_keyfile(json.clone());
            } else if let Some(path) = keyfile {
                options = options.with_keyfile(read_keyfile(path)?);
            } else if let Some(path) = env(KEYFILE_ENV).none_if_empty() {
                match read_keyfile(Path::new(&path)) {
                    Ok(content) => options = options.with_keyfile(content),
                    Err(e) => warn!("Ignoring {KEYFILE_ENV}: {e}"),
                }
            }
            if let Some(map) = topic_table_map {
                options = options.with_topic_table_map(map.clone());
            }
        }

        Ok(options)
    }
}

fn read_keyfile(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Cannot read keyfile {}: {e}", path.display())))
}
