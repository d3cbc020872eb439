//! Credential resolver implementation

use super::types::{CredentialSource, Credentials};
use crate::error::{Error, Result};
use crate::prompt::Prompter;
use crate::types::OptionStringExt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable holding the login email
pub const EMAIL_ENV: &str = "EMAIL";

/// Environment variable holding the login password
pub const PASSWORD_ENV: &str = "PASSWORD";

/// Resolves operator credentials from the configured sources
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    /// Optional JSON credentials file
    file: Option<PathBuf>,
    /// Whether the interactive prompt may be used as a last resort
    interactive: bool,
}

impl Default for CredentialResolver {
    fn default() -> Self {
        Self {
            file: None,
            interactive: true,
        }
    }
}

impl CredentialResolver {
    /// Create a resolver using environment and prompt only
    pub fn new() -> Self {
        Self::default()
    }

    /// Also consult a credentials file
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Never fall back to the interactive prompt
    #[must_use]
    pub fn non_interactive(mut self) -> Self {
        self.interactive = false;
        self
    }

    /// Resolve credentials from the process environment
    pub fn resolve(&self, prompter: &mut dyn Prompter) -> Result<(Credentials, CredentialSource)> {
        self.resolve_with(|key| std::env::var(key).ok(), prompter)
    }

    /// Resolve credentials using `env` for variable lookup
    pub fn resolve_with<F>(
        &self,
        env: F,
        prompter: &mut dyn Prompter,
    ) -> Result<(Credentials, CredentialSource)>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(creds) = from_env(&env) {
            debug!("Using credentials from environment");
            return Ok((creds, CredentialSource::Environment));
        }

        if let Some(path) = &self.file {
            match from_file(path) {
                Ok(creds) => {
                    debug!("Using credentials from {}", path.display());
                    return Ok((creds, CredentialSource::File));
                }
                Err(e) => {
                    warn!("Ignoring credentials file {}: {e}", path.display());
                    prompter.say(&format!(
                        "⚠️  Could not use credentials file {}: {e}",
                        path.display()
                    ));
                }
            }
        }

        if !self.interactive {
            return Err(Error::missing_credentials(format!(
                "set {EMAIL_ENV} and {PASSWORD_ENV} or supply a credentials file"
            )));
        }

        from_prompt(prompter).map(|creds| (creds, CredentialSource::Prompt))
    }
}

fn from_env<F>(env: &F) -> Option<Credentials>
where
    F: Fn(&str) -> Option<String>,
{
    let email = env(EMAIL_ENV).none_if_empty()?;
    let password = env(PASSWORD_ENV).none_if_empty()?;
    Some(Credentials::new(email, password))
}

fn from_file(path: &Path) -> Result<Credentials> {
    let contents = std::fs::read_to_string(path)?;
    let creds: Credentials = serde_json::from_str(&contents)?;
    if !creds.is_complete() {
        return Err(Error::missing_credentials(
            "credentials file has an empty email or password",
        ));
    }
    Ok(creds)
}

fn from_prompt(prompter: &mut dyn Prompter) -> Result<Credentials> {
    let unavailable =
        |e: Error| Error::missing_credentials(format!("interactive prompt unavailable: {e}"));

    let email = prompter.input("Confluent Cloud email").map_err(unavailable)?;
    let password = prompter
        .password("Confluent Cloud password")
        .map_err(unavailable)?;

    let creds = Credentials::new(email, password);
    if !creds.is_complete() {
        return Err(Error::missing_credentials(
            "no email or password entered at the prompt",
        ));
    }
    Ok(creds)
}
