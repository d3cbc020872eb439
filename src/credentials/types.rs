//! Credential types

use serde::Deserialize;
use std::fmt;

/// Operator identity used to open a control-plane session
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    /// Login identity (email address)
    #[serde(alias = "identity")]
    pub email: String,
    /// Login secret
    #[serde(alias = "secret")]
    pub password: String,
}

impl Credentials {
    /// Create credentials
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Both halves present and non-blank
    pub fn is_complete(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where a set of credentials came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// `EMAIL` / `PASSWORD` environment variables
    Environment,
    /// JSON credentials file
    File,
    /// Typed in by the operator
    Prompt,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::File => write!(f, "credentials file"),
            CredentialSource::Prompt => write!(f, "interactive prompt"),
        }
    }
}
