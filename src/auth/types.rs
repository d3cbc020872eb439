//! Auth configuration types

use crate::credentials::Credentials;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifetime of a control-plane session token before it is refreshed
pub const SESSION_TOKEN_LIFETIME_SECONDS: i64 = 180;

/// How the session token is attached to a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPlacement {
    /// `auth_token` cookie
    #[default]
    Cookie,
    /// `Authorization: Bearer` header
    Bearer,
}

/// Session login settings
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Login endpoint URL
    pub login_url: String,
    /// Operator credentials
    pub credentials: Credentials,
    /// Seconds before the token is considered stale
    pub token_lifetime_seconds: i64,
}

impl AuthConfig {
    /// Session login against `login_url` with the default token lifetime
    pub fn session(login_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            login_url: login_url.into(),
            credentials,
            token_lifetime_seconds: SESSION_TOKEN_LIFETIME_SECONDS,
        }
    }

    /// Override the token lifetime
    #[must_use]
    pub fn token_lifetime(mut self, seconds: i64) -> Self {
        self.token_lifetime_seconds = seconds;
        self
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The session token
    pub token: String,
    /// When the token goes stale
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        Self {
            token,
            expires_at: Utc::now() + chrono::Duration::seconds(seconds),
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}
