//! Authenticator implementation
//!
//! Handles applying the session token to requests and refreshing it.

use super::types::{AuthConfig, CachedToken, TokenPlacement};
use crate::error::{Error, Result};
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Authenticator handles applying authentication to HTTP requests
pub struct Authenticator {
    /// Auth configuration
    config: AuthConfig,
    /// Cached session token
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// HTTP client for login requests
    http_client: Client,
}

impl Authenticator {
    /// Create an authenticator that logs in through `http_client`
    pub fn with_client(config: AuthConfig, http_client: Client) -> Self {
        Self {
            config,
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Apply authentication to a request builder
    pub async fn apply(
        &self,
        req: RequestBuilder,
        placement: TokenPlacement,
    ) -> Result<RequestBuilder> {
        let token = self.get_or_refresh_token().await?;

        Ok(match placement {
            TokenPlacement::Cookie => {
                req.header(reqwest::header::COOKIE, format!("auth_token={token}"))
            }
            TokenPlacement::Bearer => req.bearer_auth(token),
        })
    }

    /// Get a valid token, refreshing if necessary
    async fn get_or_refresh_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        // Double-check after acquiring write lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.fetch_session_token().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// Log in and read the session token from the response
    async fn fetch_session_token(&self) -> Result<CachedToken> {
        let AuthConfig {
            login_url,
            credentials,
            token_lifetime_seconds,
        } = &self.config;
        debug!("Opening control-plane session at {login_url}");

        let response = self
            .http_client
            .post(login_url.as_str())
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password,
            }))
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth {
                message: format!("Login request failed with status {status}: {body}"),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::auth(format!("Login response is not JSON: {e}")))?;

        let token = extract_jsonpath(&body, "$.token")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::auth("Auth token not found in login response"))?;

        Ok(CachedToken::expires_in(token, *token_lifetime_seconds))
    }
}

/// Extract a value from JSON using a simple JSONPath expression
/// Supports basic paths like "$.connector.state" or "connector.state"
pub fn extract_jsonpath(value: &Value, path: &str) -> Option<String> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.') {
        match current {
            Value::Object(map) => {
                current = map.get(part)?;
            }
            _ => return None,
        }
    }

    match current {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
