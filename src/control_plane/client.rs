//! Control-plane client backed by the cloud REST API

use super::types::{
    ConfigResponse, ConnectorId, ConnectorStatus, CreateConnectorRequest, OffsetReference,
    OffsetsResponse, StatusResponse,
};
use super::ControlPlane;
use crate::auth::AuthConfig;
use crate::config::ConnectorConfig;
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Default control-plane base URL
pub const DEFAULT_BASE_URL: &str = "https://confluent.cloud/";

/// Connection settings for [`CloudControlPlane::connect`]
#[derive(Debug, Clone)]
pub struct ControlPlaneOptions {
    /// Base URL of the control plane
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries for idempotent reads
    pub max_retries: u32,
}

impl Default for ControlPlaneOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
        }
    }
}

/// Control plane scoped to one environment and cluster
#[derive(Debug)]
pub struct CloudControlPlane {
    http: HttpClient,
    base_url: Url,
    environment: String,
    cluster_id: String,
}

impl CloudControlPlane {
    /// Wrap an existing HTTP client; connector URLs are resolved against `base_url`
    pub fn new(
        http: HttpClient,
        base_url: Url,
        environment: impl Into<String>,
        cluster_id: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url,
            environment: environment.into(),
            cluster_id: cluster_id.into(),
        }
    }

    /// Build a client that logs in with `credentials` on first use
    pub fn connect(
        options: &ControlPlaneOptions,
        credentials: Credentials,
        environment: impl Into<String>,
        cluster_id: impl Into<String>,
    ) -> Result<Self> {
        let base = Url::parse(&options.base_url)?;
        let login_url = base.join("api/sessions")?;

        let config = HttpClientConfig::builder()
            .base_url(base.as_str())
            .timeout(options.timeout)
            .max_retries(options.max_retries)
            .build();

        let http = HttpClient::with_auth(
            config,
            AuthConfig::session(login_url.as_str(), credentials),
        )?;

        Ok(Self::new(http, base, environment, cluster_id))
    }

    /// URL of the connector collection, followed by `segments`
    ///
    /// Each segment is percent-encoded, so a connector name can never
    /// address another resource.
    pub(super) fn connectors_url(&self, segments: &[&str]) -> Result<String> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::config(format!("'{}' cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend([
                "api",
                "accounts",
                self.environment.as_str(),
                "clusters",
                self.cluster_id.as_str(),
                "connectors",
            ])
            .extend(segments);
        Ok(url.into())
    }
}

#[async_trait]
impl ControlPlane for CloudControlPlane {
    async fn fetch_connector_status(&self, name: &str) -> Result<ConnectorStatus> {
        let path = self.connectors_url(&[name])?;
        let status_path = self.connectors_url(&[name, "status"])?;

        info!("Fetching status of connector '{name}'");
        let status: StatusResponse = self
            .http
            .get_json(&status_path)
            .await
            .map_err(|e| not_found_for(name, e))?;

        info!("Fetching config of connector '{name}'");
        let body: ConfigResponse = self
            .http
            .get_json(&path)
            .await
            .map_err(|e| not_found_for(name, e))?;

        let config = ConnectorConfig::from_json(body.config)?;
        debug!(
            "Connector '{name}' is {} with {} config keys",
            status.connector.state,
            config.len()
        );

        Ok(ConnectorStatus {
            state: status.connector.state,
            config,
        })
    }

    async fn fetch_offsets(&self, name: &str) -> Result<OffsetReference> {
        info!("Fetching offsets of connector '{name}'");
        let body: OffsetsResponse = self
            .http
            .get_json_with_config(
                &self.connectors_url(&[name, "offsets"])?,
                RequestConfig::new().bearer(),
            )
            .await
            .map_err(|e| not_found_for(name, e))?;

        if body.offsets.is_null() {
            warn!("Connector '{name}' reported no committed offsets");
        }

        Ok(OffsetReference::new(body.offsets))
    }

    async fn create_connector(
        &self,
        name: &str,
        config: &ConnectorConfig,
        offsets: &OffsetReference,
    ) -> Result<ConnectorId> {
        let request = CreateConnectorRequest {
            name,
            config,
            offsets,
        };

        info!("Creating connector '{name}'");
        let response = self
            .http
            .request(
                Method::POST,
                &self.connectors_url(&[])?,
                RequestConfig::new()
                    .json(serde_json::to_value(&request)?)
                    .retries(0),
            )
            .await
            .map_err(|e| creation_error(name, e))?;

        // The connector exists from here on; a malformed body must not fail the run.
        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Create response for '{name}' was not JSON: {e}");
                Value::Null
            }
        };

        Ok(connector_id_from(&body, name))
    }
}

fn not_found_for(name: &str, err: Error) -> Error {
    match err {
        Error::HttpStatus { status: 404, .. } => Error::not_found(name),
        other => other,
    }
}

fn creation_error(name: &str, err: Error) -> Error {
    match err {
        Error::HttpStatus { status: 409, .. } => Error::conflict(name),
        Error::HttpStatus {
            status: 400 | 422,
            body,
        } => Error::validation(format!("control plane rejected the connector config: {body}")),
        other => other,
    }
}

pub(super) fn connector_id_from(body: &Value, requested_name: &str) -> ConnectorId {
    ["id", "name"]
        .iter()
        .find_map(|key| {
            body.get(*key)
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
        })
        .map(ConnectorId::new)
        .unwrap_or_else(|| ConnectorId::new(requested_name))
}

