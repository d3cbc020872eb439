//! Per-run migration state

use crate::config::ConnectorConfig;
use crate::control_plane::{ConnectorId, ConnectorStatus, OffsetReference};
use crate::credentials::Credentials;
use crate::transform::TransformOptions;
use crate::types::ConnectorKind;

/// Everything one migration run knows
///
/// Created once per run and passed explicitly to each step.
#[derive(Debug, Clone)]
pub struct MigrationContext {
    /// Connector family being migrated
    pub kind: ConnectorKind,
    /// Environment id
    pub environment: String,
    /// Cluster id
    pub cluster_id: String,
    /// Name of the legacy connector
    pub connector_name: String,
    /// Operator credentials, once resolved
    pub credentials: Option<Credentials>,
    /// Keyfile and topic map supplied up front
    pub options: TransformOptions,
    /// Legacy connector as fetched
    pub legacy: Option<ConnectorStatus>,
    /// Legacy offsets as fetched
    pub offsets: Option<OffsetReference>,
    /// Draft config, once reviewed
    pub draft: Option<ConnectorConfig>,
}

impl MigrationContext {
    /// Start a run for the named legacy connector
    pub fn new(
        kind: ConnectorKind,
        environment: impl Into<String>,
        cluster_id: impl Into<String>,
        connector_name: impl Into<String>,
    ) -> Self {
        let connector_name = connector_name.into();
        Self {
            kind,
            environment: environment.into(),
            cluster_id: cluster_id.into(),
            options: TransformOptions::new(connector_name.clone()),
            connector_name,
            credentials: None,
            legacy: None,
            offsets: None,
            draft: None,
        }
    }

    /// Set the transform options, keeping the connector name in sync
    #[must_use]
    pub fn with_options(mut self, options: TransformOptions) -> Self {
        self.options = TransformOptions {
            connector_name: self.connector_name.clone(),
            ..options
        };
        self
    }
}

/// Result of a completed migration
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationOutcome {
    /// Identifier returned by the control plane
    pub connector_id: ConnectorId,
    /// Name of the new connector
    pub connector_name: String,
}
