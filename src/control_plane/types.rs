//! Control-plane request and response types

use crate::config::ConnectorConfig;
use crate::types::{ConnectorState, JsonValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state and configuration of an existing connector
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorStatus {
    /// Current lifecycle state
    pub state: ConnectorState,
    /// Full configuration as returned by the control plane
    pub config: ConnectorConfig,
}

/// Committed offsets of the legacy connector
///
/// Opaque: read once and handed back unmodified when the replacement is
/// created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OffsetReference(JsonValue);

impl OffsetReference {
    /// Wrap a raw offsets value
    pub fn new(value: JsonValue) -> Self {
        Self(value)
    }

    /// Borrow the raw value
    pub fn as_json(&self) -> &JsonValue {
        &self.0
    }

    /// Number of partition entries when the offsets are a list
    pub fn partition_count(&self) -> Option<usize> {
        self.0.as_array().map(Vec::len)
    }
}

/// Identifier of a newly created connector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorId(String);

impl ConnectorId {
    /// Wrap an identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Wire bodies
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct StatusResponse {
    pub connector: StatusBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusBody {
    pub state: ConnectorState,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConfigResponse {
    pub config: JsonValue,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OffsetsResponse {
    #[serde(default)]
    pub offsets: JsonValue,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateConnectorRequest<'a> {
    pub name: &'a str,
    pub config: &'a ConnectorConfig,
    pub offsets: &'a OffsetReference,
}
