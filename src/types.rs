//! Common types used throughout the migration tool
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Placeholder the control plane returns in place of secret values
pub const MASKED_VALUE: &str = "****************";

// ============================================================================
// Connector Kind
// ============================================================================

/// The connector families this tool can migrate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorKind {
    /// BigQuery Legacy sink → BigQuery Storage Write API sink
    BigQuery,
    /// HTTP V1 sink → HTTP V2 sink
    Http,
}

impl ConnectorKind {
    /// `connector.class` of the legacy connector
    pub fn legacy_class(self) -> &'static str {
        match self {
            ConnectorKind::BigQuery => "BigQuerySink",
            ConnectorKind::Http => "HttpSink",
        }
    }

    /// `connector.class` of the replacement connector
    pub fn target_class(self) -> &'static str {
        match self {
            ConnectorKind::BigQuery => "BigQueryStorageSink",
            ConnectorKind::Http => "HttpSinkV2",
        }
    }

    /// Suggested name for the replacement connector
    pub fn default_target_name(self, legacy_name: &str) -> String {
        match self {
            ConnectorKind::BigQuery => format!("{legacy_name}-v2"),
            ConnectorKind::Http => format!("{legacy_name}_v2"),
        }
    }
}

impl fmt::Display for ConnectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorKind::BigQuery => write!(f, "BigQuery"),
            ConnectorKind::Http => write!(f, "HTTP"),
        }
    }
}

// ============================================================================
// Connector State
// ============================================================================

/// Lifecycle state reported by the control plane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConnectorState {
    Running,
    Paused,
    Provisioning,
    Failed,
    Degraded,
    /// Any state this tool does not know about
    Other(String),
}

impl ConnectorState {
    /// Only a paused connector can be migrated without risking duplicates
    pub fn is_paused(&self) -> bool {
        matches!(self, ConnectorState::Paused)
    }
}

impl From<String> for ConnectorState {
    fn from(state: String) -> Self {
        match state.to_ascii_uppercase().as_str() {
            "RUNNING" => ConnectorState::Running,
            "PAUSED" => ConnectorState::Paused,
            "PROVISIONING" => ConnectorState::Provisioning,
            "FAILED" => ConnectorState::Failed,
            "DEGRADED" => ConnectorState::Degraded,
            _ => ConnectorState::Other(state),
        }
    }
}

impl From<ConnectorState> for String {
    fn from(state: ConnectorState) -> Self {
        state.to_string()
    }
}

impl fmt::Display for ConnectorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorState::Running => write!(f, "RUNNING"),
            ConnectorState::Paused => write!(f, "PAUSED"),
            ConnectorState::Provisioning => write!(f, "PROVISIONING"),
            ConnectorState::Failed => write!(f, "FAILED"),
            ConnectorState::Degraded => write!(f, "DEGRADED"),
            ConnectorState::Other(s) => write!(f, "{s}"),
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.trim().is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.trim().is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
