//! Connector configuration model
//!
//! A connector's configuration is a flat map from string keys to scalar
//! values. Legacy and replacement connectors share this representation;
//! only the key sets differ.

use crate::error::{Error, Result};
use crate::types::{JsonValue, MASKED_VALUE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Config Value
// ============================================================================

/// A single configuration value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Boolean flag
    Bool(bool),
    /// Numeric value (kept as the control plane sent it)
    Number(serde_json::Number),
    /// Text value
    Text(String),
}

impl ConfigValue {
    /// Borrow the value as text if it is one
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this is the control plane's masked-secret placeholder
    pub fn is_masked(&self) -> bool {
        self.as_text() == Some(MASKED_VALUE)
    }

    /// Interpret the value as a boolean (`true`/`false` text included)
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            ConfigValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            ConfigValue::Number(_) => None,
        }
    }

    /// Convert a JSON value, rejecting nested structures
    pub fn from_json(key: &str, value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Bool(b) => Ok(ConfigValue::Bool(b)),
            JsonValue::Number(n) => Ok(ConfigValue::Number(n)),
            JsonValue::String(s) => Ok(ConfigValue::Text(s)),
            JsonValue::Null => Ok(ConfigValue::Text(String::new())),
            other => Err(Error::unexpected_response(format!(
                "config key '{key}' holds a nested value: {other}"
            ))),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::Number(n) => write!(f, "{n}"),
            ConfigValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Text(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::Text(s)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<u64> for ConfigValue {
    fn from(n: u64) -> Self {
        ConfigValue::Number(n.into())
    }
}

// ============================================================================
// Connector Config
// ============================================================================

/// Full configuration of a connector, ordered by key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectorConfig {
    entries: BTreeMap<String, ConfigValue>,
}

impl ConnectorConfig {
    /// Create an empty config
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from a JSON object as returned by the control plane
    pub fn from_json(value: JsonValue) -> Result<Self> {
        let JsonValue::Object(map) = value else {
            return Err(Error::unexpected_response(
                "connector config is not a JSON object",
            ));
        };

        let mut config = Self::new();
        for (key, value) in map {
            let value = ConfigValue::from_json(&key, value)?;
            config.entries.insert(key, value);
        }
        Ok(config)
    }

    /// Get a value
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    /// Get a value rendered as text
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(ToString::to_string)
    }

    /// Whether the key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Insert only if the key is absent
    pub fn insert_default(&mut self, key: &str, value: impl Into<ConfigValue>) {
        if !self.entries.contains_key(key) {
            self.entries.insert(key.to_string(), value.into());
        }
    }

    /// Remove a value
    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.entries.remove(key)
    }

    /// Iterate over entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.entries.iter()
    }

    /// Keys in key order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the config is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys whose values are masked secrets
    pub fn masked_keys(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, v)| v.is_masked())
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Render as a JSON object
    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }

    /// Render as pretty JSON with sensitive values masked
    pub fn to_redacted_json(&self) -> String {
        let redacted: BTreeMap<&str, JsonValue> = self
            .entries
            .iter()
            .map(|(k, v)| {
                let shown = if is_sensitive_key(k) && !v.to_string().is_empty() {
                    JsonValue::String(MASKED_VALUE.to_string())
                } else {
                    serde_json::to_value(v).unwrap_or(JsonValue::Null)
                };
                (k.as_str(), shown)
            })
            .collect();
        serde_json::to_string_pretty(&redacted).unwrap_or_default()
    }
}

impl FromIterator<(String, ConfigValue)> for ConnectorConfig {
    fn from_iter<I: IntoIterator<Item = (String, ConfigValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Whether a key names a secret that must not be echoed back
pub fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key == "keyfile"
        || key.contains("password")
        || key.contains("secret")
        || key.ends_with("api.key")
        || key.ends_with("basic.auth.user.info")
}
