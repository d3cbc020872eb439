//! BigQuery Legacy sink → BigQuery Storage Write API sink

use super::types::{BreakingChange, DecisionPoint, DroppedField, TransformOptions, Transformation};
use crate::config::{ConfigValue, ConnectorConfig};
use crate::error::{Error, Result};
use crate::types::{ConnectorKind, JsonValue};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

/// Authentication method of the replacement connector
pub const AUTHENTICATION_METHOD: &str = "Google cloud service account";

/// Legacy settings the Storage Write API sink does not support
pub const UNSUPPORTED_SETTINGS: &[(&str, &str)] = &[
    (
        "allow.schema.unionization",
        "combined record schemas with existing table schemas",
    ),
    (
        "all.bq.fields.nullable",
        "made every BigQuery field nullable",
    ),
    (
        "convert.double.special.values",
        "converted +Infinity, -Infinity and NaN",
    ),
    (
        "allow.bigquery.required.field.relaxation",
        "relaxed required field constraints",
    ),
];

/// Legacy keys that are never carried over as-is
const RESERVED_KEYS: &[&str] = &["name", "connector.class", "tasks.max", "authentication.method"];

/// Template defaults of the Storage Write API sink
const TEMPLATE_DEFAULTS: &[(&str, &str)] = &[
    ("input.key.format", "BYTES"),
    ("sanitize.topics", "true"),
    ("sanitize.field.names", "false"),
    ("auto.update.schemas", "DISABLED"),
    ("topic2table.map", ""),
    ("topic2clustering.fields.map", ""),
];

pub(crate) const KEYFILE_KEY: &str = "keyfile";
pub(crate) const TOPIC_TABLE_MAP_KEY: &str = "topic2table.map";

pub(crate) fn transform(
    legacy: &ConnectorConfig,
    options: &TransformOptions,
) -> Result<Transformation> {
    let kind = ConnectorKind::BigQuery;
    super::check_connector_class(legacy, kind)?;

    let mut draft = ConnectorConfig::new();
    let mut dropped = Vec::new();

    for (key, value) in legacy.iter() {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        if let Some((_, reason)) = UNSUPPORTED_SETTINGS.iter().find(|(k, _)| k == key) {
            dropped.push(DroppedField {
                key: key.clone(),
                value: value.clone(),
                reason: *reason,
            });
            continue;
        }
        draft.insert(key.clone(), value.clone());
    }

    let target_name = kind.default_target_name(&options.connector_name);
    draft.insert("name", target_name.clone());
    draft.insert("connector.class", kind.target_class());
    draft.insert("authentication.method", AUTHENTICATION_METHOD);
    draft.insert(
        "tasks.max",
        legacy
            .get("tasks.max")
            .cloned()
            .unwrap_or_else(|| ConfigValue::from(1u64)),
    );

    for (key, value) in TEMPLATE_DEFAULTS {
        draft.insert_default(key, *value);
    }
    let sanitize = draft
        .get("sanitize.field.names")
        .and_then(ConfigValue::as_bool)
        .unwrap_or(false);
    draft.insert("sanitize.field.names.in.array", sanitize.to_string());

    let breaking_changes = breaking_changes(legacy);

    let mut decisions = vec![DecisionPoint::AcknowledgeBreakingChanges {
        changes: breaking_changes.clone(),
    }];

    let enabled: Vec<DroppedField> = dropped.iter().filter(|d| d.is_enabled()).cloned().collect();
    if !enabled.is_empty() {
        decisions.push(DecisionPoint::AcknowledgeDroppedFields { fields: enabled });
    }

    decisions.push(DecisionPoint::ConnectorName {
        default: target_name,
    });
    decisions.extend([
        DecisionPoint::IngestionMode,
        DecisionPoint::IntCasting,
        DecisionPoint::AutoCreateTables,
        DecisionPoint::DateTimeFormatter,
    ]);

    match options.topic_table_map.as_deref() {
        Some(raw) => {
            let map = TopicTableMap::parse(raw)?;
            draft.insert(TOPIC_TABLE_MAP_KEY, map.to_string());
        }
        None => decisions.push(DecisionPoint::TopicTableMap),
    }

    match options.keyfile.as_deref() {
        Some(content) => draft.insert(KEYFILE_KEY, parse_keyfile(content)?),
        None => {
            let missing = draft.get(KEYFILE_KEY).map_or(true, ConfigValue::is_masked);
            if missing {
                decisions.push(DecisionPoint::Keyfile);
            }
        }
    }

    decisions.extend(
        draft
            .masked_keys()
            .into_iter()
            .filter(|k| k != KEYFILE_KEY)
            .map(|key| DecisionPoint::Secret { key }),
    );

    debug!(
        "BigQuery draft has {} keys, {} decisions, {} dropped settings",
        draft.len(),
        decisions.len(),
        dropped.len()
    );

    Ok(Transformation {
        draft,
        decisions,
        breaking_changes,
        dropped,
    })
}

fn breaking_changes(legacy: &ConnectorConfig) -> Vec<BreakingChange> {
    let affected_keys = legacy
        .keys()
        .filter(|k| k.to_ascii_lowercase().contains("timestamp"))
        .cloned()
        .collect();

    vec![
        BreakingChange::Timestamp { affected_keys },
        BreakingChange::Date,
        BreakingChange::DateTimeFormat,
        BreakingChange::DataTypes,
        BreakingChange::Int8Int16,
    ]
}

/// Validate service-account keyfile content
///
/// The content must be a JSON object; it is returned trimmed.
pub fn parse_keyfile(content: &str) -> Result<String> {
    let trimmed = content.trim();
    match serde_json::from_str::<JsonValue>(trimmed) {
        Ok(JsonValue::Object(_)) => Ok(trimmed.to_string()),
        Ok(_) => Err(Error::validation("keyfile must be a JSON object")),
        Err(e) => Err(Error::validation(format!("keyfile is not valid JSON: {e}"))),
    }
}

// ============================================================================
// Topic to table map
// ============================================================================

/// Parsed `topic:table,topic:table` mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicTableMap {
    entries: Vec<(String, String)>,
}

/// Allowed BigQuery table names
static TABLE_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());

impl TopicTableMap {
    /// Parse and validate a mapping; an empty string is an empty map
    pub fn parse(raw: &str) -> Result<Self> {
        let mut entries = Vec::new();
        let mut seen = HashSet::new();

        for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (topic, table) = pair.split_once(':').ok_or_else(|| {
                Error::validation(format!("'{pair}' is not in topic:table form"))
            })?;
            let (topic, table) = (topic.trim(), table.trim());

            if topic.is_empty() || table.is_empty() {
                return Err(Error::validation(format!(
                    "'{pair}' needs both a topic and a table"
                )));
            }
            if !TABLE_NAME_REGEX.is_match(table) {
                return Err(Error::validation(format!(
                    "table '{table}' may only contain letters, digits and underscores"
                )));
            }
            if !seen.insert(topic.to_string()) {
                return Err(Error::validation(format!(
                    "topic '{topic}' is mapped more than once"
                )));
            }
            entries.push((topic.to_string(), table.to_string()));
        }

        Ok(Self { entries })
    }
}

impl std::fmt::Display for TopicTableMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .entries
            .iter()
            .map(|(topic, table)| format!("{topic}:{table}"))
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}
