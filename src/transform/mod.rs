//! Config transformer
//!
//! Pure mapping from a legacy connector config to a draft config for its
//! replacement, plus the decisions the operator still has to make. Nothing
//! here performs I/O; keyfile content and the topic-to-table map arrive
//! through [`TransformOptions`].
//!
//! Each rule writes its own keys, so the order rules run in does not matter.

mod bigquery;
mod http;
mod types;

pub use bigquery::{parse_keyfile, TopicTableMap, AUTHENTICATION_METHOD, UNSUPPORTED_SETTINGS};
pub use http::{split_api_url, COMMON_KEYS, RENAMED_KEYS};
pub use types::{
    AutoCreateTables, BreakingChange, DecisionPoint, DroppedField, IngestionMode, IntCasting,
    PartitioningType, TransformOptions, Transformation, COMMIT_INTERVAL_MAX, COMMIT_INTERVAL_MIN,
    DATE_INT_MAX, DATE_INT_MIN,
};

pub(crate) use bigquery::{KEYFILE_KEY, TOPIC_TABLE_MAP_KEY};

use crate::config::ConnectorConfig;
use crate::error::{Error, Result};
use crate::types::ConnectorKind;

/// Transform a legacy config into a draft for the replacement connector
pub fn transform(
    legacy: &ConnectorConfig,
    kind: ConnectorKind,
    options: &TransformOptions,
) -> Result<Transformation> {
    match kind {
        ConnectorKind::BigQuery => bigquery::transform(legacy, options),
        ConnectorKind::Http => http::transform(legacy, options),
    }
}

fn check_connector_class(legacy: &ConnectorConfig, kind: ConnectorKind) -> Result<()> {
    match legacy.get_string("connector.class") {
        Some(class) if class == kind.legacy_class() => Ok(()),
        Some(class) => Err(Error::unsupported_field(
            "connector.class",
            format!(
                "expected a {} connector ({}), found {class}",
                kind,
                kind.legacy_class()
            ),
        )),
        None => Err(Error::unsupported_field(
            "connector.class",
            "the legacy config does not name its connector class",
        )),
    }
}
