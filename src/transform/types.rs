//! Transformation result and decision types

use crate::config::{ConfigValue, ConnectorConfig};
use std::fmt;

/// Lowest INT value accepted for DATE fields (0001-01-01)
pub const DATE_INT_MIN: i64 = -719_162;

/// Highest INT value accepted for DATE fields (9999-12-31)
pub const DATE_INT_MAX: i64 = 2_932_896;

/// Smallest accepted commit interval in seconds
pub const COMMIT_INTERVAL_MIN: u32 = 60;

/// Largest accepted commit interval in seconds
pub const COMMIT_INTERVAL_MAX: u32 = 14_400;

// ============================================================================
// Options
// ============================================================================

/// Inputs to the transformation besides the legacy config
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// Name of the legacy connector
    pub connector_name: String,
    /// Topic-to-table map given on the command line (`topic:table,...`)
    pub topic_table_map: Option<String>,
    /// Service-account keyfile content supplied up front
    pub keyfile: Option<String>,
}

impl TransformOptions {
    /// Options for the named legacy connector
    pub fn new(connector_name: impl Into<String>) -> Self {
        Self {
            connector_name: connector_name.into(),
            ..Self::default()
        }
    }

    /// Set the topic-to-table map
    #[must_use]
    pub fn with_topic_table_map(mut self, map: impl Into<String>) -> Self {
        self.topic_table_map = Some(map.into());
        self
    }

    /// Set the keyfile content
    #[must_use]
    pub fn with_keyfile(mut self, keyfile: impl Into<String>) -> Self {
        self.keyfile = Some(keyfile.into());
        self
    }
}

// ============================================================================
// Enumerated choices
// ============================================================================

/// BigQuery write strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngestionMode {
    #[default]
    Streaming,
    BatchLoading,
    Upsert,
    UpsertDelete,
}

impl IngestionMode {
    /// Config value of this mode
    pub fn as_str(self) -> &'static str {
        match self {
            IngestionMode::Streaming => "STREAMING",
            IngestionMode::BatchLoading => "BATCH LOADING",
            IngestionMode::Upsert => "UPSERT",
            IngestionMode::UpsertDelete => "UPSERT_DELETE",
        }
    }

    /// Parse a config value
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "STREAMING" => Some(IngestionMode::Streaming),
            "BATCH LOADING" => Some(IngestionMode::BatchLoading),
            "UPSERT" => Some(IngestionMode::Upsert),
            "UPSERT_DELETE" => Some(IngestionMode::UpsertDelete),
            _ => None,
        }
    }

    /// Whether records must carry key fields
    pub fn requires_key_fields(self) -> bool {
        matches!(self, IngestionMode::Upsert | IngestionMode::UpsertDelete)
    }
}

/// Target type for INT8 and INT16 columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntCasting {
    #[default]
    Float,
    Integer,
}

impl IntCasting {
    /// Value of `use.integer.for.int8.int16`
    pub fn use_integer(self) -> bool {
        matches!(self, IntCasting::Integer)
    }
}

/// Table auto-creation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoCreateTables {
    NonPartitioned,
    PartitionByIngestionTime,
    PartitionByField,
    #[default]
    Disabled,
}

impl AutoCreateTables {
    /// Config value of this strategy
    pub fn as_str(self) -> &'static str {
        match self {
            AutoCreateTables::NonPartitioned => "NON-PARTITIONED",
            AutoCreateTables::PartitionByIngestionTime => "PARTITION by INGESTION TIME",
            AutoCreateTables::PartitionByField => "PARTITION by FIELD",
            AutoCreateTables::Disabled => "DISABLED",
        }
    }

    /// Whether created tables are time-partitioned
    pub fn is_partitioned(self) -> bool {
        matches!(
            self,
            AutoCreateTables::PartitionByIngestionTime | AutoCreateTables::PartitionByField
        )
    }
}

/// Time partitioning granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartitioningType {
    Hour,
    #[default]
    Day,
    Month,
    Year,
}

impl PartitioningType {
    /// Config value of this granularity
    pub fn as_str(self) -> &'static str {
        match self {
            PartitioningType::Hour => "HOUR",
            PartitioningType::Day => "DAY",
            PartitioningType::Month => "MONTH",
            PartitioningType::Year => "YEAR",
        }
    }
}

// ============================================================================
// Breaking changes and dropped fields
// ============================================================================

/// Behavioural difference between the legacy and replacement BigQuery sinks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreakingChange {
    /// TIMESTAMP values are read as microseconds instead of seconds
    Timestamp {
        /// Legacy keys that name a timestamp field
        affected_keys: Vec<String>,
    },
    /// DATE fields accept INT values in a wider range
    Date,
    /// Only a subset of the canonical date-time format is accepted
    DateTimeFormat,
    /// Data type support differs from the legacy InsertAll API
    DataTypes,
    /// INT8 and INT16 are cast to FLOAT by default
    Int8Int16,
}

impl BreakingChange {
    /// Short tag shown in the review
    pub fn tag(&self) -> &'static str {
        match self {
            BreakingChange::Timestamp { .. } => "TIMESTAMP",
            BreakingChange::Date => "DATE",
            BreakingChange::DateTimeFormat => "DATETIME_FORMAT",
            BreakingChange::DataTypes => "DATA_TYPES",
            BreakingChange::Int8Int16 => "INT8, INT16",
        }
    }

    /// Operator-facing description
    pub fn description(&self) -> String {
        match self {
            BreakingChange::Timestamp { affected_keys } => {
                let mut text = "TIMESTAMP values are now interpreted as microseconds since epoch \
                                instead of seconds; data may land in the wrong time period"
                    .to_string();
                if !affected_keys.is_empty() {
                    text.push_str(&format!(" (check: {})", affected_keys.join(", ")));
                }
                text
            }
            BreakingChange::Date => format!(
                "DATE fields now accept INT values in the range {DATE_INT_MIN} to {DATE_INT_MAX}"
            ),
            BreakingChange::DateTimeFormat => "DATE, TIME, DATETIME and TIMESTAMP fields accept \
                 only a subset of the canonical date-time format; values outside it need the \
                 date-time formatter override"
                .to_string(),
            BreakingChange::DataTypes => "The Storage Write API supports a different set of data \
                 types than the legacy InsertAll API"
                .to_string(),
            BreakingChange::Int8Int16 => "INT8 and INT16 fields are cast to FLOAT unless INTEGER \
                 casting is selected"
                .to_string(),
        }
    }
}

impl fmt::Display for BreakingChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.tag(), self.description())
    }
}

/// Legacy key with no counterpart in the replacement connector
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedField {
    /// Legacy key
    pub key: String,
    /// Legacy value
    pub value: ConfigValue,
    /// What the setting did
    pub reason: &'static str,
}

impl DroppedField {
    /// Whether the legacy connector had the feature switched on
    pub fn is_enabled(&self) -> bool {
        self.value.as_bool() == Some(true)
    }
}

// ============================================================================
// Decisions
// ============================================================================

/// A value the transformer cannot settle on its own
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionPoint {
    /// Name of the replacement connector
    ConnectorName { default: String },
    /// Operator must accept the breaking changes
    AcknowledgeBreakingChanges { changes: Vec<BreakingChange> },
    /// Operator must accept that enabled settings are dropped
    AcknowledgeDroppedFields { fields: Vec<DroppedField> },
    /// `ingestion.mode`
    IngestionMode,
    /// `use.integer.for.int8.int16`
    IntCasting,
    /// `commit.interval` (BATCH LOADING only)
    CommitInterval,
    /// `auto.create.tables`
    AutoCreateTables,
    /// `partitioning.type`
    PartitioningType,
    /// `timestamp.partition.field.name`
    TimestampPartitionField,
    /// `use.date.time.formatter`
    DateTimeFormatter,
    /// `topic2table.map`
    TopicTableMap,
    /// GCP service-account keyfile
    Keyfile,
    /// Masked secret that must be re-entered
    Secret { key: String },
    /// Legacy key with no known counterpart
    UnmappedField { key: String, value: ConfigValue },
}

impl DecisionPoint {
    /// The value applied when the operator gives no input, if one is documented
    pub fn documented_default(&self) -> Option<String> {
        match self {
            DecisionPoint::ConnectorName { default } => Some(default.clone()),
            DecisionPoint::IngestionMode => Some(IngestionMode::default().as_str().to_string()),
            DecisionPoint::IntCasting => Some(IntCasting::default().use_integer().to_string()),
            DecisionPoint::CommitInterval => Some(COMMIT_INTERVAL_MIN.to_string()),
            DecisionPoint::AutoCreateTables => {
                Some(AutoCreateTables::default().as_str().to_string())
            }
            DecisionPoint::PartitioningType => {
                Some(PartitioningType::default().as_str().to_string())
            }
            DecisionPoint::DateTimeFormatter => Some("false".to_string()),
            DecisionPoint::TopicTableMap => Some(String::new()),
            DecisionPoint::AcknowledgeBreakingChanges { .. }
            | DecisionPoint::AcknowledgeDroppedFields { .. }
            | DecisionPoint::TimestampPartitionField
            | DecisionPoint::Keyfile
            | DecisionPoint::Secret { .. }
            | DecisionPoint::UnmappedField { .. } => None,
        }
    }

    /// Whether this only asks the operator to accept something
    pub fn is_acknowledgement(&self) -> bool {
        matches!(
            self,
            DecisionPoint::AcknowledgeBreakingChanges { .. }
                | DecisionPoint::AcknowledgeDroppedFields { .. }
        )
    }
}

impl fmt::Display for DecisionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionPoint::ConnectorName { .. } => write!(f, "connector name"),
            DecisionPoint::AcknowledgeBreakingChanges { .. } => write!(f, "breaking changes"),
            DecisionPoint::AcknowledgeDroppedFields { .. } => write!(f, "unsupported settings"),
            DecisionPoint::IngestionMode => write!(f, "ingestion mode"),
            DecisionPoint::IntCasting => write!(f, "INT8/INT16 casting"),
            DecisionPoint::CommitInterval => write!(f, "commit interval"),
            DecisionPoint::AutoCreateTables => write!(f, "auto create tables"),
            DecisionPoint::PartitioningType => write!(f, "partitioning type"),
            DecisionPoint::TimestampPartitionField => write!(f, "timestamp partition field"),
            DecisionPoint::DateTimeFormatter => write!(f, "date time formatter"),
            DecisionPoint::TopicTableMap => write!(f, "topic to table map"),
            DecisionPoint::Keyfile => write!(f, "GCP keyfile"),
            DecisionPoint::Secret { key } => write!(f, "secret '{key}'"),
            DecisionPoint::UnmappedField { key, .. } => write!(f, "unmapped field '{key}'"),
        }
    }
}

// ============================================================================
// Result
// ============================================================================

/// Draft replacement config plus everything still to settle
#[derive(Debug, Clone, PartialEq)]
pub struct Transformation {
    /// Draft config for the replacement connector
    pub draft: ConnectorConfig,
    /// Decisions in the order they should be asked
    pub decisions: Vec<DecisionPoint>,
    /// Breaking changes the operator should know about
    pub breaking_changes: Vec<BreakingChange>,
    /// Legacy settings that were dropped
    pub dropped: Vec<DroppedField>,
}
