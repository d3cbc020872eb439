//! Queue-driven review of a draft connector config

use crate::config::ConnectorConfig;
use crate::error::{Error, Result};
use crate::prompt::{ask_until, parse_yes_no, select, Choice, Prompter};
use crate::transform::{
    parse_keyfile, AutoCreateTables, BreakingChange, DecisionPoint, DroppedField, IngestionMode,
    IntCasting, PartitioningType, TopicTableMap, Transformation, COMMIT_INTERVAL_MAX,
    COMMIT_INTERVAL_MIN, KEYFILE_KEY, TOPIC_TABLE_MAP_KEY,
};
use crate::types::ConnectorKind;
use std::collections::VecDeque;
use std::path::Path;
use tracing::debug;

/// Input formats that give records a key
pub const KEY_BEARING_FORMATS: &[&str] = &["AVRO", "JSON_SR", "PROTOBUF"];

const INGESTION_MODES: &[Choice<IngestionMode>] = &[
    Choice::new(IngestionMode::Streaming, "STREAMING", "Lower latency, higher cost"),
    Choice::new(
        IngestionMode::BatchLoading,
        "BATCH LOADING",
        "Higher latency, lower cost",
    ),
    Choice::new(IngestionMode::Upsert, "UPSERT", "For upsert operations"),
    Choice::new(
        IngestionMode::UpsertDelete,
        "UPSERT_DELETE",
        "For upsert and delete operations",
    ),
];

const AUTO_CREATE_OPTIONS: &[Choice<AutoCreateTables>] = &[
    Choice::new(
        AutoCreateTables::NonPartitioned,
        "NON-PARTITIONED",
        "Creates tables without partitioning",
    ),
    Choice::new(
        AutoCreateTables::PartitionByIngestionTime,
        "PARTITION by INGESTION TIME",
        "Creates tables partitioned by ingestion time",
    ),
    Choice::new(
        AutoCreateTables::PartitionByField,
        "PARTITION by FIELD",
        "Creates tables partitioned by a timestamp field",
    ),
    Choice::new(
        AutoCreateTables::Disabled,
        "DISABLED",
        "Tables must already exist",
    ),
];

const PARTITIONING_TYPES: &[Choice<PartitioningType>] = &[
    Choice::new(PartitioningType::Hour, "HOUR", "Partition by hour"),
    Choice::new(PartitioningType::Day, "DAY", "Partition by day"),
    Choice::new(PartitioningType::Month, "MONTH", "Partition by month"),
    Choice::new(PartitioningType::Year, "YEAR", "Partition by year"),
];

/// Name and config accepted by the operator
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewedConnector {
    /// Name of the connector to create
    pub name: String,
    /// Final config
    pub config: ConnectorConfig,
}

/// Works through the decisions of a [`Transformation`] one at a time
///
/// Follow-up decisions are pushed to the front of the queue so they are
/// asked right after the choice that caused them.
#[derive(Debug)]
pub struct ReviewFlow {
    kind: ConnectorKind,
    legacy_name: String,
    target_name: String,
    draft: ConnectorConfig,
    queue: VecDeque<DecisionPoint>,
}

impl ReviewFlow {
    /// Start a review of `transformation` for the legacy connector `legacy_name`
    pub fn new(
        kind: ConnectorKind,
        legacy_name: impl Into<String>,
        transformation: Transformation,
    ) -> Self {
        let legacy_name = legacy_name.into();
        let target_name = transformation
            .draft
            .get_string("name")
            .unwrap_or_else(|| kind.default_target_name(&legacy_name));

        Self {
            kind,
            legacy_name,
            target_name,
            draft: transformation.draft,
            queue: transformation.decisions.into(),
        }
    }

    /// Decisions still waiting, in order
    pub fn pending(&self) -> impl Iterator<Item = &DecisionPoint> {
        self.queue.iter()
    }

    /// Draft as it stands
    pub fn draft(&self) -> &ConnectorConfig {
        &self.draft
    }

    /// Resolve the next decision; returns `false` once the queue is empty
    pub fn step(&mut self, prompter: &mut dyn Prompter) -> Result<bool> {
        let Some(decision) = self.queue.pop_front() else {
            return Ok(false);
        };

        debug!("Resolving decision: {decision}");
        if let Err(e) = self.resolve(decision.clone(), prompter) {
            self.queue.push_front(decision);
            return Err(e);
        }
        Ok(true)
    }

    /// Resolve every decision, validate, show the draft and ask for confirmation
    pub fn run(mut self, prompter: &mut dyn Prompter) -> Result<ReviewedConnector> {
        while self.step(prompter)? {}

        self.validate()?;

        prompter.say("");
        prompter.say(&format!("Final {} connector configuration:", self.kind));
        prompter.say(&self.draft.to_redacted_json());

        let proceed = prompter.confirm(&format!(
            "Please review the above configuration. Create connector '{}'?",
            self.target_name
        ))?;
        if !proceed {
            return Err(Error::cancelled("connector creation declined at final review"));
        }

        Ok(ReviewedConnector {
            name: self.target_name,
            config: self.draft,
        })
    }

    /// Check the draft is complete and consistent
    pub fn validate(&self) -> Result<()> {
        let mode = self
            .draft
            .get_string("ingestion.mode")
            .and_then(|m| IngestionMode::parse(&m));

        if let Some(mode) = mode.filter(|m| m.requires_key_fields()) {
            let key_format = self
                .draft
                .get_string("input.key.format")
                .unwrap_or_default()
                .to_ascii_uppercase();
            if !KEY_BEARING_FORMATS.contains(&key_format.as_str()) {
                return Err(Error::validation(format!(
                    "{} ingestion requires key fields, but input.key.format is '{}' \
                     (expected one of {})",
                    mode.as_str(),
                    key_format,
                    KEY_BEARING_FORMATS.join(", ")
                )));
            }
        }

        let masked = self.draft.masked_keys();
        if !masked.is_empty() {
            return Err(Error::validation(format!(
                "masked values were not replaced: {}",
                masked.join(", ")
            )));
        }

        for key in required_keys(self.kind) {
            let present = self
                .draft
                .get_string(key)
                .is_some_and(|v| !v.trim().is_empty());
            if !present {
                return Err(Error::validation(format!("required field '{key}' is missing")));
            }
        }

        Ok(())
    }

    fn resolve(&mut self, decision: DecisionPoint, prompter: &mut dyn Prompter) -> Result<()> {
        match decision {
            DecisionPoint::AcknowledgeBreakingChanges { changes } => {
                acknowledge_breaking_changes(&changes, prompter)
            }
            DecisionPoint::AcknowledgeDroppedFields { fields } => {
                acknowledge_dropped_fields(&fields, prompter)
            }
            DecisionPoint::ConnectorName { default } => {
                let legacy = self.legacy_name.clone();
                let name = ask_until(
                    prompter,
                    &format!("Enter new connector name (default: {default})"),
                    |answer| {
                        let name = if answer.is_empty() { default.as_str() } else { answer };
                        if name == legacy {
                            return Err(
                                "New connector name must differ from the legacy connector name"
                                    .to_string(),
                            );
                        }
                        Ok(name.to_string())
                    },
                )?;
                self.draft.insert("name", name.clone());
                self.target_name = name;
                Ok(())
            }
            DecisionPoint::IngestionMode => {
                let mode = select(
                    prompter,
                    "📊 Ingestion mode",
                    INGESTION_MODES,
                    Some(0),
                )?;
                self.draft.insert("ingestion.mode", mode.as_str());
                match mode {
                    IngestionMode::BatchLoading => {
                        self.queue.push_front(DecisionPoint::CommitInterval);
                    }
                    IngestionMode::Upsert | IngestionMode::UpsertDelete => {
                        prompter.say(&format!(
                            "DISCLAIMER: For {} mode, the records must have key fields.",
                            mode.as_str()
                        ));
                    }
                    IngestionMode::Streaming => {}
                }
                Ok(())
            }
            DecisionPoint::IntCasting => {
                prompter.say("🔢 INT8 and INT16 fields are cast to FLOAT in BigQuery by default.");
                let integer = ask_yes_no(
                    prompter,
                    "Cast INT8 and INT16 fields to INTEGER instead of FLOAT? (yes/no, default is no)",
                    false,
                )?;
                let casting = if integer {
                    IntCasting::Integer
                } else {
                    IntCasting::Float
                };
                self.draft.insert(
                    "use.integer.for.int8.int16",
                    casting.use_integer().to_string(),
                );
                Ok(())
            }
            DecisionPoint::CommitInterval => {
                prompter.say(
                    "⚠️  Every commit calls the CreateWriteStream API, which is subject to quota limits.",
                );
                let interval = ask_until(
                    prompter,
                    &format!(
                        "Enter commit interval in seconds ({COMMIT_INTERVAL_MIN}-{COMMIT_INTERVAL_MAX}, default is {COMMIT_INTERVAL_MIN})"
                    ),
                    parse_commit_interval,
                )?;
                self.draft.insert("commit.interval", interval.to_string());
                Ok(())
            }
            DecisionPoint::AutoCreateTables => {
                let strategy = select(
                    prompter,
                    "🗂  Auto create tables",
                    AUTO_CREATE_OPTIONS,
                    Some(3),
                )?;
                self.draft.insert("auto.create.tables", strategy.as_str());
                if strategy == AutoCreateTables::PartitionByField {
                    self.queue.push_front(DecisionPoint::TimestampPartitionField);
                }
                if strategy.is_partitioned() {
                    self.queue.push_front(DecisionPoint::PartitioningType);
                }
                Ok(())
            }
            DecisionPoint::PartitioningType => {
                let granularity = select(
                    prompter,
                    "⏰ Partitioning type",
                    PARTITIONING_TYPES,
                    Some(1),
                )?;
                self.draft.insert("partitioning.type", granularity.as_str());
                Ok(())
            }
            DecisionPoint::TimestampPartitionField => {
                let field = ask_until(
                    prompter,
                    "Enter the timestamp field name for partitioning",
                    |answer| {
                        if answer.is_empty() {
                            Err("Field name cannot be empty".to_string())
                        } else {
                            Ok(answer.to_string())
                        }
                    },
                )?;
                self.draft.insert("timestamp.partition.field.name", field);
                Ok(())
            }
            DecisionPoint::DateTimeFormatter => {
                prompter.say(
                    "📅 DateTimeFormatter supports more timestamp formats than SimpleDateFormat; \
                     output may differ between the two.",
                );
                let enabled = ask_yes_no(
                    prompter,
                    "Use DateTimeFormatter? (yes/no, default is no)",
                    false,
                )?;
                self.draft
                    .insert("use.date.time.formatter", enabled.to_string());
                Ok(())
            }
            DecisionPoint::TopicTableMap => {
                let current = self
                    .draft
                    .get_string(TOPIC_TABLE_MAP_KEY)
                    .unwrap_or_default();
                let map = ask_until(
                    prompter,
                    &format!("Enter topic to table map as topic:table,... (default: '{current}')"),
                    |answer| {
                        if answer.is_empty() {
                            return Ok(None);
                        }
                        TopicTableMap::parse(answer)
                            .map(Some)
                            .map_err(|e| e.to_string())
                    },
                )?;
                if let Some(map) = map {
                    self.draft.insert(TOPIC_TABLE_MAP_KEY, map.to_string());
                } else {
                    self.draft.insert_default(TOPIC_TABLE_MAP_KEY, "");
                }
                Ok(())
            }
            DecisionPoint::Keyfile => {
                prompter.say("🔑 Provide the GCP service account keyfile as a file path or pasted JSON.");
                let keyfile = loop {
                    let mut answer = prompter.input("Keyfile path or JSON")?;
                    if answer.starts_with('{') {
                        answer = read_pasted_json(prompter, answer)?;
                    }
                    match read_keyfile_answer(&answer) {
                        Ok(keyfile) => break keyfile,
                        Err(reason) => prompter.say(&format!("❌ {reason}. Please try again.")),
                    }
                };
                self.draft.insert(KEYFILE_KEY, keyfile);
                Ok(())
            }
            DecisionPoint::Secret { key } => {
                let value = loop {
                    let answer = prompter.password(&format!("Please enter the value for {key}"))?;
                    if !answer.trim().is_empty() {
                        break answer;
                    }
                    prompter.say("❌ Input cannot be empty. Please try again.");
                };
                self.draft.insert(key, value);
                Ok(())
            }
            DecisionPoint::UnmappedField { key, value } => {
                prompter.say(&format!(
                    "Field '{key}' has no {} equivalent.",
                    self.kind.target_class()
                ));
                let draft = &self.draft;
                let target = ask_until(
                    prompter,
                    &format!("Key to store '{key}' under (empty to drop it)"),
                    |answer| {
                        if answer.is_empty() {
                            Ok(None)
                        } else if answer.chars().any(char::is_whitespace) {
                            Err("Keys cannot contain whitespace".to_string())
                        } else if draft.contains_key(answer) {
                            Err(format!("'{answer}' is already set"))
                        } else {
                            Ok(Some(answer.to_string()))
                        }
                    },
                )?;
                match target {
                    Some(target) => {
                        if value.is_masked() {
                            self.queue.push_front(DecisionPoint::Secret {
                                key: target.clone(),
                            });
                        }
                        self.draft.insert(target, value);
                    }
                    None => debug!("Dropping unmapped field '{key}'"),
                }
                Ok(())
            }
        }
    }
}

fn required_keys(kind: ConnectorKind) -> &'static [&'static str] {
    match kind {
        ConnectorKind::BigQuery => &[
            "name",
            "connector.class",
            "authentication.method",
            "keyfile",
            "topics",
        ],
        ConnectorKind::Http => &[
            "name",
            "connector.class",
            "http.api.base.url",
            "api1.http.api.path",
        ],
    }
}

fn acknowledge_breaking_changes(
    changes: &[BreakingChange],
    prompter: &mut dyn Prompter,
) -> Result<()> {
    prompter.say("⚠️  IMPORTANT: BREAKING API CHANGES");
    for change in changes {
        prompter.say(&format!("• {change}"));
    }
    if prompter.confirm("Do you understand these breaking changes and want to proceed?")? {
        Ok(())
    } else {
        Err(Error::cancelled("breaking changes not acknowledged"))
    }
}

fn acknowledge_dropped_fields(fields: &[DroppedField], prompter: &mut dyn Prompter) -> Result<()> {
    prompter.say("⚠️  UNSUPPORTED CONFIGURATIONS DETECTED");
    for field in fields {
        prompter.say(&format!("• {} ({}): {}", field.key, field.value, field.reason));
    }
    if prompter.confirm("Do you understand that these configurations will not be migrated?")? {
        Ok(())
    } else {
        Err(Error::cancelled("unsupported settings not acknowledged"))
    }
}

fn ask_yes_no(prompter: &mut dyn Prompter, prompt: &str, default: bool) -> Result<bool> {
    ask_until(prompter, prompt, |answer| {
        if answer.is_empty() {
            return Ok(default);
        }
        parse_yes_no(answer).ok_or_else(|| "Answer yes or no".to_string())
    })
}

/// Parse a commit interval answer; empty selects the minimum
pub fn parse_commit_interval(answer: &str) -> std::result::Result<u32, String> {
    if answer.is_empty() {
        return Ok(COMMIT_INTERVAL_MIN);
    }
    let interval: u32 = answer
        .parse()
        .map_err(|_| format!("'{answer}' is not a whole number of seconds"))?;
    if (COMMIT_INTERVAL_MIN..=COMMIT_INTERVAL_MAX).contains(&interval) {
        Ok(interval)
    } else {
        Err(format!(
            "Commit interval must be between {COMMIT_INTERVAL_MIN} and {COMMIT_INTERVAL_MAX} seconds"
        ))
    }
}

/// Collect a JSON document pasted over several lines
///
/// A first line that is already complete JSON is taken as is; otherwise lines
/// are read until an empty one.
fn read_pasted_json(prompter: &mut dyn Prompter, first: String) -> Result<String> {
    if serde_json::from_str::<serde_json::Value>(&first).is_ok() {
        return Ok(first);
    }

    prompter.say("Paste the rest of the keyfile and finish with an empty line.");
    let mut lines = vec![first];
    loop {
        let line = prompter.input("")?;
        if line.is_empty() {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

fn read_keyfile_answer(answer: &str) -> std::result::Result<String, String> {
    if answer.is_empty() {
        return Err("A keyfile is required".to_string());
    }
    if answer.starts_with('{') {
        return parse_keyfile(answer).map_err(|e| e.to_string());
    }

    let path = Path::new(answer);
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read '{}': {e}", path.display()))?;
    parse_keyfile(&content).map_err(|e| e.to_string())
}

