//! Tests for the review flow

use super::*;
use crate::config::ConnectorConfig;
use crate::prompt::ScriptedPrompter;
use crate::transform::{transform, DecisionPoint, TransformOptions, Transformation};
use crate::types::{ConnectorKind, MASKED_VALUE};
use pretty_assertions::assert_eq as pretty_assert_eq;
use serde_json::json;
use std::io::Write;
use test_case::test_case;

const KEYFILE: &str = r#"{"type": "service_account", "project_id": "analytics"}"#;

fn bigquery_legacy() -> ConnectorConfig {
    ConnectorConfig::from_json(json!({
        "name": "orders-bq",
        "connector.class": "BigQuerySink",
        "topics": "orders",
        "project": "analytics",
        "datasets": "raw",
        "kafka.api.key": "KEY",
        "kafka.api.secret": MASKED_VALUE,
        "keyfile": MASKED_VALUE
    }))
    .unwrap()
}

/// BigQuery transformation with keyfile and topic map supplied up front
fn bigquery(legacy: &ConnectorConfig) -> Transformation {
    let options = TransformOptions::new("orders-bq")
        .with_keyfile(KEYFILE)
        .with_topic_table_map("orders:orders");
    transform(legacy, ConnectorKind::BigQuery, &options).unwrap()
}

fn bigquery_flow() -> ReviewFlow {
    ReviewFlow::new(ConnectorKind::BigQuery, "orders-bq", bigquery(&bigquery_legacy()))
}

fn http_flow(extra: serde_json::Value) -> ReviewFlow {
    let mut legacy = json!({
        "name": "my-http-v1-sink",
        "connector.class": "HttpSink",
        "topics": "events",
        "http.api.url": "https://api.example.com/v1/events",
        "kafka.api.key": "KEY",
        "kafka.api.secret": MASKED_VALUE
    });
    if let (Some(base), Some(extra)) = (legacy.as_object_mut(), extra.as_object()) {
        base.extend(extra.clone());
    }
    let legacy = ConnectorConfig::from_json(legacy).unwrap();
    let transformation = transform(
        &legacy,
        ConnectorKind::Http,
        &TransformOptions::new("my-http-v1-sink"),
    )
    .unwrap();
    ReviewFlow::new(ConnectorKind::Http, "my-http-v1-sink", transformation)
}

fn value(reviewed: &ReviewedConnector, key: &str) -> Option<String> {
    reviewed.config.get_string(key)
}

#[test]
fn test_all_defaults_round_trip() {
    // ack, name, mode, casting, auto-create, formatter, secret, confirm
    let mut prompter = ScriptedPrompter::new(["yes", "", "", "", "", "", "s3cret", "yes"]);

    let reviewed = bigquery_flow().run(&mut prompter).unwrap();

    pretty_assert_eq!(reviewed.name, "orders-bq-v2");
    pretty_assert_eq!(value(&reviewed, "name").as_deref(), Some("orders-bq-v2"));
    pretty_assert_eq!(
        value(&reviewed, "ingestion.mode").as_deref(),
        Some("STREAMING")
    );
    pretty_assert_eq!(
        value(&reviewed, "use.integer.for.int8.int16").as_deref(),
        Some("false")
    );
    pretty_assert_eq!(
        value(&reviewed, "auto.create.tables").as_deref(),
        Some("DISABLED")
    );
    pretty_assert_eq!(
        value(&reviewed, "use.date.time.formatter").as_deref(),
        Some("false")
    );
    pretty_assert_eq!(
        value(&reviewed, "kafka.api.secret").as_deref(),
        Some("s3cret")
    );
    assert!(!reviewed.config.contains_key("commit.interval"));
    assert!(!reviewed.config.contains_key("partitioning.type"));
    pretty_assert_eq!(prompter.remaining(), 0);
}

#[test]
fn test_commit_interval_rejected_until_in_range() {
    let mut prompter = ScriptedPrompter::new([
        "yes", "", "2", "30", "20000", "abc", "120", "", "", "", "s3cret", "yes",
    ]);

    let reviewed = bigquery_flow().run(&mut prompter).unwrap();

    pretty_assert_eq!(
        value(&reviewed, "ingestion.mode").as_deref(),
        Some("BATCH LOADING")
    );
    pretty_assert_eq!(value(&reviewed, "commit.interval").as_deref(), Some("120"));
    pretty_assert_eq!(prompter.count_shown("? Enter commit interval"), 4);
    pretty_assert_eq!(prompter.count_shown("Commit interval must be between 60 and 14400"), 2);
}

#[test]
fn test_invalid_commit_interval_does_not_advance() {
    let mut prompter = ScriptedPrompter::new(["yes", "", "BATCH LOADING", "59"]);
    let mut flow = bigquery_flow();

    for _ in 0..3 {
        assert!(flow.step(&mut prompter).unwrap());
    }
    pretty_assert_eq!(flow.pending().next(), Some(&DecisionPoint::CommitInterval));

    // The rejected answer leaves the script exhausted on the same question
    let err = flow.step(&mut prompter).unwrap_err();
    assert!(matches!(err, crate::Error::Prompt { .. }));
    assert!(!flow.draft().contains_key("commit.interval"));
    pretty_assert_eq!(flow.pending().next(), Some(&DecisionPoint::CommitInterval));
}

#[test_case("" => Ok(60) ; "empty is default")]
#[test_case("60" => Ok(60) ; "lower bound")]
#[test_case("14400" => Ok(14400) ; "upper bound")]
#[test_case("59" => matches Err(_) ; "below range")]
#[test_case("14401" => matches Err(_) ; "above range")]
#[test_case("-5" => matches Err(_) ; "negative")]
#[test_case("1.5" => matches Err(_) ; "fraction")]
fn test_parse_commit_interval(answer: &str) -> Result<u32, String> {
    parse_commit_interval(answer)
}

#[test_case("3" ; "upsert")]
#[test_case("4" ; "upsert delete")]
fn test_upsert_without_key_fields_fails_validation(mode: &str) {
    let mut prompter = ScriptedPrompter::new(["yes", "", mode, "", "", "", "s3cret", "yes"]);

    let err = bigquery_flow().run(&mut prompter).unwrap_err();

    assert!(matches!(err, crate::Error::Validation { .. }));
    assert!(err.to_string().contains("input.key.format"));
    assert!(prompter.was_shown("DISCLAIMER"));
    // Never reaches the final confirmation
    pretty_assert_eq!(prompter.remaining(), 1);
}

#[test]
fn test_upsert_with_key_format_passes() {
    let mut legacy = bigquery_legacy();
    legacy.insert("input.key.format", "AVRO");
    let flow = ReviewFlow::new(ConnectorKind::BigQuery, "orders-bq", bigquery(&legacy));
    let mut prompter = ScriptedPrompter::new(["yes", "", "UPSERT", "", "", "", "s3cret", "yes"]);

    let reviewed = flow.run(&mut prompter).unwrap();
    pretty_assert_eq!(value(&reviewed, "ingestion.mode").as_deref(), Some("UPSERT"));
}

#[test]
fn test_partition_by_field_follow_ups() {
    let mut prompter = ScriptedPrompter::new([
        "yes", "", "", "yes", "3", "HOUR", "", "event_ts", "yes", "s3cret", "yes",
    ]);

    let reviewed = bigquery_flow().run(&mut prompter).unwrap();

    pretty_assert_eq!(
        value(&reviewed, "use.integer.for.int8.int16").as_deref(),
        Some("true")
    );
    pretty_assert_eq!(
        value(&reviewed, "auto.create.tables").as_deref(),
        Some("PARTITION by FIELD")
    );
    pretty_assert_eq!(value(&reviewed, "partitioning.type").as_deref(), Some("HOUR"));
    pretty_assert_eq!(
        value(&reviewed, "timestamp.partition.field.name").as_deref(),
        Some("event_ts")
    );
    pretty_assert_eq!(
        value(&reviewed, "use.date.time.formatter").as_deref(),
        Some("true")
    );
    assert!(prompter.was_shown("Field name cannot be empty"));
}

#[test]
fn test_partition_by_ingestion_time_defaults_to_day() {
    let mut prompter =
        ScriptedPrompter::new(["yes", "", "", "", "2", "", "", "s3cret", "yes"]);

    let reviewed = bigquery_flow().run(&mut prompter).unwrap();

    pretty_assert_eq!(value(&reviewed, "partitioning.type").as_deref(), Some("DAY"));
    assert!(!reviewed
        .config
        .contains_key("timestamp.partition.field.name"));
}

#[test]
fn test_invalid_menu_choice_is_not_coerced() {
    let mut prompter = ScriptedPrompter::new([
        "yes", "", "9", "FAST", "1", "maybe", "", "", "", "s3cret", "yes",
    ]);

    let reviewed = bigquery_flow().run(&mut prompter).unwrap();

    pretty_assert_eq!(
        value(&reviewed, "ingestion.mode").as_deref(),
        Some("STREAMING")
    );
    pretty_assert_eq!(prompter.count_shown("Please try again"), 3);
}

#[test]
fn test_new_name_must_differ_from_legacy() {
    let mut prompter = ScriptedPrompter::new([
        "yes", "orders-bq", "orders-bq-next", "", "", "", "", "s3cret", "yes",
    ]);

    let reviewed = bigquery_flow().run(&mut prompter).unwrap();

    pretty_assert_eq!(reviewed.name, "orders-bq-next");
    assert!(prompter.was_shown("must differ from the legacy connector name"));
}

#[test]
fn test_declining_breaking_changes_cancels() {
    let mut prompter = ScriptedPrompter::new(["no"]);
    let err = bigquery_flow().run(&mut prompter).unwrap_err();
    assert!(err.is_cancelled());
    assert!(prompter.was_shown("TIMESTAMP"));
}

#[test]
fn test_declining_dropped_settings_cancels() {
    let mut legacy = bigquery_legacy();
    legacy.insert("all.bq.fields.nullable", true);
    let flow = ReviewFlow::new(ConnectorKind::BigQuery, "orders-bq", bigquery(&legacy));

    let mut prompter = ScriptedPrompter::new(["yes", "no"]);
    let err = flow.run(&mut prompter).unwrap_err();

    assert!(err.is_cancelled());
    assert!(prompter.was_shown("all.bq.fields.nullable"));
}

#[test]
fn test_declining_final_review_cancels() {
    let mut prompter = ScriptedPrompter::new(["yes", "", "", "", "", "", "s3cret", "no"]);
    let err = bigquery_flow().run(&mut prompter).unwrap_err();
    assert!(err.is_cancelled());
}

#[test]
fn test_final_display_masks_secrets() {
    let mut prompter = ScriptedPrompter::new(["yes", "", "", "", "", "", "s3cret", "yes"]);
    bigquery_flow().run(&mut prompter).unwrap();

    assert!(prompter.was_shown("\"kafka.api.secret\": \"****************\""));
    assert!(!prompter.transcript().iter().any(|l| l.contains("s3cret")));
    assert!(!prompter.transcript().iter().any(|l| l.contains("service_account")));
}

#[test]
fn test_empty_secret_is_rejected() {
    let mut prompter = ScriptedPrompter::new(["yes", "", "", "", "", "", "  ", "s3cret", "yes"]);
    let reviewed = bigquery_flow().run(&mut prompter).unwrap();

    pretty_assert_eq!(
        value(&reviewed, "kafka.api.secret").as_deref(),
        Some("s3cret")
    );
    assert!(prompter.was_shown("Input cannot be empty"));
}

#[test]
fn test_keyfile_from_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{KEYFILE}").unwrap();

    let options = TransformOptions::new("orders-bq").with_topic_table_map("");
    let transformation = transform(&bigquery_legacy(), ConnectorKind::BigQuery, &options).unwrap();
    let flow = ReviewFlow::new(ConnectorKind::BigQuery, "orders-bq", transformation);

    let path = file.path().display().to_string();
    let mut prompter = ScriptedPrompter::new([
        "yes",
        "",
        "",
        "",
        "",
        "",
        "/definitely/not/here.json",
        path.as_str(),
        "s3cret",
        "yes",
    ]);

    let reviewed = flow.run(&mut prompter).unwrap();
    pretty_assert_eq!(value(&reviewed, "keyfile").as_deref(), Some(KEYFILE));
    assert!(prompter.was_shown("Cannot read '/definitely/not/here.json'"));
}

#[test]
fn test_keyfile_pasted_json_must_be_valid() {
    let options = TransformOptions::new("orders-bq").with_topic_table_map("");
    let transformation = transform(&bigquery_legacy(), ConnectorKind::BigQuery, &options).unwrap();
    let flow = ReviewFlow::new(ConnectorKind::BigQuery, "orders-bq", transformation);

    let mut prompter = ScriptedPrompter::new([
        "yes", "", "", "", "", "", "{not json", "", KEYFILE, "s3cret", "yes",
    ]);

    let reviewed = flow.run(&mut prompter).unwrap();
    pretty_assert_eq!(value(&reviewed, "keyfile").as_deref(), Some(KEYFILE));
    assert!(prompter.was_shown("keyfile is not valid JSON"));
}

#[test]
fn test_keyfile_pasted_over_several_lines() {
    let options = TransformOptions::new("orders-bq").with_topic_table_map("");
    let transformation = transform(&bigquery_legacy(), ConnectorKind::BigQuery, &options).unwrap();
    let flow = ReviewFlow::new(ConnectorKind::BigQuery, "orders-bq", transformation);

    let mut prompter = ScriptedPrompter::new([
        "yes",
        "",
        "",
        "",
        "",
        "",
        "{",
        r#"  "type": "service_account","#,
        r#"  "project_id": "analytics""#,
        "}",
        "",
        "s3cret",
        "yes",
    ]);

    let reviewed = flow.run(&mut prompter).unwrap();
    let keyfile: serde_json::Value =
        serde_json::from_str(&value(&reviewed, "keyfile").unwrap()).unwrap();
    pretty_assert_eq!(keyfile, serde_json::from_str::<serde_json::Value>(KEYFILE).unwrap());
    assert!(!prompter.was_shown("Please try again"));
    pretty_assert_eq!(prompter.remaining(), 0);
}

#[test]
fn test_topic_table_map_prompt() {
    let options = TransformOptions::new("orders-bq").with_keyfile(KEYFILE);
    let transformation = transform(&bigquery_legacy(), ConnectorKind::BigQuery, &options).unwrap();
    let flow = ReviewFlow::new(ConnectorKind::BigQuery, "orders-bq", transformation);

    let mut prompter = ScriptedPrompter::new([
        "yes", "", "", "", "", "", "orders", "orders:orders_table", "s3cret", "yes",
    ]);

    let reviewed = flow.run(&mut prompter).unwrap();
    pretty_assert_eq!(
        value(&reviewed, "topic2table.map").as_deref(),
        Some("orders:orders_table")
    );
    assert!(prompter.was_shown("not in topic:table form"));
}

#[test]
fn test_http_review() {
    let mut prompter = ScriptedPrompter::new(["", "topsecret", "yes"]);
    let reviewed = http_flow(json!({})).run(&mut prompter).unwrap();

    pretty_assert_eq!(reviewed.name, "my-http-v1-sink_v2");
    pretty_assert_eq!(
        value(&reviewed, "kafka.api.secret").as_deref(),
        Some("topsecret")
    );
    pretty_assert_eq!(
        value(&reviewed, "http.api.base.url").as_deref(),
        Some("https://api.example.com")
    );
}

#[test]
fn test_http_unmapped_field_kept_under_new_key() {
    let mut prompter = ScriptedPrompter::new(["", "api1 custom", "api1.custom.flag", "topsecret", "yes"]);
    let reviewed = http_flow(json!({"custom.flag": "on"}))
        .run(&mut prompter)
        .unwrap();

    pretty_assert_eq!(value(&reviewed, "api1.custom.flag").as_deref(), Some("on"));
    assert!(!reviewed.config.contains_key("custom.flag"));
    assert!(prompter.was_shown("Keys cannot contain whitespace"));
}

#[test]
fn test_http_unmapped_field_dropped() {
    let mut prompter = ScriptedPrompter::new(["", "", "topsecret", "yes"]);
    let reviewed = http_flow(json!({"custom.flag": "on"}))
        .run(&mut prompter)
        .unwrap();

    assert!(!reviewed.config.contains_key("custom.flag"));
}

#[test]
fn test_http_masked_unmapped_field_asks_for_secret() {
    let mut prompter = ScriptedPrompter::new([
        "",
        "api1.custom.token",
        "tok-value",
        "topsecret",
        "yes",
    ]);
    let reviewed = http_flow(json!({"custom.token": MASKED_VALUE}))
        .run(&mut prompter)
        .unwrap();

    pretty_assert_eq!(
        value(&reviewed, "api1.custom.token").as_deref(),
        Some("tok-value")
    );
}

#[test]
fn test_http_unmapped_field_cannot_overwrite() {
    let mut prompter = ScriptedPrompter::new(["", "topics", "", "topsecret", "yes"]);
    let reviewed = http_flow(json!({"custom.flag": "on"}))
        .run(&mut prompter)
        .unwrap();

    pretty_assert_eq!(value(&reviewed, "topics").as_deref(), Some("events"));
    assert!(prompter.was_shown("'topics' is already set"));
}

#[test]
fn test_validate_rejects_remaining_masked_values() {
    let flow = http_flow(json!({}));
    let err = flow.validate().unwrap_err();
    assert!(err.to_string().contains("kafka.api.secret"));
}
