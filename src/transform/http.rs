//! HTTP V1 sink → HTTP V2 sink

use super::types::{DecisionPoint, TransformOptions, Transformation};
use crate::config::{ConfigValue, ConnectorConfig};
use crate::error::{Error, Result};
use crate::types::ConnectorKind;
use tracing::debug;
use url::{Position, Url};

/// V1 keys that were renamed (or kept) in V2
pub const RENAMED_KEYS: &[(&str, &str)] = &[
    ("auth.type", "auth.type"),
    ("batch.json.as.array", "api1.batch.json.as.array"),
    ("batch.key.pattern", "api1.batch.key.pattern"),
    ("batch.max.size", "api1.max.batch.size"),
    ("batch.prefix", "api1.batch.prefix"),
    ("batch.separator", "api1.batch.separator"),
    ("batch.suffix", "api1.batch.suffix"),
    ("behavior.on.error", "behavior.on.error"),
    ("behavior.on.null.values", "api1.behavior.on.null.values"),
    ("connection.password", "connection.password"),
    ("connection.user", "connection.user"),
    ("header.separator", "api1.http.request.headers.separator"),
    ("headers", "api1.http.request.headers"),
    ("http.connect.timeout.ms", "api1.http.connect.timeout.ms"),
    ("http.request.timeout.ms", "api1.http.request.timeout.ms"),
    ("https.host.verifier.enabled", "https.host.verifier.enabled"),
    ("https.ssl.key.password", "https.ssl.key.password"),
    ("https.ssl.keystore.password", "https.ssl.keystore.password"),
    ("https.ssl.keystorefile", "https.ssl.keystorefile"),
    ("https.ssl.protocol", "https.ssl.protocol"),
    ("https.ssl.truststore.password", "https.ssl.truststore.password"),
    ("https.ssl.truststorefile", "https.ssl.truststorefile"),
    ("max.retries", "api1.max.retries"),
    ("oauth2.client.auth.mode", "oauth2.client.auth.mode"),
    ("oauth2.client.header.separator", "oauth2.client.header.separator"),
    ("oauth2.client.headers", "oauth2.client.headers"),
    ("oauth2.client.id", "oauth2.client.id"),
    ("oauth2.client.scope", "oauth2.client.scope"),
    ("oauth2.client.secret", "oauth2.client.secret"),
    ("oauth2.jwt.claimset", "oauth2.jwt.claimset"),
    ("oauth2.jwt.enabled", "oauth2.jwt.enabled"),
    ("oauth2.jwt.keystore.password", "oauth2.jwt.keystore.password"),
    ("oauth2.jwt.keystore.path", "oauth2.jwt.keystore.path"),
    ("oauth2.jwt.keystore.type", "oauth2.jwt.keystore.type"),
    ("oauth2.token.property", "oauth2.token.property"),
    ("oauth2.token.url", "oauth2.token.url"),
    ("regex.patterns", "api1.regex.patterns"),
    ("regex.replacements", "api1.regex.replacements"),
    ("regex.separator", "api1.regex.separator"),
    ("report.errors.as", "report.errors.as"),
    ("request.body.format", "api1.request.body.format"),
    ("request.method", "api1.http.request.method"),
    ("retry.backoff.ms", "api1.retry.backoff.ms"),
    ("retry.backoff.policy", "api1.retry.backoff.policy"),
    ("retry.on.status.codes", "api1.retry.on.status.codes"),
    ("sensitive.headers", "api1.http.request.sensitive.headers"),
    ("topics", "api1.topics"),
];

/// Keys copied unchanged
pub const COMMON_KEYS: &[&str] = &[
    "input.data.format",
    "kafka.api.key",
    "kafka.api.secret",
    "kafka.auth.mode",
    "kafka.service.account.id",
    "max.poll.interval.ms",
    "max.poll.records",
    "name",
    "schema.context.name",
    "tasks.max",
    "topics",
];

const API_URL_KEY: &str = "http.api.url";

/// Keys consumed by the transformation itself
const HANDLED_KEYS: &[&str] = &[API_URL_KEY, "connector.class", "name"];

pub(crate) fn transform(
    legacy: &ConnectorConfig,
    options: &TransformOptions,
) -> Result<Transformation> {
    let kind = ConnectorKind::Http;
    super::check_connector_class(legacy, kind)?;

    let (base_url, api_path) = split_api_url(legacy.get(API_URL_KEY))?;

    let mut draft = ConnectorConfig::new();
    let mut unmapped = Vec::new();

    for (key, value) in legacy.iter() {
        let renamed = RENAMED_KEYS.iter().find(|(v1, _)| v1 == key);
        let common = COMMON_KEYS.contains(&key.as_str());

        if let Some((_, v2)) = renamed {
            draft.insert(*v2, value.clone());
        }
        if common {
            draft.insert(key.clone(), value.clone());
        }
        if renamed.is_none() && !common && !HANDLED_KEYS.contains(&key.as_str()) {
            unmapped.push(DecisionPoint::UnmappedField {
                key: key.clone(),
                value: value.clone(),
            });
        }
    }

    let target_name = kind.default_target_name(&options.connector_name);
    draft.insert("name", target_name.clone());
    draft.insert("connector.class", kind.target_class());
    draft.insert("apis.num", "1");
    draft.insert("http.api.base.url", base_url);
    draft.insert("api1.http.api.path", api_path);
    draft.insert_default("tasks.max", 1u64);

    let mut decisions = vec![DecisionPoint::ConnectorName {
        default: target_name,
    }];
    decisions.extend(unmapped);
    decisions.extend(
        draft
            .masked_keys()
            .into_iter()
            .map(|key| DecisionPoint::Secret { key }),
    );

    debug!(
        "HTTP draft has {} keys and {} decisions",
        draft.len(),
        decisions.len()
    );

    Ok(Transformation {
        draft,
        decisions,
        breaking_changes: Vec::new(),
        dropped: Vec::new(),
    })
}

/// Split `http.api.url` into the V2 base URL and API path
///
/// The base is scheme plus authority; the path keeps any query string.
pub fn split_api_url(value: Option<&ConfigValue>) -> Result<(String, String)> {
    let raw = value
        .and_then(ConfigValue::as_text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::unsupported_field(API_URL_KEY, "the V1 connector has no API URL"))?;

    let url = Url::parse(raw).map_err(|e| {
        Error::unsupported_field(API_URL_KEY, format!("'{raw}' is not an absolute URL: {e}"))
    })?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(Error::unsupported_field(
            API_URL_KEY,
            format!("'{raw}' has no host"),
        ));
    }

    let base = url[..Position::BeforePath].to_string();
    let path = url[Position::BeforePath..].to_string();
    Ok((base, path))
}
