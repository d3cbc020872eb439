//! Tests for credential resolution

use super::*;
use crate::prompt::ScriptedPrompter;
use crate::Error;
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

fn credentials_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_environment_takes_priority() {
    let file = credentials_file(r#"{"email": "file@example.com", "password": "f"}"#);
    let resolver = CredentialResolver::new().with_file(file.path());
    let mut prompter = ScriptedPrompter::default();

    let (creds, source) = resolver
        .resolve_with(
            env_of(&[("EMAIL", "env@example.com"), ("PASSWORD", "e")]),
            &mut prompter,
        )
        .unwrap();

    assert_eq!(source, CredentialSource::Environment);
    assert_eq!(creds.email, "env@example.com");
    assert!(prompter.transcript().is_empty());
}

#[test]
fn test_partial_environment_is_ignored() {
    let file = credentials_file(r#"{"email": "file@example.com", "password": "f"}"#);
    let resolver = CredentialResolver::new().with_file(file.path());
    let mut prompter = ScriptedPrompter::default();

    let (creds, source) = resolver
        .resolve_with(env_of(&[("EMAIL", "env@example.com")]), &mut prompter)
        .unwrap();

    assert_eq!(source, CredentialSource::File);
    assert_eq!(creds, Credentials::new("file@example.com", "f"));
}

#[test]
fn test_file_accepts_identity_secret_aliases() {
    let file = credentials_file(r#"{"identity": "ops@example.com", "secret": "s3cret"}"#);
    let resolver = CredentialResolver::new().with_file(file.path()).non_interactive();
    let mut prompter = ScriptedPrompter::default();

    let (creds, source) = resolver.resolve_with(env_of(&[]), &mut prompter).unwrap();

    assert_eq!(source, CredentialSource::File);
    assert_eq!(creds.email, "ops@example.com");
    assert_eq!(creds.password, "s3cret");
}

#[test]
fn test_bad_file_falls_through_to_prompt() {
    let file = credentials_file("not json");
    let resolver = CredentialResolver::new().with_file(file.path());
    let mut prompter = ScriptedPrompter::new(["ops@example.com", "typed"]);

    let (creds, source) = resolver.resolve_with(env_of(&[]), &mut prompter).unwrap();

    assert_eq!(source, CredentialSource::Prompt);
    assert_eq!(creds.password, "typed");
    assert!(prompter.was_shown("Could not use credentials file"));
}

#[test]
fn test_prompt_reads_masked_secret() {
    let resolver = CredentialResolver::new();
    let mut prompter = ScriptedPrompter::new(["ops@example.com", "typed"]);

    let (creds, source) = resolver.resolve_with(env_of(&[]), &mut prompter).unwrap();

    assert_eq!(source, CredentialSource::Prompt);
    assert_eq!(creds, Credentials::new("ops@example.com", "typed"));
}

#[test]
fn test_all_sources_exhausted() {
    let resolver = CredentialResolver::new();
    let mut prompter = ScriptedPrompter::new(["ops@example.com", ""]);

    let err = resolver
        .resolve_with(env_of(&[]), &mut prompter)
        .unwrap_err();
    assert!(matches!(err, Error::MissingCredentials { .. }));
}

#[test]
fn test_non_interactive_without_sources() {
    let resolver = CredentialResolver::new().non_interactive();
    let mut prompter = ScriptedPrompter::default();

    let err = resolver
        .resolve_with(env_of(&[]), &mut prompter)
        .unwrap_err();
    assert!(matches!(err, Error::MissingCredentials { .. }));
}

#[test]
fn test_missing_prompt_is_missing_credentials() {
    let resolver = CredentialResolver::new();
    let mut prompter = ScriptedPrompter::default();

    let err = resolver
        .resolve_with(env_of(&[]), &mut prompter)
        .unwrap_err();
    assert!(matches!(err, Error::MissingCredentials { .. }));
}

#[test]
fn test_debug_redacts_password() {
    let creds = Credentials::new("ops@example.com", "hunter2");
    let rendered = format!("{creds:?}");
    assert!(rendered.contains("ops@example.com"));
    assert!(!rendered.contains("hunter2"));
}
