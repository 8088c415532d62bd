use serial_test::serial;
use std::env;
use std::fs::write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

const STATIC_YAML: &str = r#"
source:
  index_url: "https://example.org/Scripts/CircularIndex.aspx"
  link_base: "https://example.org/Scripts/"
  detail_marker: "CircularIndexDisplay.aspx?Id="
  document_url_patterns:
    - "https://docs.example.org/rdocs/{id}.pdf"
  link_ignore:
    - utkarsh
state_path: ./state/last_circular.txt
archive_root: ./archive
generation:
  model: gemini-2.5-flash
"#;

/// A static config plus required env vars produces a fully merged WatchConfig.
#[test]
#[serial]
fn test_load_config_success_injects_env_secrets() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), STATIC_YAML).unwrap();

    env::set_var("GEMINI_API_KEY", "top-secret-test-key");
    env::set_var("NOTIFY_WEBHOOK_URL", "https://hooks.example.org/circulars");

    let config =
        circular_watch::load_config::load_config(config_file.path()).expect("Config should load");

    assert_eq!(
        config.source.index_url,
        "https://example.org/Scripts/CircularIndex.aspx"
    );
    assert_eq!(config.source.id_param, "Id", "id_param defaults");
    assert_eq!(config.source.document_url_patterns.len(), 1);
    assert_eq!(config.state_path, PathBuf::from("./state/last_circular.txt"));
    assert_eq!(config.archive_root, PathBuf::from("./archive"));

    // Secrets must come directly from environment.
    assert_eq!(config.generation.api_key, "top-secret-test-key");
    assert_eq!(
        config.notify.webhook_url,
        "https://hooks.example.org/circulars"
    );

    // Unspecified sections fall back to defaults.
    assert_eq!(
        config.generation.endpoint,
        "https://generativelanguage.googleapis.com"
    );
    assert_eq!(config.timeouts.fetch_secs, 30);
}

/// Missing required env vars make the loader fail loudly.
#[test]
#[serial]
fn test_load_config_errors_on_missing_env() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), STATIC_YAML).unwrap();

    env::remove_var("GEMINI_API_KEY");
    env::remove_var("NOTIFY_WEBHOOK_URL");

    let err = circular_watch::load_config::load_config(config_file.path()).unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.contains("GEMINI_API_KEY") || msg.contains("NOTIFY_WEBHOOK_URL"),
        "Must error for missing env var, got: {msg}"
    );
}

/// Invalid YAML is reported as a parse failure.
#[test]
#[serial]
fn test_load_config_errors_for_invalid_file() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), b"not-yaml: [:::").unwrap();

    env::set_var("GEMINI_API_KEY", "invalid-but-present");
    env::set_var("NOTIFY_WEBHOOK_URL", "https://hooks.example.org/x");

    let err = circular_watch::load_config::load_config(config_file.path()).unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}
