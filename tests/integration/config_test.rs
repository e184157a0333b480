//! Integration tests for configuration loading

use kickoff::config::{Config, ConfigError, NotifierKind};
use std::io::Write;

#[test]
fn test_config_example_loads() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    assert_eq!(config.scheduler.polling_interval_secs, 10);
    assert_eq!(config.notifier.kind, NotifierKind::Stdout);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
        [scheduler]
        polling_interval_secs = 30
        backoff_ratio = 0.5

        [highlights]
        second_yellow_is_red = false
        "#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.scheduler.polling_interval_secs, 30);
    assert_eq!(config.scheduler.backoff_ratio, 0.5);
    assert!(!config.highlights.second_yellow_is_red);
    assert!(!config.highlights.report_score_changes);
}

#[test]
fn test_config_load_malformed_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[scheduler\npolling_interval_secs = ").unwrap();

    let err = Config::load(file.path()).unwrap_err();
    assert!(err.to_string().starts_with("Failed to parse config"));
}

#[test]
fn test_malformed_slack_config_is_not_replaced_by_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[notifier]\nkind = \"slack\"\nslack_channel = \"#worldcup").unwrap();

    let result = Config::load_or_default(file.path());
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}
