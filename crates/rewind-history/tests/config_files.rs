#![forbid(unsafe_code)]

//! Loading [`HistoryConfig`] from files on disk.
//!
//! Run:
//!   cargo test -p rewind-history --features config --test config_files

use std::io::Write;

use rewind_history::{ConfigError, HistoryConfig, SnapshotHistory};

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

#[test]
fn toml_file_round_trip() {
    let file = write_temp(".toml", "max_depth = 3\n");
    let config = HistoryConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(config, HistoryConfig::new(3));
}

#[test]
fn json_file_round_trip() {
    let file = write_temp(".json", r#"{ "max_depth": 8 }"#);
    let config = HistoryConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.max_depth, 8);
}

#[test]
fn from_file_picks_format_by_extension() {
    let json = write_temp(".json", r#"{ "max_depth": 4 }"#);
    let toml = write_temp(".toml", "max_depth = 5");
    assert_eq!(HistoryConfig::from_file(json.path()).unwrap().max_depth, 4);
    assert_eq!(HistoryConfig::from_file(toml.path()).unwrap().max_depth, 5);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = HistoryConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn malformed_toml_is_parse_error() {
    let err = HistoryConfig::from_toml_str("max_depth = \"many\"").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn malformed_json_is_parse_error() {
    let err = HistoryConfig::from_json_str("{ max_depth: }").unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}

#[test]
fn zero_depth_fails_validation() {
    let file = write_temp(".toml", "max_depth = 0");
    let err = HistoryConfig::from_file(file.path()).unwrap_err();
    match err {
        ConfigError::Validation(errors) => assert_eq!(errors.len(), 1),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn loaded_config_limits_history() {
    let config = HistoryConfig::from_toml_str("max_depth = 2").unwrap();
    let mut h = SnapshotHistory::with_config(0, config);
    h.commit(1);
    h.commit(2);
    h.commit(3);
    assert_eq!(h.values().copied().collect::<Vec<_>>(), vec![2, 3]);
}

#[test]
fn status_serializes_to_json() {
    let mut h = SnapshotHistory::new(0);
    h.commit(1);
    let json = serde_json::to_value(h.status()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "cursor": 0, "len": 1, "can_undo": false, "can_redo": false })
    );
}
