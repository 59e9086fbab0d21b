#![forbid(unsafe_code)]

//! Loading grid configuration and interaction traces from disk.
//!
//! Run:
//!   cargo test -p gridboard-layout --features config-file --test config_files

use std::io::Write;

use gridboard_core::Placement;
use gridboard_layout::{GridConfig, GridConfigError, InteractionTrace, ItemId, TraceError};

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

#[test]
fn toml_file_round_trips_all_fields() {
    let file = write_temp(
        ".toml",
        "row_height = 32.0\nmin_rows = 12\nbuffer_rows = 3\n",
    );
    let config = GridConfig::from_toml_file(file.path()).expect("valid toml");
    assert_eq!(
        config,
        GridConfig {
            row_height: 32.0,
            min_rows: 12,
            buffer_rows: 3,
        }
    );
}

#[test]
fn json_file_falls_back_to_defaults() {
    let file = write_temp(".json", r#"{ "min_rows": 8 }"#);
    let config = GridConfig::from_json_file(file.path()).expect("valid json");
    assert_eq!(config.min_rows, 8);
    assert_eq!(config.row_height, GridConfig::default().row_height);
    assert_eq!(config.buffer_rows, GridConfig::default().buffer_rows);
}

#[test]
fn invalid_values_are_reported_after_parsing() {
    let err = GridConfig::from_toml_str("row_height = -1.0\nmin_rows = 0\n")
        .expect_err("invalid values");
    match err {
        GridConfigError::Validation(errors) => assert_eq!(errors.len(), 2, "{errors:?}"),
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn parse_and_io_errors_keep_their_source() {
    let err = GridConfig::from_toml_str("row_height = [").expect_err("broken toml");
    assert!(matches!(err, GridConfigError::Toml(_)));
    assert!(std::error::Error::source(&err).is_some());

    let err = GridConfig::from_json_str("{").expect_err("broken json");
    assert!(matches!(err, GridConfigError::Json(_)));

    let err = GridConfig::from_toml_file("/nonexistent/gridboard.toml").expect_err("missing file");
    assert!(matches!(err, GridConfigError::Io(_)));
    assert!(err.to_string().starts_with("I/O error"));
}

#[test]
fn trace_loads_from_json_and_replays_with_file_config() {
    let config_file = write_temp(".toml", "row_height = 20.0\n");
    let config = GridConfig::from_toml_file(config_file.path()).expect("valid toml");

    let trace = InteractionTrace::from_json_str(
        r#"{
            "schema_version": 1,
            "items": [{ "id": 4, "label": "Counter",
                        "placement": { "col_start": 2, "row_start": 1, "col_span": 1, "row_span": 1 } }],
            "events": [
                { "event": "begin_drag", "item": 4,
                  "sample": { "position": { "x": 0.0, "y": 0.0 }, "grid_width": 600.0 } },
                { "event": "move",
                  "sample": { "position": { "x": 50.0, "y": 60.0 }, "grid_width": 600.0 } },
                { "event": "up" }
            ]
        }"#,
    )
    .expect("valid trace");

    let outcome = trace.replay(&config).expect("replayable");
    let id = ItemId::new(4).expect("non-zero");
    assert_eq!(
        outcome.state.get(id).map(|item| item.placement),
        Some(Placement::new(3, 4, 1, 1))
    );
}

#[test]
fn malformed_trace_is_a_json_error() {
    let err = InteractionTrace::from_json_str(r#"{ "events": [{ "event": "teleport" }] }"#)
        .expect_err("unknown event");
    assert!(matches!(err, TraceError::Json(_)));
}
