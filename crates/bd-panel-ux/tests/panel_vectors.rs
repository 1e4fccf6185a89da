//! Integration tests: resolve the fixture snapshots.
//!
//! Each fixture in tests/fixtures/ has:
//! - snapshot.json: a response snapshot document
//! - expect.json: fields the resolved panel view must contain
//!
//! `expect.json` is matched as a subset: every key it names must be present
//! in the view with an equal value; keys it omits are not checked.

use bd_panel_core::PanelConfig;
use bd_panel_ux::{PanelService, SnapshotBackend};
use serde_json::Value;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn assert_subset(actual: &Value, expected: &Value, path: &str) {
    match (actual, expected) {
        (Value::Object(actual), Value::Object(expected)) => {
            for (key, want) in expected {
                let got = actual
                    .get(key)
                    .unwrap_or_else(|| panic!("missing field {path}.{key}"));
                assert_subset(got, want, &format!("{path}.{key}"));
            }
        }
        _ => assert_eq!(actual, expected, "mismatch at {path}"),
    }
}

fn run_fixture(name: &str) {
    let dir = fixtures_dir().join(name);
    let snapshot_path = dir.join("snapshot.json");
    let expect_path = dir.join("expect.json");

    let expect_str = std::fs::read_to_string(&expect_path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", expect_path.display()));
    let expected: Value = serde_json::from_str(&expect_str)
        .unwrap_or_else(|e| panic!("failed to parse {}: {e}", expect_path.display()));

    let config = PanelConfig::default();
    let backend = SnapshotBackend::load_json(&snapshot_path, config.service_types.clone())
        .unwrap_or_else(|e| panic!("failed to load {}: {e}", snapshot_path.display()));
    let service = PanelService::new(backend, config);

    let view = serde_json::to_value(service.view()).expect("failed to serialize view");
    assert_subset(&view, &expected, name);

    let resolver = service.resolver();
    assert!(
        resolver.active_states().len() <= 1,
        "\n\nFixture: {name}\n\nOverlapping states: {:?}\n",
        resolver.active_states()
    );
}

#[test]
fn scenario_a_no_responses() {
    run_fixture("scenario_a_no_responses");
}

#[test]
fn scenario_b_prompt_only() {
    run_fixture("scenario_b_prompt_only");
}

#[test]
fn scenario_c_validation_error_keeps_form() {
    run_fixture("scenario_c_validation_error_keeps_form");
}

#[test]
fn scenario_d_submission_error() {
    run_fixture("scenario_d_submission_error");
}

#[test]
fn scenario_e_confirmation_suppresses_link() {
    run_fixture("scenario_e_confirmation_suppresses_link");
}

#[test]
fn scenario_f_not_available() {
    run_fixture("scenario_f_not_available");
}

#[test]
fn submission_in_progress() {
    run_fixture("submission_in_progress");
}

#[test]
fn unrecognized_status_degrades() {
    run_fixture("unrecognized_status_degrades");
}

#[test]
fn malformed_status_degrades() {
    run_fixture("malformed_status_degrades");
}

#[test]
fn null_view_data_marker() {
    run_fixture("null_view_data_marker");
}
