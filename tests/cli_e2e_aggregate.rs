//! End-to-end tests for the `component-generator aggregate` command.
//!
//! Only local sources are used; remote resolution is covered by unit tests
//! with a mock HTTP fetcher.

#[allow(dead_code)]
mod common;
use common::prelude::*;

fn two_locals() -> TestFixture {
    TestFixture::new()
        .with_config(configs::TWO_LOCALS)
        .with_component("a.yaml", &["1"])
        .with_component("b.yaml", &["2", "3"])
}

fn component_uuids(document: &str) -> Vec<String> {
    let value: serde_yaml::Value = serde_yaml::from_str(document).unwrap();
    value["component-definition"]["components"]
        .as_sequence()
        .unwrap()
        .iter()
        .map(|c| c["uuid"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_aggregate_help() {
    let mut cmd = cargo_bin_cmd!("component-generator");
    cmd.arg("aggregate")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--stdout"))
        .stdout(predicate::str::contains("--file-version"))
        .stdout(predicate::str::contains("--lenient"));
}

#[test]
fn test_aggregate_writes_named_file_in_order() {
    let fixture = two_locals();

    fixture
        .aggregate()
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote out.yaml (3 component(s))"));

    let written = fixture.read("out.yaml");
    assert_eq!(component_uuids(&written), vec!["1", "2", "3"]);
    assert!(written.contains("title: Aggregated Components"));
    assert!(written.contains("oscal-version:"));
    assert!(!written.contains("8f7e6d5c-4b3a-4291-8a7b-6c5d4e3f2a1b"));
}

#[test]
fn test_aggregate_second_run_is_unchanged() {
    let fixture = two_locals();

    fixture.aggregate().assert().success();
    let first = fixture.read("out.yaml");

    fixture
        .aggregate()
        .assert()
        .success()
        .stderr(predicate::str::contains("out.yaml is up to date"));
    assert_eq!(fixture.read("out.yaml"), first);
}

#[test]
fn test_aggregate_rewrites_after_source_change() {
    let fixture = two_locals();
    fixture.aggregate().assert().success();

    let fixture = fixture.with_component("a.yaml", &["9"]);
    fixture
        .aggregate()
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote out.yaml"));
    assert_eq!(component_uuids(&fixture.read("out.yaml")), vec!["9", "2", "3"]);
}

#[test]
fn test_aggregate_stdout_does_not_write() {
    let fixture = two_locals();

    let assert = fixture.aggregate().arg("--stdout").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    assert!(stdout.starts_with("component-definition:"));
    assert_eq!(component_uuids(&stdout), vec!["1", "2", "3"]);
    fixture.child("out.yaml").assert(predicate::path::missing());
}

#[test]
fn test_aggregate_json_output() {
    let fixture = two_locals();

    fixture
        .aggregate()
        .args(["--name", "out.json"])
        .assert()
        .success();

    let value: serde_json::Value = serde_json::from_str(&fixture.read("out.json")).unwrap();
    assert_eq!(value["component-definition"]["components"][2]["uuid"], "3");
    assert_eq!(
        value["component-definition"]["metadata"]["title"],
        "Aggregated Components"
    );
}

#[test]
fn test_aggregate_flags_override_config() {
    let fixture = two_locals();

    fixture
        .aggregate()
        .args(["--title", "Overridden", "--doc-version", "9.9.9", "-v", "v1-1-1"])
        .assert()
        .success();

    let written: serde_yaml::Value = serde_yaml::from_str(&fixture.read("out.yaml")).unwrap();
    let metadata = &written["component-definition"]["metadata"];
    assert_eq!(metadata["title"].as_str(), Some("Overridden"));
    assert_eq!(metadata["version"].as_str(), Some("9.9.9"));
    assert_eq!(metadata["oscal-version"].as_str(), Some("1.1.1"));
}

#[test]
fn test_aggregate_imperative_mode() {
    let fixture = TestFixture::new()
        .with_component("defs/a.yaml", &["1"])
        .with_component("defs/b.yaml", &["2"]);

    fixture
        .command()
        .args([
            "aggregate",
            "--name",
            "platform.yaml",
            "--title",
            "Platform",
            "--doc-version",
            "0.1.0",
            "--base-directory",
            "defs",
            "--local",
            "b.yaml",
            "--local",
            "a.yaml",
        ])
        .assert()
        .success();

    assert_eq!(component_uuids(&fixture.read("platform.yaml")), vec!["2", "1"]);
}

#[test]
fn test_aggregate_imperative_mode_requires_flags() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["aggregate", "--name", "out.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--title, --doc-version"));
}

#[test]
fn test_aggregate_config_from_environment() {
    let fixture = two_locals();

    fixture
        .command()
        .env("COMPONENT_GENERATOR_CONFIG", fixture.config_path())
        .arg("aggregate")
        .assert()
        .success();

    fixture.child("out.yaml").assert(predicate::path::exists());
}

#[test]
fn test_aggregate_strict_parse_failure_aborts() {
    let fixture = two_locals().with_file("b.yaml", "not: a component definition\n");

    fixture
        .aggregate()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse b.yaml"));
    fixture.child("out.yaml").assert(predicate::path::missing());
}

#[test]
fn test_aggregate_lenient_skips_unparseable_source() {
    let fixture = two_locals().with_file("b.yaml", "not: a component definition\n");

    fixture
        .aggregate()
        .arg("--lenient")
        .assert()
        .success()
        .stderr(predicate::str::contains("[SKIPPED] b.yaml"));

    assert_eq!(component_uuids(&fixture.read("out.yaml")), vec!["1"]);
}

#[test]
fn test_aggregate_debug_logging() {
    let fixture = two_locals();

    fixture
        .aggregate()
        .args(["--log-level", "debug", "--stdout"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Decoded a.yaml with 1 component(s)"));
}
