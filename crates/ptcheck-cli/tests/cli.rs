use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ROUTES: &str = r#"{
    "version": "0.6",
    "elements": [
        {"type": "node", "id": 2, "version": 1,
         "tags": {"public_transport": "stop_position"}},
        {"type": "node", "id": 20, "version": 1,
         "tags": {"public_transport": "platform"}},
        {"type": "way", "id": 1, "version": 1, "nodes": [1, 2]},
        {"type": "way", "id": 2, "version": 1, "nodes": [2, 3]},
        {"type": "way", "id": 3, "version": 1, "nodes": [7, 8]},
        {"type": "relation", "id": 100, "version": 1,
         "tags": {"type": "route", "route": "bus", "name": "Line 1"},
         "members": [
            {"type": "way", "ref": 1, "role": ""},
            {"type": "node", "ref": 2, "role": "stop"},
            {"type": "node", "ref": 20, "role": "platform"},
            {"type": "way", "ref": 2, "role": ""}
         ]},
        {"type": "relation", "id": 101, "version": 1,
         "tags": {"type": "route", "route": "tram", "name": "Line 2"},
         "members": [
            {"type": "way", "ref": 1, "role": ""},
            {"type": "way", "ref": 3, "role": ""}
         ]},
        {"type": "relation", "id": 102, "version": 1,
         "tags": {"type": "route", "route": "bus"},
         "members": [
            {"type": "way", "ref": 1, "role": ""},
            {"type": "way", "ref": 9, "role": ""}
         ]}
    ]
}"#;

struct Fixture {
    dir: TempDir,
    data: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("routes.json");
        std::fs::write(&data, ROUTES).unwrap();
        Self { dir, data }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("config").join("config.toml")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("ptcheck").unwrap();
        cmd.env("PTCHECK_CONFIG", self.config_path());
        cmd.env_remove("RUST_LOG");
        cmd
    }

    fn data(&self) -> &Path {
        &self.data
    }
}

#[test]
fn test_check_passing_route() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("check")
        .arg(fx.data())
        .args(["-r", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("passed"))
        .stdout(predicate::str::contains("1 passed, 0 failed, 0 not checked"));
}

#[test]
fn test_check_reports_gap() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("check")
        .arg(fx.data())
        .args(["-r", "101"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Ways 1 and 3 are not adjacent"));
}

#[test]
fn test_check_incomplete_member_is_not_checked() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("check")
        .arg(fx.data())
        .args(["-r", "102"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Primitive is incomplete: way 9"));
}

#[test]
fn test_check_all_routes_json() {
    let fx = Fixture::new();
    let output = fx
        .cmd()
        .args(["--format", "json", "check"])
        .arg(fx.data())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["relation"], 100);
    assert_eq!(results[0]["status"], "passed");
    assert_eq!(results[1]["status"], "failed");
    assert_eq!(
        results[1]["report"]["diagnostics"][0]["kind"],
        "not_adjacent"
    );
    assert_eq!(results[2]["status"], "error");
}

#[test]
fn test_check_unknown_relation() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("check")
        .arg(fx.data())
        .args(["-r", "999"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Primitive not found: relation 999"));
}

#[test]
fn test_check_permissive_rule_flag() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("check")
        .arg(fx.data())
        .args(["-r", "100", "--rule", "permissive", "--jobs", "1"])
        .assert()
        .success();
}

#[test]
fn test_check_unknown_rule() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("check")
        .arg(fx.data())
        .args(["--rule", "strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown placement rule: strict"));
}

#[test]
fn test_check_missing_file() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("check")
        .arg(fx.dir.path().join("absent.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load"));
}

#[test]
fn test_list_routes() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("list")
        .arg(fx.data())
        .assert()
        .success()
        .stdout(predicate::str::contains("Line 1"))
        .stdout(predicate::str::contains("tram"))
        .stdout(predicate::str::contains("102"));
}

#[test]
fn test_config_set_get() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["config", "set", "rule", "incidence"])
        .assert()
        .success();
    fx.cmd()
        .args(["config", "get", "rule"])
        .assert()
        .success()
        .stdout("incidence\n");
    assert!(fx.config_path().exists());
}

#[test]
fn test_config_format_applies_to_commands() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["config", "set", "format", "json"])
        .assert()
        .success();
    fx.cmd()
        .arg("list")
        .arg(fx.data())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("["));
}

#[test]
fn test_config_rejects_unknown_key() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["config", "set", "colour", "red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_config_init_requires_force() {
    let fx = Fixture::new();
    fx.cmd().args(["config", "init"]).assert().success();
    fx.cmd()
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    fx.cmd().args(["config", "init", "--force"]).assert().success();
}

#[test]
fn test_completions() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ptcheck"));
}
