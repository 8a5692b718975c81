//! Integration tests for the `netsandbox` CLI binary.
//!
//! Every test runs against a private temp directory used as both the
//! config home and the place sandbox documents are written.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `netsandbox` binary with env isolation.
fn netsandbox_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("netsandbox");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("NETSANDBOX_STORE")
        .env_remove("NETSANDBOX_OUTPUT")
        .env_remove("NETSANDBOX_DEFAULT_STORE")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

/// Build a small cafe: two POS, one handheld on `Cafe`/`espresso`.
fn cafe(home: &TempDir) -> PathBuf {
    let path = home.path().join("cafe.json");
    netsandbox_cmd(home.path())
        .args(["build", "--pos", "2", "--handhelds", "1"])
        .args(["--ssid", "Cafe", "--password", "espresso", "--out"])
        .arg(&path)
        .assert()
        .success();
    path
}

fn device_json(home: &TempDir, doc: &Path, device: &str) -> Value {
    let output = netsandbox_cmd(home.path())
        .args(["-o", "json", "devices", "get"])
        .arg(doc)
        .arg(device)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    stdout_json(&output)
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = netsandbox_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    netsandbox_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("plan")
                .and(predicate::str::contains("build"))
                .and(predicate::str::contains("simulate"))
                .and(predicate::str::contains("devices")),
        );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    netsandbox_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("netsandbox"));
}

#[test]
fn test_completions_zsh() {
    let home = TempDir::new().unwrap();
    netsandbox_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_invalid_output_format() {
    let home = TempDir::new().unwrap();
    let output = netsandbox_cmd(home.path())
        .args(["--output", "invalid", "plan"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    let home = TempDir::new().unwrap();
    netsandbox_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

#[test]
fn test_config_init_then_plan_uses_default_store() {
    let home = TempDir::new().unwrap();
    netsandbox_cmd(home.path())
        .args(["--yes", "config", "init"])
        .assert()
        .success();

    // The non-interactive preset: 2 POS + 1 printer behind the router.
    let output = netsandbox_cmd(home.path())
        .args(["-o", "json", "plan"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let report = stdout_json(&output);
    assert_eq!(report["request"]["pos"], 2);
    assert_eq!(report["plan"]["switches"], 0);
}

// ── Plan ────────────────────────────────────────────────────────────

#[test]
fn test_plan_from_flags() {
    let home = TempDir::new().unwrap();
    let output = netsandbox_cmd(home.path())
        .args(["-o", "json", "plan", "--pos", "4", "--printers", "1"])
        .args(["--handhelds", "2"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let plan = &stdout_json(&output)["plan"];
    assert_eq!(plan["switches"], 1);
    assert_eq!(plan["accessPoints"], 1);
    assert_eq!(plan["poeInjectors"], 1);
    assert_eq!(plan["outlets"], 3);
}

#[test]
fn test_plan_saturates_oversized_counts() {
    let home = TempDir::new().unwrap();
    let output = netsandbox_cmd(home.path())
        .args(["-o", "json", "plan", "--pos", "4294967295", "--printers", "1"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(stdout_json(&output)["plan"]["switches"], 50);
}

#[test]
fn test_plan_unknown_store() {
    let home = TempDir::new().unwrap();
    netsandbox_cmd(home.path())
        .args(["--store", "kiosk", "plan"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("kiosk"));
}

// ── Build + mutate ──────────────────────────────────────────────────

#[test]
fn test_build_brings_handheld_online() {
    let home = TempDir::new().unwrap();
    let doc = cafe(&home);
    let handheld = device_json(&home, &doc, "handheld-1");
    assert_eq!(handheld["connectionState"], "online");
}

#[test]
fn test_build_from_yaml_request() {
    let home = TempDir::new().unwrap();
    let request = home.path().join("request.yaml");
    std::fs::write(
        &request,
        "devices:\n  - id: pos-1\n    role: pos\n  - id: printer-1\n    role: printer\n",
    )
    .unwrap();
    let output = netsandbox_cmd(home.path())
        .args(["-o", "plain", "build", "--from-file"])
        .arg(&request)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let ids = String::from_utf8_lossy(&output.stdout);
    assert!(ids.lines().any(|l| l == "pos-1"));
    assert!(ids.lines().any(|l| l == "isp-modem"));
}

#[test]
fn test_build_rejects_bad_connect_to() {
    let home = TempDir::new().unwrap();
    let request = home.path().join("request.json");
    std::fs::write(
        &request,
        r#"{"devices": [{"id": "pos-1", "role": "pos", "connectTo": "nowhere"}]}"#,
    )
    .unwrap();
    netsandbox_cmd(home.path())
        .args(["build", "--from-file"])
        .arg(&request)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("nowhere"));
}

#[test]
fn test_router_power_off_cuts_internet() {
    let home = TempDir::new().unwrap();
    let doc = cafe(&home);
    netsandbox_cmd(home.path())
        .args(["devices", "power"])
        .arg(&doc)
        .args(["router", "off"])
        .assert()
        .success();

    let handheld = device_json(&home, &doc, "handheld-1");
    assert_eq!(handheld["connectionState"], "associated_no_internet");
    let router = device_json(&home, &doc, "router");
    assert_eq!(router["status"], "offline");
}

#[test]
fn test_modem_is_not_controllable() {
    let home = TempDir::new().unwrap();
    let doc = cafe(&home);
    netsandbox_cmd(home.path())
        .args(["devices", "power"])
        .arg(&doc)
        .args(["isp-modem", "off"])
        .assert()
        .code(5);
}

#[test]
fn test_wrong_password_is_auth_failed() {
    let home = TempDir::new().unwrap();
    let doc = cafe(&home);
    netsandbox_cmd(home.path())
        .args(["wifi", "join"])
        .arg(&doc)
        .args(["handheld-1", "--ssid", "Cafe", "--password", "latte"])
        .assert()
        .success()
        .stdout(predicate::str::contains("auth_failed"));
}

#[test]
fn test_disconnect_writes_to_out() {
    let home = TempDir::new().unwrap();
    let doc = cafe(&home);
    let before = std::fs::read_to_string(&doc).unwrap();
    let out = home.path().join("unplugged.json");

    netsandbox_cmd(home.path())
        .args(["ports", "disconnect"])
        .arg(&doc)
        .arg("pos-1/eth")
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(&doc).unwrap(), before);
    let pos = device_json(&home, &out, "pos-1");
    let eth = pos["ports"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == "ETH")
        .unwrap();
    assert!(eth.get("connectedTo").is_none());
    assert_eq!(eth["linkStatus"], "down");
}

#[test]
fn test_remove_requires_confirmation() {
    let home = TempDir::new().unwrap();
    let doc = cafe(&home);
    netsandbox_cmd(home.path())
        .args(["devices", "remove"])
        .arg(&doc)
        .arg("pos-2")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));

    netsandbox_cmd(home.path())
        .args(["--yes", "devices", "remove"])
        .arg(&doc)
        .arg("pos-2")
        .assert()
        .success();
    netsandbox_cmd(home.path())
        .args(["devices", "get"])
        .arg(&doc)
        .arg("pos-2")
        .assert()
        .code(4);
}

// ── Simulate ────────────────────────────────────────────────────────

#[test]
fn test_simulate_rejects_asymmetric_cable() {
    let home = TempDir::new().unwrap();
    let doc = home.path().join("broken.json");
    std::fs::write(
        &doc,
        r#"{
          "devices": [
            {"id": "sw", "name": "Switch", "type": "switch", "ports": [
              {"id": "sw/port-1", "name": "PORT 1", "role": "lan", "connectedTo": "pos/eth"}
            ]},
            {"id": "pos", "name": "POS", "type": "pos_terminal", "ports": [
              {"id": "pos/eth", "name": "ETH", "role": "uplink"}
            ]}
          ]
        }"#,
    )
    .unwrap();

    netsandbox_cmd(home.path())
        .args(["simulate"])
        .arg(&doc)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("broken.json"));
}

#[test]
fn test_simulate_recomputes_stale_states() {
    let home = TempDir::new().unwrap();
    let doc = cafe(&home);
    let mut raw: Value = serde_json::from_str(&std::fs::read_to_string(&doc).unwrap()).unwrap();
    for device in raw["devices"].as_array_mut().unwrap() {
        if device.get("connectionState").is_some() {
            device["connectionState"] = "disconnected".into();
        }
    }
    std::fs::write(&doc, serde_json::to_string(&raw).unwrap()).unwrap();

    netsandbox_cmd(home.path())
        .args(["simulate", "--write"])
        .arg(&doc)
        .assert()
        .success();
    let handheld = device_json(&home, &doc, "handheld-1");
    assert_eq!(handheld["connectionState"], "online");
}
