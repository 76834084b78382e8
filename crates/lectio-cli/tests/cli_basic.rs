//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against the dev data
//! directory and verify outputs.

use std::process::Command;

/// Run a CLI command and return output.
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "lectio-cli", "--"])
        .args(args)
        .env("LECTIO_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_catalog_list() {
    let (stdout, _stderr, code) = run_cli(&["catalog", "list"]);
    assert_eq!(code, 0, "Catalog list failed");
    assert!(stdout.contains("João"));
    assert!(stdout.contains("66 books, 1189 chapters"));
}

#[test]
fn test_catalog_list_json() {
    let (stdout, _stderr, code) = run_cli(&["catalog", "list", "--json"]);
    assert_eq!(code, 0, "Catalog list JSON failed");
    let books: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(books.as_array().unwrap().len(), 66);
}

#[test]
fn test_plan_list() {
    let (stdout, _stderr, code) = run_cli(&["plan", "list"]);
    assert_eq!(code, 0, "Plan list failed");
    assert!(stdout.contains("Evangelhos em 30 dias"));
}

#[test]
fn test_plan_show() {
    let (stdout, _stderr, code) = run_cli(&["plan", "show", "evangelhos-30"]);
    assert_eq!(code, 0, "Plan show failed");
    assert!(stdout.contains("30 days"));
}

#[test]
fn test_plan_start_and_progress() {
    let (_stdout, _stderr, code) =
        run_cli(&["plan", "start", "evangelhos-30", "--user", "cli-test"]);
    assert_eq!(code, 0, "Plan start failed");

    let (stdout, _stderr, code) = run_cli(&[
        "plan",
        "progress",
        "evangelhos-30",
        "--user",
        "cli-test",
        "--json",
    ]);
    assert_eq!(code, 0, "Plan progress failed");
    let progress: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(progress["schedule_len"], 89);
}

#[test]
fn test_read_updates_streak() {
    let user = "cli-read-test";
    let (_stdout, _stderr, code) =
        run_cli(&["plan", "start", "evangelhos-30", "--user", user]);
    assert_eq!(code, 0);

    let (stdout, _stderr, code) = run_cli(&["read", "João", "1", "--user", user, "--json"]);
    assert_eq!(code, 0, "Read failed");
    let outcome: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert!(outcome["streak"].as_u64().unwrap() >= 1);
}

#[test]
fn test_read_unknown_book_fails() {
    let (_stdout, stderr, code) = run_cli(&["read", "Atlântida", "1"]);
    assert_ne!(code, 0, "Unknown book unexpectedly succeeded");
    assert!(stderr.contains("Unknown book"));
}

#[test]
fn test_streak_show() {
    let (_stdout, _stderr, code) = run_cli(&["streak", "show", "--user", "nobody-yet"]);
    assert_eq!(code, 0, "Streak show failed");
}

#[test]
fn test_config_get_set() {
    let (_stdout, _stderr, code) = run_cli(&["config", "set", "time.utc_offset_minutes", "0"]);
    assert_eq!(code, 0, "Config set failed");

    let (stdout, _stderr, code) = run_cli(&["config", "get", "time.utc_offset_minutes"]);
    assert_eq!(code, 0, "Config get failed");
    assert_eq!(stdout.trim(), "0");
}

#[test]
fn test_room_create_and_status() {
    let (stdout, _stderr, code) = run_cli(&[
        "room",
        "create",
        "Sala E2E",
        "Rute",
        "--start-date",
        "2025-01-01",
    ]);
    assert_eq!(code, 0, "Room create failed");
    let id = stdout
        .rsplit("id ")
        .next()
        .map(str::trim)
        .expect("room id in output");

    let (stdout, _stderr, code) = run_cli(&["room", "status", id]);
    assert_eq!(code, 0, "Room status failed");
    assert!(stdout.contains("chapter 4 of 4 unlocked"));
}
