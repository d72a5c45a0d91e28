//! Integration tests for the `dp` CLI.
//!
//! Each test creates a temp data directory, runs `dp` as a subprocess
//! pinned to 2026-01-24, and verifies stdout and/or file contents.

use std::fs;
use std::path::Path;
use std::process::Command;

use pretty_assertions::assert_eq;

const DATE: &str = "2026-01-24";

/// Run `dp` against `dir`, returning (stdout, stderr, success).
fn run_dp(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_dp"))
        .arg("-D")
        .arg(dir)
        .args(["--date", DATE])
        .args(args)
        .env_remove("DAYPLAN_LOG")
        .output()
        .expect("failed to run dp");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `dp` expecting success, return stdout.
fn run_dp_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_dp(dir, args);
    if !success {
        panic!(
            "dp {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Add a subject and a todo, returning their ids
fn seed(dir: &Path) -> (String, String) {
    let subject = run_dp_ok(dir, &["subject", "add", "Math"]).trim().to_string();
    let todo = run_dp_ok(dir, &["todo", "add", "Math", "Chapter 1"])
        .trim()
        .to_string();
    (subject, todo)
}

fn read_day(dir: &Path) -> serde_json::Value {
    let text = fs::read_to_string(dir.join(format!("daily-planner-{}.json", DATE))).unwrap();
    serde_json::from_str(&text).unwrap()
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn test_show_empty_day() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_dp_ok(tmp.path(), &["show"]);
    assert_eq!(out, "== 2026년 1월 24일 (토) ==\n\nstudy: 0m\n");
}

#[test]
fn test_show_json_is_the_aggregate() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_dp_ok(tmp.path(), &["show", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["dailyInfo"]["date"], DATE);
    assert_eq!(parsed["dailyInfo"]["dday"], serde_json::Value::Null);
    assert!(parsed["subjects"].as_array().unwrap().is_empty());
    assert!(parsed["timelineBlocks"].as_array().unwrap().is_empty());
}

#[test]
fn test_dates_lists_stored_days() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path());
    let out = run_dp_ok(tmp.path(), &["dates"]);
    assert_eq!(out.trim(), DATE);
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

#[test]
fn test_subject_and_todo_add() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (subject, todo) = seed(tmp.path());

    let day = read_day(tmp.path());
    assert_eq!(day["subjects"][0]["id"], subject.as_str());
    assert_eq!(day["subjects"][0]["color"], "#86EFAC");
    assert_eq!(day["todos"][0]["id"], todo.as_str());
    assert_eq!(day["todos"][0]["subjectId"], subject.as_str());
    assert_eq!(day["todos"][0]["isCompleted"], false);

    let out = run_dp_ok(tmp.path(), &["show"]);
    assert!(out.contains("[Math]"));
    assert!(out.contains("Chapter 1"));
}

#[test]
fn test_todo_toggle_by_prefix() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, todo) = seed(tmp.path());
    let out = run_dp_ok(tmp.path(), &["todo", "toggle", &todo[..8]]);
    assert_eq!(out.trim(), "done");
    assert_eq!(read_day(tmp.path())["todos"][0]["isCompleted"], true);
    let out = run_dp_ok(tmp.path(), &["todo", "toggle", &todo]);
    assert_eq!(out.trim(), "open");
}

#[test]
fn test_block_add_uses_drop_placement() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (subject, todo) = seed(tmp.path());
    let out = run_dp_ok(
        tmp.path(),
        &["block", "add", &todo, "--kind", "done", "--hour", "9", "--json"],
    );
    let block: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(block["type"], "done");
    assert_eq!(block["startTime"], 540);
    assert_eq!(block["endTime"], 600);
    assert_eq!(block["cellStart"], 1);
    assert_eq!(block["cellSpan"], 4);
    assert_eq!(block["todoId"], todo.as_str());
    assert_eq!(block["subjectId"], subject.as_str());

    let stats = run_dp_ok(tmp.path(), &["stats", "--json"]);
    let stats: serde_json::Value = serde_json::from_str(&stats).unwrap();
    assert_eq!(stats["study_minutes"], 60);
    assert_eq!(stats["planned_minutes"], 0);
}

#[test]
fn test_block_resize_and_rm() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, todo) = seed(tmp.path());
    let id = run_dp_ok(tmp.path(), &["block", "add", &todo, "--hour", "10"])
        .trim()
        .to_string();
    run_dp_ok(tmp.path(), &["block", "resize", &id, "--start", "0", "--span", "6"]);
    let day = read_day(tmp.path());
    assert_eq!(day["timelineBlocks"][0]["cellStart"], 0);
    assert_eq!(day["timelineBlocks"][0]["cellSpan"], 6);

    run_dp_ok(tmp.path(), &["block", "rm", &id]);
    assert!(read_day(tmp.path())["timelineBlocks"]
        .as_array()
        .unwrap()
        .is_empty());
}

#[test]
fn test_subject_rm_cascades() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, todo) = seed(tmp.path());
    run_dp_ok(tmp.path(), &["block", "add", &todo, "--hour", "9"]);
    run_dp_ok(tmp.path(), &["subject", "rm", "Math"]);
    let day = read_day(tmp.path());
    assert!(day["subjects"].as_array().unwrap().is_empty());
    assert!(day["todos"].as_array().unwrap().is_empty());
    assert!(day["timelineBlocks"].as_array().unwrap().is_empty());
}

#[test]
fn test_dday_and_quote() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_dp_ok(tmp.path(), &["dday", "set", "final exam", "2026-02-02"]);
    run_dp_ok(tmp.path(), &["quote", "one page at a time"]);
    let out = run_dp_ok(tmp.path(), &["show"]);
    assert!(out.contains("D-9 final exam (2026-02-02)"));
    assert!(out.contains("\"one page at a time\""));

    run_dp_ok(tmp.path(), &["dday", "clear"]);
    assert_eq!(read_day(tmp.path())["dailyInfo"]["dday"], serde_json::Value::Null);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn test_unknown_todo_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, _, success) = run_dp(tmp.path(), &["todo", "toggle", "nope-nope"]);
    assert!(!success);
}

#[test]
fn test_bad_date_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_dp"))
        .arg("-D")
        .arg(tmp.path())
        .args(["--date", "24/01/2026", "show"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: invalid date"));
}

#[test]
fn test_bad_hour_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, todo) = seed(tmp.path());
    let (_, stderr, success) = run_dp(tmp.path(), &["block", "add", &todo, "--hour", "24"]);
    assert!(!success);
    assert!(stderr.contains("hour must be 0-23"));
}

#[test]
fn test_resize_span_past_row_end_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, todo) = seed(tmp.path());
    let id = run_dp_ok(tmp.path(), &["block", "add", &todo, "--hour", "10"])
        .trim()
        .to_string();
    for (start, span) in [("5", "255"), ("2", "5"), ("6", "1")] {
        let (_, stderr, success) = run_dp(
            tmp.path(),
            &["block", "resize", &id, "--start", start, "--span", span],
        );
        assert!(!success);
        assert!(stderr.contains("error: lanes"), "stderr: {}", stderr);
        assert!(!stderr.contains("panicked"));
    }
    let day = read_day(tmp.path());
    assert_eq!(day["timelineBlocks"][0]["cellStart"], 1);
    assert_eq!(day["timelineBlocks"][0]["cellSpan"], 4);
}
