// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Creating, listing and inspecting jobs.

use crate::prelude::*;

fn is_canonical_id(s: &str) -> bool {
    s.len() == 12
        && s.starts_with("job-")
        && s[4..]
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

#[test]
fn add_prints_a_fresh_id() {
    let ws = Workspace::new();
    let out = ws.t4a().args(&["add", "Test prompt"]).passes().stdout();
    let id = out.trim();
    assert!(is_canonical_id(id), "unexpected id: {id}");
}

#[test]
fn add_mentions_resources_and_approval() {
    let ws = Workspace::new();
    ws.t4a()
        .args(&["add", "GPU task", "--gpu", "2"])
        .passes()
        .stdout_has("(gpu: 2)");
    ws.t4a()
        .args(&["add", "Sensitive", "--requires-approval"])
        .passes()
        .stdout_has("[needs approval]");
}

#[test]
fn add_rejects_out_of_range_priority() {
    let ws = Workspace::new();
    ws.t4a()
        .args(&["add", "Too hot", "--priority", "101"])
        .fails()
        .stderr_has("invalid priority 101");
    ws.t4a()
        .args(&["add", "Too cold", "--priority", "-1"])
        .fails()
        .stderr_has("invalid priority -1");
}

#[test]
fn add_priority_shows_in_status() {
    let ws = Workspace::new();
    let id = ws.add("Test", &["--priority", "80"]);
    assert!(ws.status(&id).contains("Priority: 80"));
}

#[test]
fn list_shows_every_pending_job() {
    let ws = Workspace::new();
    ws.add("Job 1", &[]);
    ws.add("Job 2", &[]);
    ws.t4a()
        .args(&["list"])
        .passes()
        .stdout_has("Job 1")
        .stdout_has("Job 2");
}

#[test]
fn list_on_empty_queue() {
    let ws = Workspace::new();
    ws.t4a().args(&["list"]).passes().stdout_eq("No jobs\n");
}

#[test]
fn list_orders_by_priority() {
    let ws = Workspace::new();
    ws.add("Low", &["--priority", "10"]);
    ws.add("High", &["--priority", "90"]);
    ws.add("Medium", &["--priority", "50"]);

    let out = ws.t4a().args(&["list"]).passes().stdout();
    let lines: Vec<&str> = out.lines().collect();

    assert!(lines[0].contains("High"), "got:\n{out}");
    assert!(lines[1].contains("Medium"), "got:\n{out}");
    assert!(lines[2].contains("Low"), "got:\n{out}");
}

#[test]
fn list_hides_finished_jobs_unless_asked() {
    let ws = Workspace::new();
    let id = ws.running("Shipped");
    ws.t4a().args(&["complete", &id]).passes();
    ws.add("Waiting", &[]);

    ws.t4a()
        .args(&["list"])
        .passes()
        .stdout_has("Waiting")
        .stdout_lacks("Shipped");
    ws.t4a()
        .args(&["list", "--all"])
        .passes()
        .stdout_has("Shipped");
    ws.t4a()
        .args(&["list", "--state", "done"])
        .passes()
        .stdout_has("Shipped")
        .stdout_lacks("Waiting");
}

#[test]
fn list_json_is_an_array() {
    let ws = Workspace::new();
    ws.add("Only", &[]);
    let out = ws.t4a().args(&["list", "-o", "json"]).passes().stdout();
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(1));
    assert_eq!(parsed[0]["title"], "Only");
}

#[test]
fn status_summarizes_the_queue() {
    let ws = Workspace::new();
    ws.add("Job 1", &[]);
    ws.add("Job 2", &[]);
    ws.t4a()
        .args(&["status"])
        .passes()
        .stdout_has("Queue: 2 pending, 0 running");
}

#[test]
fn status_of_one_job() {
    let ws = Workspace::new();
    let id = ws.add("My test job", &[]);
    let out = ws.status(&id);
    assert!(out.contains(&id));
    assert!(out.contains("Title: My test job"));
    assert!(out.contains("Status: pending"));
}

#[test]
fn ids_resolve_by_unique_prefix() {
    let ws = Workspace::new();
    let id = ws.add("Prefixed", &[]);
    ws.t4a()
        .args(&["status", &id[..8]])
        .passes()
        .stdout_has("Title: Prefixed");
}

#[test]
fn unknown_id_is_an_error() {
    let ws = Workspace::new();
    ws.t4a()
        .args(&["status", "job-ffffffff"])
        .fails()
        .stderr_has("Error: job not found: job-ffffffff");
}

#[test]
fn logs_start_empty_and_accumulate() {
    let ws = Workspace::new();
    let id = ws.add("Test", &[]);
    ws.t4a().args(&["logs", &id]).passes().stdout_eq("");

    ws.t4a().args(&["log", &id, "fetched", "inputs"]).passes();
    ws.t4a().args(&["log", &id, "second"]).passes();

    ws.t4a()
        .args(&["logs", &id])
        .passes()
        .stdout_eq("fetched inputs\nsecond\n");
}
