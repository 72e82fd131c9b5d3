// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration, stall recovery and retention sweeps.

use crate::prelude::*;

#[test]
fn config_get_section() {
    let ws = Workspace::new();
    ws.t4a()
        .args(&["config", "get", "resources"])
        .passes()
        .stdout_has("api_concurrent");
}

#[test]
fn config_set_then_get() {
    let ws = Workspace::new();
    ws.t4a()
        .args(&["config", "set", "resources.api_concurrent", "5"])
        .passes();
    ws.t4a()
        .args(&["config", "get", "resources.api_concurrent"])
        .passes()
        .stdout_eq("5\n");
}

#[test]
fn config_get_unknown_key_fails() {
    let ws = Workspace::new();
    ws.t4a()
        .args(&["config", "get", "queue.nope"])
        .fails();
}

#[test]
fn config_set_rejects_bad_duration() {
    let ws = Workspace::new();
    ws.t4a()
        .args(&["config", "set", "queue.lease_timeout", "soon"])
        .fails();
    ws.t4a()
        .args(&["config", "get", "queue.lease_timeout"])
        .passes()
        .stdout_eq("30m\n");
}

#[test]
fn recover_with_nothing_stalled() {
    let ws = Workspace::new();
    ws.running("Fresh");
    ws.t4a()
        .args(&["recover"])
        .passes()
        .stdout_eq("Recovered 0 stalled job(s)\n");
}

#[test]
fn recover_requeues_silent_jobs() {
    let ws = Workspace::new();
    let id = ws.running("Quiet");
    std::thread::sleep(std::time::Duration::from_millis(1100));

    ws.t4a()
        .args(&["recover", "--lease-timeout", "1s"])
        .passes()
        .stdout_has("Recovered 1 stalled job(s)");

    let status = ws.status(&id);
    assert!(status.contains("Status: pending"), "got:\n{status}");
    assert!(status.contains("Attempts: 1"), "got:\n{status}");
}

#[test]
fn gc_with_nothing_old() {
    let ws = Workspace::new();
    ws.add("Pending", &[]);
    ws.t4a()
        .args(&["gc", "--older-than", "1"])
        .passes()
        .stdout_eq("Removed 0 old job(s)\n");
}

#[test]
fn gc_removes_finished_jobs_only() {
    let ws = Workspace::new();
    let done = ws.running("Finished");
    ws.t4a().args(&["complete", &done]).passes();
    let waiting = ws.add("Waiting", &[]);
    std::thread::sleep(std::time::Duration::from_millis(1100));

    ws.t4a()
        .args(&["gc", "--older-than", "1s", "--dry-run"])
        .passes()
        .stdout_eq(&format!("Would remove 1 old job(s)\n  {done}\n"));
    ws.t4a()
        .args(&["gc", "--older-than", "1s"])
        .passes()
        .stdout_eq("Removed 1 old job(s)\n");

    ws.t4a().args(&["status", &done]).fails();
    ws.t4a().args(&["status", &waiting]).passes();
}

#[test]
fn state_lives_under_t4a_dir() {
    let ws = Workspace::new();
    ws.add("Persisted", &[]);
    assert!(ws.path().join("t4a.log").exists());
    ws.t4a()
        .args(&["list"])
        .passes()
        .stdout_has("Persisted");
}
