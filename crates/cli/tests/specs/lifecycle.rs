// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Claiming and driving a job to a terminal state.

use crate::prelude::*;

#[test]
fn claim_prints_the_id_and_starts_the_job() {
    let ws = Workspace::new();
    let id = ws.add("Test", &[]);
    ws.t4a()
        .args(&["claim", &id])
        .passes()
        .stdout_eq(&format!("{id}\n"));
    assert!(ws.status(&id).contains("Status: running"));
}

#[test]
fn claim_records_the_owner() {
    let ws = Workspace::new();
    let id = ws.add("Test", &[]);
    ws.t4a()
        .args(&["claim", &id])
        .env("T4A_OWNER", "agent-7")
        .passes();
    assert!(ws.status(&id).contains("Owner: agent-7"));
}

#[test]
fn claim_twice_fails() {
    let ws = Workspace::new();
    let id = ws.running("Test");
    ws.t4a()
        .args(&["claim", &id])
        .fails()
        .stderr_has("is running");
}

#[test]
fn claim_without_id_takes_the_head() {
    let ws = Workspace::new();
    ws.add("Low", &["--priority", "10"]);
    let high = ws.add("High", &["--priority", "90"]);
    ws.t4a()
        .args(&["claim"])
        .passes()
        .stdout_eq(&format!("{high}\n"));
}

#[test]
fn claim_without_id_on_empty_queue() {
    let ws = Workspace::new();
    ws.t4a()
        .args(&["claim"])
        .fails()
        .stderr_has("no claimable jobs");
}

#[test]
fn complete_marks_done() {
    let ws = Workspace::new();
    let id = ws.running("Test");
    ws.t4a()
        .args(&["complete", &id, "--summary", "Done!"])
        .passes();
    let status = ws.status(&id);
    assert!(status.contains("Status: done"));
    assert!(status.contains("Summary: Done!"));
}

#[test]
fn fail_marks_failed() {
    let ws = Workspace::new();
    let id = ws.running("Test");
    ws.t4a()
        .args(&["fail", &id, "--error", "Something went wrong"])
        .passes();
    let status = ws.status(&id);
    assert!(status.contains("Status: failed"));
    assert!(status.contains("Error: Something went wrong"));
}

#[test]
fn pause_then_claim_again() {
    let ws = Workspace::new();
    let id = ws.running("Test");
    ws.t4a().args(&["pause", &id]).passes();
    assert!(ws.status(&id).contains("Status: paused"));

    ws.t4a().args(&["claim", &id]).passes();
    assert!(ws.status(&id).contains("Status: running"));
}

#[test]
fn complete_requires_running() {
    let ws = Workspace::new();
    let id = ws.add("Test", &[]);
    ws.t4a()
        .args(&["complete", &id])
        .fails()
        .stderr_has("cannot complete job");
}

#[test]
fn finished_jobs_stay_finished() {
    let ws = Workspace::new();
    let id = ws.running("Test");
    ws.t4a().args(&["complete", &id]).passes();
    ws.t4a().args(&["claim", &id]).fails().stderr_has("is done");
    ws.t4a().args(&["priority", &id, "90"]).fails();
}

#[test]
fn priority_can_be_changed() {
    let ws = Workspace::new();
    let id = ws.add("Test", &[]);
    ws.t4a().args(&["priority", &id, "99"]).passes();
    assert!(ws.status(&id).contains("Priority: 99"));

    ws.t4a()
        .args(&["priority", &id, "150"])
        .fails()
        .stderr_has("invalid priority 150");
}

#[test]
fn progress_round_trips() {
    let ws = Workspace::new();
    let id = ws.running("Test");
    ws.t4a()
        .args(&["progress", &id, "50", "--message", "Halfway"])
        .passes();
    assert!(ws.status(&id).contains("Progress: 50% - Halfway"));
}

#[test]
fn progress_out_of_range_is_rejected() {
    let ws = Workspace::new();
    let id = ws.running("Test");
    ws.t4a()
        .args(&["progress", &id, "120"])
        .fails()
        .stderr_has("invalid progress 120");
}

#[test]
fn checkpoints_are_listed_in_order() {
    let ws = Workspace::new();
    let id = ws.running("Test");
    ws.t4a()
        .args(&["checkpoint", &id, "--message", "Save point"])
        .passes();
    ws.t4a()
        .args(&["checkpoint", &id, "--message", "Second"])
        .passes();

    let status = ws.status(&id);
    let first = status.find("Save point").unwrap();
    let second = status.find("Second").unwrap();
    assert!(first < second, "got:\n{status}");
}

#[test]
fn checkpoint_requires_running() {
    let ws = Workspace::new();
    let id = ws.add("Test", &[]);
    ws.t4a()
        .args(&["checkpoint", &id, "--message", "Too early"])
        .fails()
        .stderr_has("cannot checkpoint job");
}
