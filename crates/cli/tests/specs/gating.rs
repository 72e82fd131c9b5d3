// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Approval and dependency gates on claiming.

use crate::prelude::*;

#[test]
fn unapproved_job_cannot_be_claimed() {
    let ws = Workspace::new();
    let id = ws.add("Test", &["--requires-approval"]);
    ws.t4a()
        .args(&["claim", &id])
        .fails()
        .stderr_has("requires approval");
}

#[test]
fn approved_job_can_be_claimed() {
    let ws = Workspace::new();
    let id = ws.add("Test", &["--requires-approval"]);
    ws.t4a().args(&["approve", &id]).passes();
    ws.t4a()
        .args(&["claim", &id])
        .passes()
        .stdout_eq(&format!("{id}\n"));
}

#[test]
fn approval_state_shows_in_status() {
    let ws = Workspace::new();
    let id = ws.add("Test", &["--requires-approval"]);
    assert!(ws.status(&id).contains("Approval: PENDING"));
    ws.t4a().args(&["approve", &id]).passes();
    assert!(ws.status(&id).contains("Approval: APPROVED"));
}

#[test]
fn claim_next_skips_gated_jobs() {
    let ws = Workspace::new();
    ws.add("Gated", &["--priority", "90", "--requires-approval"]);
    let open = ws.add("Open", &["--priority", "10"]);
    ws.t4a()
        .args(&["claim"])
        .passes()
        .stdout_eq(&format!("{open}\n"));
}

#[test]
fn unmet_dependency_blocks_claim() {
    let ws = Workspace::new();
    let dep = ws.add("Dependency", &[]);
    let id = ws.add("Main", &["--depends-on", &dep]);
    ws.t4a()
        .args(&["claim", &id])
        .fails()
        .stderr_has(&format!("unmet dependencies: {dep}"));
}

#[test]
fn finished_dependency_releases_claim() {
    let ws = Workspace::new();
    let dep = ws.running("Dependency");
    ws.t4a().args(&["complete", &dep]).passes();
    let id = ws.add("Main", &["--depends-on", &dep]);
    ws.t4a()
        .args(&["claim", &id])
        .passes()
        .stdout_eq(&format!("{id}\n"));
}

#[test]
fn failed_dependency_keeps_blocking() {
    let ws = Workspace::new();
    let dep = ws.running("Dependency");
    ws.t4a().args(&["fail", &dep]).passes();
    let id = ws.add("Main", &["--depends-on", &dep]);
    ws.t4a().args(&["claim", &id]).fails();
}

#[test]
fn resource_caps_apply_when_enforced() {
    let ws = Workspace::new();
    ws.t4a()
        .args(&["config", "set", "admission.enforce_resource_caps", "true"])
        .passes();
    let first = ws.add("Train A", &["--gpu", "1"]);
    let second = ws.add("Train B", &["--gpu", "1"]);
    ws.t4a().args(&["claim", &first]).passes();
    ws.t4a()
        .args(&["claim", &second])
        .fails()
        .stderr_has("gpu cap is 1");
}

#[test]
fn overriding_one_cap_keeps_default_gpu_cap() {
    let ws = Workspace::new();
    ws.t4a()
        .args(&["config", "set", "admission.enforce_resource_caps", "true"])
        .passes();
    ws.t4a()
        .args(&["config", "set", "resources.api_concurrent", "5"])
        .passes();
    let first = ws.add("Train A", &["--gpu", "1"]);
    let second = ws.add("Train B", &["--gpu", "1"]);
    ws.t4a().args(&["claim", &first]).passes();
    ws.t4a()
        .args(&["claim", &second])
        .fails()
        .stderr_has("gpu cap is 1");
}
