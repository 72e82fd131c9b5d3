// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn pending_job(spec: JobSpec) -> Job {
    Job::new(JobId::new("job-00000001"), spec, DEFAULT_PRIORITY, 1_000)
}

#[test]
fn job_id_serde() {
    let id = JobId::new("job-0000beef");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"job-0000beef\"");

    let parsed: JobId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn spec_builder_defaults() {
    let spec = JobSpec::builder("Write docs").build();
    assert_eq!(spec.title, "Write docs");
    assert_eq!(spec.priority, 50);
    assert!(spec.resource_tags.is_empty());
    assert!(!spec.requires_approval);
    assert!(spec.depends_on.is_empty());
}

#[test]
fn spec_builder_collects_dependencies_as_a_set() {
    let spec = JobSpec::builder("Main")
        .depends_on("job-00000002")
        .depends_on("job-00000002")
        .depends_on("job-00000001")
        .build();
    let deps: Vec<&str> = spec.depends_on.iter().map(|id| id.as_str()).collect();
    assert_eq!(deps, vec!["job-00000001", "job-00000002"]);
}

#[test]
fn spec_builder_drops_zero_resources() {
    let spec = JobSpec::builder("GPU task")
        .resource("gpu", 2)
        .resource("api", 0)
        .build();
    assert_eq!(spec.resource_tags.get("gpu"), Some(&2));
    assert!(!spec.resource_tags.contains_key("api"));
}

#[test]
fn new_job_starts_pending() {
    let job = pending_job(JobSpec::builder("Test").build());

    assert_eq!(job.state, JobState::Pending);
    assert_eq!(job.approval_state, ApprovalState::None);
    assert_eq!(job.created_at_ms, 1_000);
    assert_eq!(job.updated_at_ms, 1_000);
    assert_eq!(job.attempt_count, 0);
    assert_eq!(job.version, 0);
    assert!(job.owner.is_none());
    assert!(job.checkpoints.is_empty());
    assert!(!job.needs_approval());
}

#[test]
fn job_requiring_approval_starts_gated() {
    let job = pending_job(JobSpec::builder("Sensitive").requires_approval(true).build());
    assert_eq!(job.approval_state, ApprovalState::Pending);
    assert!(job.needs_approval());

    let mut approved = job.clone();
    approved.approval_state = ApprovalState::Approved;
    assert!(!approved.needs_approval());
}

#[test]
fn stall_detection_is_strictly_greater_than_lease() {
    let mut job = pending_job(JobSpec::builder("Test").build());
    job.state = JobState::Running;
    job.last_heartbeat_at_ms = Some(10_000);

    assert!(!job.is_stalled(15_000, 5_000));
    assert!(job.is_stalled(15_001, 5_000));
}

#[test]
fn only_running_jobs_stall() {
    let mut job = pending_job(JobSpec::builder("Test").build());
    job.last_heartbeat_at_ms = Some(0);
    job.state = JobState::Paused;
    assert!(!job.is_stalled(u64::MAX, 1));
}

#[test]
fn release_lease_clears_owner_fields() {
    let mut job = pending_job(JobSpec::builder("Test").build());
    job.owner = Some("agent-1".to_string());
    job.claimed_at_ms = Some(1);
    job.last_heartbeat_at_ms = Some(2);

    job.release_lease();

    assert!(job.owner.is_none());
    assert!(job.claimed_at_ms.is_none());
    assert!(job.last_heartbeat_at_ms.is_none());
}

#[test]
fn job_serde_roundtrip_omits_empty_fields() {
    let job = pending_job(JobSpec::builder("Test").build());
    let json = serde_json::to_value(&job).unwrap();

    assert_eq!(json["state"], "pending");
    assert!(json.get("owner").is_none());
    assert!(json.get("depends_on").is_none());

    let back: Job = serde_json::from_value(json).unwrap();
    assert_eq!(back, job);
}
