// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use t4a_core::JobSpec;

use crate::test_helpers::setup;
use crate::QueueError;

use super::*;

#[test]
fn approve_flips_pending_to_approved() {
    let ctx = setup();
    let job = ctx.add_spec(JobSpec::builder("deploy").requires_approval(true).build());

    let approved = ctx.queue.approve(job.id.as_str()).unwrap();

    assert_eq!(approved.approval_state, ApprovalState::Approved);
    assert!(!approved.needs_approval());
    assert_eq!(approved.version, job.version + 1);
}

#[test]
fn approve_twice_is_a_no_op() {
    let ctx = setup();
    let job = ctx.add_spec(JobSpec::builder("deploy").requires_approval(true).build());
    let first = ctx.queue.approve(job.id.as_str()).unwrap();

    let second = ctx.queue.approve(job.id.as_str()).unwrap();

    assert_eq!(second.version, first.version);
}

#[test]
fn approving_ungated_job_changes_nothing() {
    let ctx = setup();
    let job = ctx.add("plain");

    let after = ctx.queue.approve(job.id.as_str()).unwrap();

    assert_eq!(after.approval_state, ApprovalState::None);
    assert_eq!(after.version, job.version);
}

#[test]
fn approve_unknown_job_is_not_found() {
    let ctx = setup();
    let err = ctx.queue.approve("job-00c0ffee").unwrap_err();
    assert!(matches!(err, QueueError::NotFound(_)));
}
