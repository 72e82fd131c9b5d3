// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency resolution.
//!
//! A job is claimable only once every id it depends on names an existing job
//! in `done`. Missing ids count as unmet rather than as errors: dependencies
//! may name jobs that have not been created yet. Cycles are not detected;
//! jobs in a cycle simply never become claimable.

use t4a_core::{Job, JobId, JobState};

/// Dependencies of `job` that are not yet `done`, in id order.
///
/// `state_of` looks up the current state of a job, `None` if it does not exist.
pub fn unmet_dependencies<'a>(
    job: &'a Job,
    state_of: impl Fn(&JobId) -> Option<JobState>,
) -> Vec<&'a JobId> {
    job.depends_on
        .iter()
        .filter(|dep| state_of(dep) != Some(JobState::Done))
        .collect()
}

/// True iff every dependency resolves to a `done` job.
pub fn satisfied(job: &Job, state_of: impl Fn(&JobId) -> Option<JobState>) -> bool {
    unmet_dependencies(job, state_of).is_empty()
}

#[cfg(test)]
#[path = "deps_tests.rs"]
mod tests;
