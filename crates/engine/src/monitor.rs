// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stall recovery.
//!
//! A running job whose last heartbeat is strictly older than the lease is
//! presumed abandoned. Each recovery counts one attempt; once a job has been
//! requeued `max_attempts` times the next stall fails it for good.

use std::time::Duration;

use serde::Serialize;
use t4a_core::{format_elapsed_ms, Clock, IdGen, JobId, JobState};
use t4a_storage::{JobStore, StoreError};
use tracing::{debug, info, warn};

use crate::error::QueueError;
use crate::queue::Queue;

/// Outcome of one recovery sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecoverReport {
    /// Stalled jobs returned to `pending`.
    pub requeued: Vec<JobId>,
    /// Stalled jobs that ran out of attempts and were failed.
    pub failed: Vec<JobId>,
}

impl RecoverReport {
    pub fn count(&self) -> usize {
        self.requeued.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

impl<S, C, G> Queue<S, C, G>
where
    S: JobStore,
    C: Clock,
    G: IdGen,
{
    /// Recover stalled jobs using the configured lease timeout.
    pub fn recover_stalled(&self) -> Result<RecoverReport, QueueError> {
        self.recover(self.config.lease_timeout)
    }

    /// Requeue or fail every running job silent for longer than `lease_timeout`.
    ///
    /// A job that changes between the scan and the write (its owner
    /// heartbeats, or it completes) is left alone.
    pub fn recover(&self, lease_timeout: Duration) -> Result<RecoverReport, QueueError> {
        let now = self.clock.epoch_ms();
        let lease_ms = u64::try_from(lease_timeout.as_millis()).unwrap_or(u64::MAX);
        let max_attempts = self.config.max_attempts;
        let stalled = self.store.list(&|j| j.is_stalled(now, lease_ms))?;

        let mut report = RecoverReport::default();
        for job in stalled {
            let attempts = job.attempt_count.saturating_add(1);
            let exhausted = attempts > max_attempts;
            let silent_for = job.lease_age_ms(now).unwrap_or_default();

            let result = self
                .store
                .compare_and_swap(job.id.as_str(), job.version, &mut |j| {
                    j.attempt_count = attempts;
                    j.release_lease();
                    j.updated_at_ms = now;
                    if exhausted {
                        j.state = JobState::Failed;
                        j.finished_at_ms = Some(now);
                        j.error = Some(format!("lease expired after {attempts} attempts"));
                    } else {
                        j.state = JobState::Pending;
                    }
                });

            match result {
                Ok(recovered) if exhausted => {
                    warn!(
                        job = %recovered.id,
                        owner = job.owner.as_deref().unwrap_or(""),
                        silent_for = %format_elapsed_ms(silent_for),
                        attempts,
                        "stalled job out of attempts, failed"
                    );
                    report.failed.push(recovered.id);
                }
                Ok(recovered) => {
                    warn!(
                        job = %recovered.id,
                        owner = job.owner.as_deref().unwrap_or(""),
                        silent_for = %format_elapsed_ms(silent_for),
                        attempts,
                        "stalled job requeued"
                    );
                    report.requeued.push(recovered.id);
                }
                Err(StoreError::Conflict { .. }) | Err(StoreError::NotFound(_)) => {
                    debug!(job = %job.id, "stalled job changed before recovery, skipping");
                }
                Err(e) => return Err(e.into()),
            }
        }

        if !report.is_empty() {
            info!(
                requeued = report.requeued.len(),
                failed = report.failed.len(),
                "recovery sweep finished"
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
