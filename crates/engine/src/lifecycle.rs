// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Owner-side operations on a running job: progress, checkpoints and the
//! three exits out of `running`.

use t4a_core::{Checkpoint, Clock, IdGen, Job, JobState, Progress};
use t4a_storage::JobStore;
use tracing::{debug, info};

use crate::error::QueueError;
use crate::queue::Queue;

fn is_running(job: &Job) -> bool {
    job.state == JobState::Running
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

impl<S, C, G> Queue<S, C, G>
where
    S: JobStore,
    C: Clock,
    G: IdGen,
{
    /// Record percent complete and an optional message; refreshes the lease.
    pub fn progress(
        &self,
        id: &str,
        percent: i64,
        message: Option<&str>,
    ) -> Result<Job, QueueError> {
        let percent = u8::try_from(percent)
            .ok()
            .filter(|p| *p <= 100)
            .ok_or(QueueError::InvalidProgress(percent))?;
        let message = non_empty(message);

        let job = self.guarded_update(id, "report progress on", is_running, |j, now| {
            j.progress = Some(Progress {
                percent,
                message: message.clone(),
                reported_at_ms: now,
            });
            j.last_heartbeat_at_ms = Some(now);
        })?;
        debug!(job = %job.id, percent, "progress reported");
        Ok(job)
    }

    /// Append a timestamped checkpoint note; refreshes the lease.
    pub fn checkpoint(&self, id: &str, message: &str) -> Result<Job, QueueError> {
        let message = message.to_string();
        let job = self.guarded_update(id, "checkpoint", is_running, |j, now| {
            j.checkpoints.push(Checkpoint {
                at_ms: now,
                message: message.clone(),
            });
            j.last_heartbeat_at_ms = Some(now);
        })?;
        debug!(job = %job.id, checkpoints = job.checkpoints.len(), "checkpoint recorded");
        Ok(job)
    }

    pub fn complete(&self, id: &str, summary: Option<&str>) -> Result<Job, QueueError> {
        let summary = non_empty(summary);
        let job = self.guarded_update(id, "complete", is_running, |j, now| {
            j.state = JobState::Done;
            j.summary = summary.clone();
            j.finished_at_ms = Some(now);
            j.release_lease();
        })?;
        info!(job = %job.id, "job completed");
        Ok(job)
    }

    pub fn fail(&self, id: &str, error: Option<&str>) -> Result<Job, QueueError> {
        let error = non_empty(error);
        let job = self.guarded_update(id, "fail", is_running, |j, now| {
            j.state = JobState::Failed;
            j.error = error.clone();
            j.finished_at_ms = Some(now);
            j.release_lease();
        })?;
        info!(job = %job.id, error = job.error.as_deref().unwrap_or(""), "job failed");
        Ok(job)
    }

    /// Release a running job back to the queue as `paused`.
    pub fn pause(&self, id: &str) -> Result<Job, QueueError> {
        let job = self.guarded_update(id, "pause", is_running, |j, _| {
            j.state = JobState::Paused;
            j.release_lease();
        })?;
        info!(job = %job.id, "job paused");
        Ok(job)
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
