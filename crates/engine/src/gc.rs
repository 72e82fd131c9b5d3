// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retention sweep for finished jobs.

use std::time::Duration;

use serde::Serialize;
use t4a_core::{Clock, IdGen, Job, JobId};
use t4a_storage::{JobStore, StoreError};
use tracing::{debug, info};

use crate::error::QueueError;
use crate::queue::Queue;

/// Outcome of a retention sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectReport {
    /// Jobs deleted, or that would be deleted in a dry run.
    pub removed: Vec<JobId>,
    pub dry_run: bool,
}

impl CollectReport {
    pub fn count(&self) -> usize {
        self.removed.len()
    }
}

/// A terminal job whose finish time is strictly older than the cutoff.
fn is_expired(job: &Job, now_ms: u64, older_than_ms: u64) -> bool {
    if !job.is_terminal() {
        return false;
    }
    let finished = job.finished_at_ms.unwrap_or(job.updated_at_ms);
    now_ms.saturating_sub(finished) > older_than_ms
}

impl<S, C, G> Queue<S, C, G>
where
    S: JobStore,
    C: Clock,
    G: IdGen,
{
    /// Delete terminal jobs finished more than `older_than` ago.
    pub fn collect(&self, older_than: Duration) -> Result<CollectReport, QueueError> {
        self.sweep(older_than, false)
    }

    /// Report what [`Queue::collect`] would delete without deleting.
    pub fn collect_dry_run(&self, older_than: Duration) -> Result<CollectReport, QueueError> {
        self.sweep(older_than, true)
    }

    fn sweep(&self, older_than: Duration, dry_run: bool) -> Result<CollectReport, QueueError> {
        let now = self.clock.epoch_ms();
        let older_than_ms = u64::try_from(older_than.as_millis()).unwrap_or(u64::MAX);
        let expired = self.store.list(&|j| is_expired(j, now, older_than_ms))?;

        let mut report = CollectReport {
            removed: Vec::new(),
            dry_run,
        };
        for job in expired {
            if dry_run {
                report.removed.push(job.id);
                continue;
            }
            match self.store.delete(job.id.as_str(), job.version) {
                Ok(deleted) => report.removed.push(deleted.id),
                Err(StoreError::Conflict { .. }) | Err(StoreError::NotFound(_)) => {
                    debug!(job = %job.id, "job changed before collection, skipping");
                }
                Err(e) => return Err(e.into()),
            }
        }

        if !dry_run && report.count() > 0 {
            info!(removed = report.count(), "retention sweep removed jobs");
        }
        Ok(report)
    }
}

#[cfg(test)]
#[path = "gc_tests.rs"]
mod tests;
