// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human sign-off gate.

use t4a_core::{ApprovalState, Clock, IdGen, Job};
use t4a_storage::JobStore;
use tracing::info;

use crate::error::QueueError;
use crate::queue::Queue;

impl<S, C, G> Queue<S, C, G>
where
    S: JobStore,
    C: Clock,
    G: IdGen,
{
    /// Record approval for a gated job.
    ///
    /// Approving a job that needs no approval, or one already approved, is a
    /// no-op that returns the job unchanged.
    pub fn approve(&self, id: &str) -> Result<Job, QueueError> {
        let current = self.store.get(id)?;
        if current.approval_state != ApprovalState::Pending {
            return Ok(current);
        }

        let now = self.clock.epoch_ms();
        let job = self
            .store
            .compare_and_swap(current.id.as_str(), current.version, &mut |j| {
                j.approval_state = ApprovalState::Approved;
                j.updated_at_ms = now;
            })?;
        info!(job = %job.id, "job approved");
        Ok(job)
    }
}

#[cfg(test)]
#[path = "approval_tests.rs"]
mod tests;
