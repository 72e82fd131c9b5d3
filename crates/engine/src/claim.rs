// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Claiming: the only path into `running`.
//!
//! A claim re-reads the job, re-checks every precondition, and writes with a
//! version check. Losing the write to another claimant restarts the loop
//! from the read, so a job that was claimed away surfaces as
//! `NotEligibleState` on the next pass.

use t4a_core::{Clock, IdGen, Job, JobState};
use t4a_storage::{JobStore, StoreError};
use tracing::{debug, info};

use crate::deps::unmet_dependencies;
use crate::error::QueueError;
use crate::queue::Queue;

impl<S, C, G> Queue<S, C, G>
where
    S: JobStore,
    C: Clock,
    G: IdGen,
{
    /// Move a specific job to `running` on behalf of `owner`.
    pub fn claim(&self, id: &str, owner: &str) -> Result<Job, QueueError> {
        let attempts = self.config.claim_retries.max(1);
        let mut job = self.store.get(id)?;

        for attempt in 1..=attempts {
            self.check_claimable(&job)?;

            let now = self.clock.epoch_ms();
            let result = self
                .store
                .compare_and_swap(job.id.as_str(), job.version, &mut |j| {
                    j.state = JobState::Running;
                    j.owner = Some(owner.to_string());
                    j.claimed_at_ms = Some(now);
                    j.last_heartbeat_at_ms = Some(now);
                    j.updated_at_ms = now;
                });

            match result {
                Ok(claimed) => {
                    info!(job = %claimed.id, owner, attempt, "job claimed");
                    return Ok(claimed);
                }
                Err(StoreError::Conflict { .. }) => {
                    debug!(job = %job.id, owner, attempt, "claim lost a race, re-reading");
                    job = self.store.get(job.id.as_str())?;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(QueueError::ClaimRace {
            id: job.id.to_string(),
            attempts,
        })
    }

    /// Claim the first claimable job in queue order, if any.
    ///
    /// Jobs that fail a precondition or are taken by someone else between
    /// listing and claiming are skipped.
    pub fn claim_next(&self, owner: &str) -> Result<Option<Job>, QueueError> {
        for candidate in self.list_eligible()? {
            match self.claim(candidate.id.as_str(), owner) {
                Ok(job) => return Ok(Some(job)),
                Err(e) if e.is_skippable_for_claim() => {
                    debug!(job = %candidate.id, owner, error = %e, "skipping candidate");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    /// Preconditions in check order: state, approval, dependencies, admission.
    fn check_claimable(&self, job: &Job) -> Result<(), QueueError> {
        if !job.state.is_claimable() {
            return Err(QueueError::NotEligibleState {
                id: job.id.to_string(),
                state: job.state,
            });
        }

        if job.needs_approval() {
            return Err(QueueError::ApprovalRequired(job.id.to_string()));
        }

        let states = self.dependency_states(job)?;
        let unmet = unmet_dependencies(job, |dep| states.get(dep).copied());
        if !unmet.is_empty() {
            return Err(QueueError::DependencyUnmet {
                id: job.id.to_string(),
                unmet: unmet.into_iter().map(|d| d.to_string()).collect(),
            });
        }

        if self.admission.inspects_running() {
            let running = self.store.list(&|j| j.state == JobState::Running)?;
            self.admission
                .admit(job, &running)
                .map_err(|reason| QueueError::AdmissionDenied {
                    id: job.id.to_string(),
                    reason,
                })?;
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "claim_tests.rs"]
mod tests;
