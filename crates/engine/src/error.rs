// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the queue engine

use t4a_core::JobState;
use t4a_storage::StoreError;
use thiserror::Error;

/// Errors returned by queue operations.
///
/// Every variant is local to the call that produced it; none leaves a job
/// partially updated.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("job not found: {0}")]
    NotFound(String),
    #[error("ambiguous job id '{prefix}': {matches} matches")]
    AmbiguousId { prefix: String, matches: usize },
    #[error("job {id} is {state}; only pending or paused jobs can be claimed")]
    NotEligibleState { id: String, state: JobState },
    #[error("job {0} requires approval before it can be claimed")]
    ApprovalRequired(String),
    #[error("job {id} has unmet dependencies: {}", .unmet.join(", "))]
    DependencyUnmet { id: String, unmet: Vec<String> },
    #[error("job {id} not admitted: {reason}")]
    AdmissionDenied { id: String, reason: String },
    #[error("job {id} was contended by other claimants {attempts} times; try again")]
    ClaimRace { id: String, attempts: u32 },
    #[error("cannot {action} job {id}: it is {state}")]
    InvalidTransition {
        id: String,
        action: &'static str,
        state: JobState,
    },
    #[error("invalid priority {0}: must be between 0 and 100")]
    InvalidPriority(i64),
    #[error("invalid progress {0}: must be between 0 and 100")]
    InvalidProgress(i64),
    #[error("job {0} was modified concurrently; re-read and retry")]
    Conflict(String),
    #[error("storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for QueueError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => QueueError::NotFound(id),
            StoreError::Conflict { id, .. } => QueueError::Conflict(id),
            other => QueueError::Store(other),
        }
    }
}

impl QueueError {
    /// Admission failures that `claim_next` skips over to try the next job.
    pub(crate) fn is_skippable_for_claim(&self) -> bool {
        matches!(
            self,
            QueueError::NotFound(_)
                | QueueError::NotEligibleState { .. }
                | QueueError::ApprovalRequired(_)
                | QueueError::DependencyUnmet { .. }
                | QueueError::AdmissionDenied { .. }
                | QueueError::ClaimRace { .. }
        )
    }
}
