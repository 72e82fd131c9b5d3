// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job record and creation spec.

use crate::state::{ApprovalState, JobState};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

crate::define_id! {
    /// Unique identifier for a job (`job-` + 8 lowercase hex characters).
    ///
    /// Ids are minted once by the job store and are the only identifiers
    /// other jobs may reference, e.g. in `depends_on`.
    pub struct JobId;
}

pub const MIN_PRIORITY: u8 = 0;
pub const MAX_PRIORITY: u8 = 100;
pub const DEFAULT_PRIORITY: u8 = 50;

/// Last progress report from the claimant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub percent: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub reported_at_ms: u64,
}

/// Entry in a job's append-only checkpoint history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub at_ms: u64,
    pub message: String,
}

/// Everything a producer supplies when creating a job.
///
/// `priority` is kept wide so out-of-range input reaches validation instead
/// of being truncated on the way in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub title: String,
    pub priority: i64,
    pub resource_tags: BTreeMap<String, u32>,
    pub requires_approval: bool,
    pub depends_on: BTreeSet<JobId>,
}

impl JobSpec {
    pub fn builder(title: impl Into<String>) -> JobSpecBuilder {
        JobSpecBuilder {
            spec: JobSpec {
                title: title.into(),
                priority: i64::from(DEFAULT_PRIORITY),
                resource_tags: BTreeMap::new(),
                requires_approval: false,
                depends_on: BTreeSet::new(),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct JobSpecBuilder {
    spec: JobSpec,
}

impl JobSpecBuilder {
    pub fn priority(mut self, priority: i64) -> Self {
        self.spec.priority = priority;
        self
    }

    /// Request `quantity` units of a resource class. Zero quantities are dropped.
    pub fn resource(mut self, class: impl Into<String>, quantity: u32) -> Self {
        let class = class.into();
        if quantity == 0 {
            self.spec.resource_tags.remove(&class);
        } else {
            self.spec.resource_tags.insert(class, quantity);
        }
        self
    }

    pub fn requires_approval(mut self, requires: bool) -> Self {
        self.spec.requires_approval = requires;
        self
    }

    pub fn depends_on(mut self, id: impl Into<JobId>) -> Self {
        self.spec.depends_on.insert(id.into());
        self
    }

    pub fn build(self) -> JobSpec {
        self.spec
    }
}

/// A job record as held by the job store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub state: JobState,
    pub priority: u8,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resource_tags: BTreeMap<String, u32>,
    #[serde(default)]
    pub requires_approval: bool,
    #[serde(default)]
    pub approval_state: ApprovalState,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub depends_on: BTreeSet<JobId>,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_heartbeat_at_ms: Option<u64>,
    /// Set when the job enters `done` or `failed`; the retention age key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(default)]
    pub checkpoints: Vec<Checkpoint>,
    #[serde(default)]
    pub log_lines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number of times the stall monitor has requeued this job.
    #[serde(default)]
    pub attempt_count: u32,
    /// Record version; bumped by the store on every successful write.
    #[serde(default)]
    pub version: u64,
}

impl Job {
    /// Build a fresh `pending` record. The priority must already be validated.
    pub fn new(id: JobId, spec: JobSpec, priority: u8, created_at_ms: u64) -> Self {
        Self {
            id,
            title: spec.title,
            state: JobState::Pending,
            priority,
            resource_tags: spec.resource_tags,
            approval_state: ApprovalState::initial(spec.requires_approval),
            requires_approval: spec.requires_approval,
            depends_on: spec.depends_on,
            created_at_ms,
            updated_at_ms: created_at_ms,
            claimed_at_ms: None,
            last_heartbeat_at_ms: None,
            finished_at_ms: None,
            owner: None,
            progress: None,
            checkpoints: Vec::new(),
            log_lines: Vec::new(),
            summary: None,
            error: None,
            attempt_count: 0,
            version: 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// True while a required sign-off has not been recorded.
    pub fn needs_approval(&self) -> bool {
        self.requires_approval && self.approval_state != ApprovalState::Approved
    }

    /// Milliseconds since the last heartbeat, if the job holds a lease.
    pub fn lease_age_ms(&self, now_ms: u64) -> Option<u64> {
        self.last_heartbeat_at_ms
            .map(|beat| now_ms.saturating_sub(beat))
    }

    /// A running job whose last heartbeat is strictly older than `lease_ms`.
    pub fn is_stalled(&self, now_ms: u64, lease_ms: u64) -> bool {
        self.state == JobState::Running
            && self
                .lease_age_ms(now_ms)
                .is_some_and(|age| age > lease_ms)
    }

    /// Drop ownership fields; every exit from `running` does this.
    pub fn release_lease(&mut self) {
        self.owner = None;
        self.claimed_at_ms = None;
        self.last_heartbeat_at_ms = None;
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
