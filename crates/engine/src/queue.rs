// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The queue engine handle and its read-side operations.
//!
//! All durable state lives in the store; a `Queue` holds only its
//! collaborators, so any number of processes can each build one over the
//! same backing directory.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use t4a_core::{Clock, IdGen, Job, JobSpec, JobState, MAX_PRIORITY, MIN_PRIORITY};
use t4a_storage::JobStore;
use tracing::{debug, info};

use crate::admission::{Admission, AllowAll};
use crate::config::QueueConfig;
use crate::error::QueueError;

/// Queue order: priority descending, then creation time, then id.
pub fn queue_order(a: &Job, b: &Job) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then(a.created_at_ms.cmp(&b.created_at_ms))
        .then_with(|| a.id.cmp(&b.id))
}

/// Selection for [`Queue::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    /// Only these states; `None` means every state.
    pub states: Option<Vec<JobState>>,
    pub min_priority: Option<u8>,
}

impl JobFilter {
    /// Jobs that can still be worked on: pending and paused.
    pub fn eligible() -> Self {
        Self {
            states: Some(vec![JobState::Pending, JobState::Paused]),
            min_priority: None,
        }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn state(state: JobState) -> Self {
        Self {
            states: Some(vec![state]),
            min_priority: None,
        }
    }

    pub fn min_priority(mut self, min: u8) -> Self {
        self.min_priority = Some(min);
        self
    }

    pub fn matches(&self, job: &Job) -> bool {
        let state_ok = self
            .states
            .as_ref()
            .is_none_or(|states| states.contains(&job.state));
        let priority_ok = self.min_priority.is_none_or(|min| job.priority >= min);
        state_ok && priority_ok
    }
}

/// Job counts per state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub pending: usize,
    pub running: usize,
    pub paused: usize,
    pub done: usize,
    pub failed: usize,
}

impl QueueStats {
    pub fn count(&self, state: JobState) -> usize {
        match state {
            JobState::Pending => self.pending,
            JobState::Running => self.running,
            JobState::Paused => self.paused,
            JobState::Done => self.done,
            JobState::Failed => self.failed,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.running + self.paused + self.done + self.failed
    }

    fn bump(&mut self, state: JobState) {
        match state {
            JobState::Pending => self.pending += 1,
            JobState::Running => self.running += 1,
            JobState::Paused => self.paused += 1,
            JobState::Done => self.done += 1,
            JobState::Failed => self.failed += 1,
        }
    }
}

impl std::fmt::Display for QueueStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} pending, {} running, {} paused, {} done, {} failed",
            self.pending, self.running, self.paused, self.done, self.failed
        )
    }
}

/// Validate a caller-supplied priority.
pub(crate) fn check_priority(value: i64) -> Result<u8, QueueError> {
    if (i64::from(MIN_PRIORITY)..=i64::from(MAX_PRIORITY)).contains(&value) {
        Ok(value as u8)
    } else {
        Err(QueueError::InvalidPriority(value))
    }
}

/// Queue engine over a job store.
pub struct Queue<S, C, G> {
    pub(crate) store: S,
    pub(crate) clock: C,
    pub(crate) ids: G,
    pub(crate) config: QueueConfig,
    pub(crate) admission: Box<dyn Admission>,
}

impl<S, C, G> Queue<S, C, G>
where
    S: JobStore,
    C: Clock,
    G: IdGen,
{
    pub fn new(store: S, clock: C, ids: G, config: QueueConfig) -> Self {
        Self {
            store,
            clock,
            ids,
            config,
            admission: Box::new(AllowAll),
        }
    }

    /// Replace the claim-time admission policy.
    pub fn with_admission(mut self, admission: impl Admission + 'static) -> Self {
        self.admission = Box::new(admission);
        self
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Create a new `pending` job and return it.
    pub fn create(&self, spec: JobSpec) -> Result<Job, QueueError> {
        let priority = check_priority(spec.priority)?;
        let now = self.clock.epoch_ms();
        let job = self.store.create(&self.ids, spec, priority, now)?;
        info!(
            job = %job.id,
            priority = job.priority,
            requires_approval = job.requires_approval,
            deps = job.depends_on.len(),
            "job created"
        );
        Ok(job)
    }

    pub fn get(&self, id: &str) -> Result<Job, QueueError> {
        Ok(self.store.get(id)?)
    }

    /// Look a job up by exact id or unique id prefix.
    pub fn resolve(&self, id_or_prefix: &str) -> Result<Job, QueueError> {
        if id_or_prefix.trim().is_empty() {
            return Err(QueueError::NotFound(id_or_prefix.to_string()));
        }
        match self.store.get(id_or_prefix) {
            Ok(job) => return Ok(job),
            Err(t4a_storage::StoreError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let mut matches = self
            .store
            .list(&|j| j.id.as_str().starts_with(id_or_prefix))?;
        match matches.len() {
            0 => Err(QueueError::NotFound(id_or_prefix.to_string())),
            1 => Ok(matches.remove(0)),
            n => Err(QueueError::AmbiguousId {
                prefix: id_or_prefix.to_string(),
                matches: n,
            }),
        }
    }

    /// Pending and paused jobs in queue order.
    pub fn list_eligible(&self) -> Result<Vec<Job>, QueueError> {
        self.list(&JobFilter::eligible())
    }

    /// Jobs matching `filter` in queue order.
    pub fn list(&self, filter: &JobFilter) -> Result<Vec<Job>, QueueError> {
        let mut jobs = self.store.list(&|j| filter.matches(j))?;
        jobs.sort_by(queue_order);
        Ok(jobs)
    }

    pub fn stats(&self) -> Result<QueueStats, QueueError> {
        let mut stats = QueueStats::default();
        for job in self.store.list(&|_| true)? {
            stats.bump(job.state);
        }
        Ok(stats)
    }

    /// Change the priority of a non-terminal job.
    pub fn update_priority(&self, id: &str, value: i64) -> Result<Job, QueueError> {
        let priority = check_priority(value)?;
        let job = self.guarded_update(
            id,
            "reprioritize",
            |j| !j.is_terminal(),
            |j, _| j.priority = priority,
        )?;
        info!(job = %job.id, priority, "priority updated");
        Ok(job)
    }

    /// Append a free-text line to a job's log. Allowed in every state.
    pub fn append_log(&self, id: &str, line: &str) -> Result<Job, QueueError> {
        let line = line.to_string();
        let job = self.guarded_update(
            id,
            "log",
            |_| true,
            |j, _| j.log_lines.push(line.clone()),
        )?;
        debug!(job = %job.id, lines = job.log_lines.len(), "log line appended");
        Ok(job)
    }

    pub fn logs(&self, id: &str) -> Result<Vec<String>, QueueError> {
        Ok(self.store.get(id)?.log_lines)
    }

    /// Read-check-write one job: `allowed` gates on the current record and
    /// `mutate` receives it together with the current epoch millis.
    ///
    /// A lost race surfaces as [`QueueError::Conflict`]; only claim retries.
    pub(crate) fn guarded_update(
        &self,
        id: &str,
        action: &'static str,
        allowed: impl Fn(&Job) -> bool,
        mut mutate: impl FnMut(&mut Job, u64),
    ) -> Result<Job, QueueError> {
        let job = self.store.get(id)?;
        if !allowed(&job) {
            return Err(QueueError::InvalidTransition {
                id: job.id.to_string(),
                action,
                state: job.state,
            });
        }
        let now = self.clock.epoch_ms();
        let updated = self
            .store
            .compare_and_swap(job.id.as_str(), job.version, &mut |j| {
                mutate(j, now);
                j.updated_at_ms = now;
            })?;
        Ok(updated)
    }

    /// Current state of each of `job`'s dependencies, read in one pass.
    pub(crate) fn dependency_states(
        &self,
        job: &Job,
    ) -> Result<BTreeMap<t4a_core::JobId, JobState>, QueueError> {
        if job.depends_on.is_empty() {
            return Ok(BTreeMap::new());
        }
        let deps = self.store.list(&|j| job.depends_on.contains(&j.id))?;
        Ok(deps.into_iter().map(|j| (j.id, j.state)).collect())
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
