// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory arena of job records and the write arbitration rules.
//!
//! Both store backends hold a `JobTable` under their own lock; the table
//! itself decides which writes are accepted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use t4a_core::{Job, JobId};
use tracing::debug;

use crate::store::StoreError;

/// Job records keyed by id.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobTable {
    jobs: BTreeMap<JobId, Job>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.jobs.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Job> {
        self.jobs.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    pub fn insert(&mut self, mut job: Job) -> Result<Job, StoreError> {
        if self.jobs.contains_key(job.id.as_str()) {
            return Err(StoreError::Collision(job.id.to_string()));
        }
        job.version = 1;
        self.jobs.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    pub fn lookup(&self, id: &str) -> Result<Job, StoreError> {
        self.jobs
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub fn list(&self, filter: &dyn Fn(&Job) -> bool) -> Vec<Job> {
        self.jobs.values().filter(|j| filter(j)).cloned().collect()
    }

    pub fn compare_and_swap(
        &mut self,
        id: &str,
        expected_version: u64,
        mutate: &mut dyn FnMut(&mut Job),
    ) -> Result<Job, StoreError> {
        let current = self
            .jobs
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        check_version(current, expected_version)?;

        let mut next = current.clone();
        mutate(&mut next);
        // Identity is owned by the store, not the mutator.
        next.id = current.id.clone();

        if next.state != current.state && !current.state.can_transition_to(next.state) {
            return Err(StoreError::IllegalTransition {
                id: id.to_string(),
                from: current.state,
                to: next.state,
            });
        }

        next.version = current.version + 1;
        *current = next.clone();
        Ok(next)
    }

    pub fn delete(&mut self, id: &str, expected_version: u64) -> Result<Job, StoreError> {
        let current = self
            .jobs
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        check_version(current, expected_version)?;
        self.jobs
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

fn check_version(current: &Job, expected: u64) -> Result<(), StoreError> {
    if current.version == expected {
        return Ok(());
    }
    debug!(
        id = %current.id,
        expected,
        actual = current.version,
        "stale write rejected"
    );
    Err(StoreError::Conflict {
        id: current.id.to_string(),
        expected,
        actual: current.version,
    })
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
