// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The job store contract.
//!
//! A store is the single owner of job identity and lifetime. Every write
//! presents the record version it read; the store applies it only if that
//! version is still current, so of two racing writers exactly one wins.

use t4a_core::{IdGen, Job, JobId, JobSpec, JobState};
use thiserror::Error;
use tracing::debug;

use crate::snapshot::SnapshotError;

/// How many candidate ids `create` tries before giving up.
///
/// With 32 bits of entropy this bound is never reached in practice; it only
/// keeps a broken generator from spinning forever.
pub const MAX_ID_ATTEMPTS: u32 = 64;

/// Errors that can occur in store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("job not found: {0}")]
    NotFound(String),
    #[error("job {id} was modified concurrently (expected version {expected}, found {actual})")]
    Conflict {
        id: String,
        expected: u64,
        actual: u64,
    },
    #[error("job id already exists: {0}")]
    Collision(String),
    #[error("illegal state change for {id}: {from} -> {to}")]
    IllegalTransition {
        id: String,
        from: JobState,
        to: JobState,
    },
    #[error("could not mint a free job id after {0} attempts")]
    IdSpaceExhausted(u32),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Durable keyed storage of job records.
pub trait JobStore: Send + Sync {
    /// Insert a new record at version 1. Fails with `Collision` if the id exists.
    fn insert(&self, job: Job) -> Result<Job, StoreError>;

    /// Fetch one record by exact id.
    fn get(&self, id: &str) -> Result<Job, StoreError>;

    /// All records matching `filter`, ordered by id.
    fn list(&self, filter: &dyn Fn(&Job) -> bool) -> Result<Vec<Job>, StoreError>;

    /// Apply `mutate` to the record if its version is still `expected_version`.
    ///
    /// Returns the written record (version bumped by one) or `Conflict` when
    /// another writer got there first. State changes that are not edges of
    /// the job state graph are rejected with `IllegalTransition`.
    fn compare_and_swap(
        &self,
        id: &str,
        expected_version: u64,
        mutate: &mut dyn FnMut(&mut Job),
    ) -> Result<Job, StoreError>;

    /// Remove the record if its version is still `expected_version`.
    fn delete(&self, id: &str, expected_version: u64) -> Result<Job, StoreError>;

    /// Mint an id and insert a fresh `pending` job, re-rolling on collision.
    ///
    /// A candidate equal to one of the spec's own dependencies is also
    /// re-rolled, so a job can never depend on itself.
    fn create<G: IdGen>(
        &self,
        ids: &G,
        spec: JobSpec,
        priority: u8,
        created_at_ms: u64,
    ) -> Result<Job, StoreError>
    where
        Self: Sized,
    {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let id = JobId::new(ids.next());
            if spec.depends_on.contains(&id) {
                debug!(%id, attempt, "candidate id is listed as a dependency, re-rolling");
                continue;
            }
            match self.insert(Job::new(id, spec.clone(), priority, created_at_ms)) {
                Ok(job) => return Ok(job),
                Err(StoreError::Collision(id)) => {
                    debug!(%id, attempt, "job id collision, re-rolling");
                }
                Err(e) => return Err(e),
            }
        }
        Err(StoreError::IdSpaceExhausted(MAX_ID_ATTEMPTS))
    }
}

impl<S: JobStore + ?Sized> JobStore for std::sync::Arc<S> {
    fn insert(&self, job: Job) -> Result<Job, StoreError> {
        (**self).insert(job)
    }

    fn get(&self, id: &str) -> Result<Job, StoreError> {
        (**self).get(id)
    }

    fn list(&self, filter: &dyn Fn(&Job) -> bool) -> Result<Vec<Job>, StoreError> {
        (**self).list(filter)
    }

    fn compare_and_swap(
        &self,
        id: &str,
        expected_version: u64,
        mutate: &mut dyn FnMut(&mut Job),
    ) -> Result<Job, StoreError> {
        (**self).compare_and_swap(id, expected_version, mutate)
    }

    fn delete(&self, id: &str, expected_version: u64) -> Result<Job, StoreError> {
        (**self).delete(id, expected_version)
    }
}
