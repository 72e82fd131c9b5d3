// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process job store.

use parking_lot::Mutex;
use t4a_core::Job;

use crate::store::{JobStore, StoreError};
use crate::table::JobTable;

/// Job store held entirely in memory; shared between threads via `Arc`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: Mutex<JobTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobStore for MemoryStore {
    fn insert(&self, job: Job) -> Result<Job, StoreError> {
        self.table.lock().insert(job)
    }

    fn get(&self, id: &str) -> Result<Job, StoreError> {
        self.table.lock().lookup(id)
    }

    fn list(&self, filter: &dyn Fn(&Job) -> bool) -> Result<Vec<Job>, StoreError> {
        Ok(self.table.lock().list(filter))
    }

    fn compare_and_swap(
        &self,
        id: &str,
        expected_version: u64,
        mutate: &mut dyn FnMut(&mut Job),
    ) -> Result<Job, StoreError> {
        self.table
            .lock()
            .compare_and_swap(id, expected_version, mutate)
    }

    fn delete(&self, id: &str, expected_version: u64) -> Result<Job, StoreError> {
        self.table.lock().delete(id, expected_version)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
