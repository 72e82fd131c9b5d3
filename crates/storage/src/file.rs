// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory-backed job store shared between processes.
//!
//! Layout:
//! - `jobs.json`: snapshot of every record
//! - `jobs.lock`: advisory lock file
//!
//! Every operation holds the lock for its whole load-check-write cycle
//! (shared for reads, exclusive for writes), so independent processes get
//! the same first-writer-wins arbitration as threads sharing a
//! [`MemoryStore`](crate::MemoryStore).

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use t4a_core::Job;
use tracing::warn;

use crate::snapshot::{Snapshot, SnapshotError};
use crate::store::{JobStore, StoreError};
use crate::table::JobTable;

/// Job store persisted as a snapshot file under a state directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    snapshot_path: PathBuf,
    lock_path: PathBuf,
}

enum LockMode {
    Shared,
    Exclusive,
}

/// Holds an fs2 lock until dropped.
struct LockGuard {
    file: File,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

impl FileStore {
    /// Open (creating if needed) the store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            snapshot_path: dir.join("jobs.json"),
            lock_path: dir.join("jobs.lock"),
        })
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    fn lock(&self, mode: LockMode) -> Result<LockGuard, StoreError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)?;
        match mode {
            LockMode::Shared => FileExt::lock_shared(&file)?,
            LockMode::Exclusive => file.lock_exclusive()?,
        }
        Ok(LockGuard { file })
    }

    /// Load the table. With `quarantine`, a corrupt snapshot is moved aside;
    /// without it (shared lock held) it is only reported.
    fn load(&self, quarantine: bool) -> Result<JobTable, StoreError> {
        match Snapshot::load(&self.snapshot_path) {
            Ok(Some(snapshot)) => Ok(snapshot.jobs),
            Ok(None) => Ok(JobTable::new()),
            Err(SnapshotError::Json(e)) => {
                if quarantine {
                    let bak = Snapshot::quarantine(&self.snapshot_path)?;
                    warn!(
                        error = %e,
                        path = %self.snapshot_path.display(),
                        bak = %bak.display(),
                        "Corrupt job snapshot, moved to .bak and starting fresh",
                    );
                } else {
                    warn!(
                        error = %e,
                        path = %self.snapshot_path.display(),
                        "Corrupt job snapshot, reading as empty",
                    );
                }
                Ok(JobTable::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn read<T>(&self, f: impl FnOnce(&JobTable) -> Result<T, StoreError>) -> Result<T, StoreError> {
        let _guard = self.lock(LockMode::Shared)?;
        let table = self.load(false)?;
        f(&table)
    }

    fn write<T>(
        &self,
        f: impl FnOnce(&mut JobTable) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _guard = self.lock(LockMode::Exclusive)?;
        let mut table = self.load(true)?;
        let out = f(&mut table)?;
        Snapshot::new(table).save(&self.snapshot_path)?;
        Ok(out)
    }
}

impl JobStore for FileStore {
    fn insert(&self, job: Job) -> Result<Job, StoreError> {
        self.write(|table| table.insert(job))
    }

    fn get(&self, id: &str) -> Result<Job, StoreError> {
        self.read(|table| table.lookup(id))
    }

    fn list(&self, filter: &dyn Fn(&Job) -> bool) -> Result<Vec<Job>, StoreError> {
        self.read(|table| Ok(table.list(filter)))
    }

    fn compare_and_swap(
        &self,
        id: &str,
        expected_version: u64,
        mutate: &mut dyn FnMut(&mut Job),
    ) -> Result<Job, StoreError> {
        self.write(|table| table.compare_and_swap(id, expected_version, mutate))
    }

    fn delete(&self, id: &str, expected_version: u64) -> Result<Job, StoreError> {
        self.write(|table| table.delete(id, expected_version))
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
