// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the engine crate.

use std::time::Duration;

use t4a_core::{FakeClock, Job, JobSpec, SequentialIdGen};
use t4a_storage::{JobStore, MemoryStore, StoreError};

use crate::{Queue, QueueConfig};

/// Convenience alias for the fully-typed test queue.
pub(crate) type TestQueue = Queue<MemoryStore, FakeClock, SequentialIdGen>;

/// Test context holding the queue and the clock driving it.
pub(crate) struct TestContext {
    pub queue: TestQueue,
    pub clock: FakeClock,
}

impl TestContext {
    pub fn add(&self, title: &str) -> Job {
        self.queue.create(JobSpec::builder(title).build()).unwrap()
    }

    pub fn add_spec(&self, spec: JobSpec) -> Job {
        self.queue.create(spec).unwrap()
    }

    /// Create a job and claim it for `owner`.
    pub fn running(&self, title: &str, owner: &str) -> Job {
        let job = self.add(title);
        self.queue.claim(job.id.as_str(), owner).unwrap()
    }

    /// Create, claim and complete a job.
    pub fn done(&self, title: &str) -> Job {
        let job = self.running(title, "worker");
        self.queue.complete(job.id.as_str(), None).unwrap()
    }

    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }
}

pub(crate) fn setup() -> TestContext {
    setup_with_config(QueueConfig::default())
}

pub(crate) fn setup_with_config(config: QueueConfig) -> TestContext {
    let clock = FakeClock::new();
    let queue = Queue::new(
        MemoryStore::new(),
        clock.clone(),
        SequentialIdGen::default(),
        config,
    );
    TestContext { queue, clock }
}

/// Store wrapper whose writes always lose the version race.
pub(crate) struct AlwaysStale(pub MemoryStore);

impl JobStore for AlwaysStale {
    fn insert(&self, job: Job) -> Result<Job, StoreError> {
        self.0.insert(job)
    }

    fn get(&self, id: &str) -> Result<Job, StoreError> {
        self.0.get(id)
    }

    fn list(&self, filter: &dyn Fn(&Job) -> bool) -> Result<Vec<Job>, StoreError> {
        self.0.list(filter)
    }

    fn compare_and_swap(
        &self,
        id: &str,
        expected_version: u64,
        _mutate: &mut dyn FnMut(&mut Job),
    ) -> Result<Job, StoreError> {
        Err(StoreError::Conflict {
            id: id.to_string(),
            expected: expected_version,
            actual: expected_version + 1,
        })
    }

    fn delete(&self, id: &str, expected_version: u64) -> Result<Job, StoreError> {
        self.0.delete(id, expected_version)
    }
}

pub(crate) fn stale_queue() -> Queue<AlwaysStale, FakeClock, SequentialIdGen> {
    Queue::new(
        AlwaysStale(MemoryStore::new()),
        FakeClock::new(),
        SequentialIdGen::default(),
        QueueConfig::default(),
    )
}
