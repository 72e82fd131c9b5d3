// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::id::IdGen;
use crate::job::{Job, JobId, JobSpec, DEFAULT_PRIORITY};
use crate::state::JobState;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Id generator that replays a fixed script, then falls back to a counter.
///
/// Lets tests force collisions: script the same id twice and the second
/// create must re-roll.
#[derive(Clone)]
pub struct ScriptedIdGen {
    script: Arc<Mutex<VecDeque<String>>>,
    fallback: crate::id::SequentialIdGen,
}

impl ScriptedIdGen {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Arc::new(Mutex::new(ids.into_iter().map(Into::into).collect())),
            fallback: crate::id::SequentialIdGen::new("job-f"),
        }
    }
}

impl IdGen for ScriptedIdGen {
    fn next(&self) -> String {
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.next())
    }
}

// ── Record factories ────────────────────────────────────────────────────────

/// A pending job with default priority created at `created_at_ms`.
pub fn pending_job(id: &str, title: &str, created_at_ms: u64) -> Job {
    Job::new(
        JobId::new(id),
        JobSpec::builder(title).build(),
        DEFAULT_PRIORITY,
        created_at_ms,
    )
}

/// A job already claimed by `owner` with its last heartbeat at `heartbeat_ms`.
pub fn running_job(id: &str, owner: &str, heartbeat_ms: u64) -> Job {
    let mut job = pending_job(id, id, heartbeat_ms);
    job.state = JobState::Running;
    job.owner = Some(owner.to_string());
    job.claimed_at_ms = Some(heartbeat_ms);
    job.last_heartbeat_at_ms = Some(heartbeat_ms);
    job
}

/// A terminal job that finished at `finished_at_ms`.
pub fn finished_job(id: &str, state: JobState, finished_at_ms: u64) -> Job {
    let mut job = pending_job(id, id, finished_at_ms);
    job.state = state;
    job.finished_at_ms = Some(finished_at_ms);
    job
}
