// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! t4a-core: job model, identifiers and clocks for the t4a task queue

pub mod clock;
pub mod id;
pub mod job;
pub mod state;
pub mod time_fmt;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock, FAKE_EPOCH_MS};
pub use id::{is_job_id, HexIdGen, IdGen, SequentialIdGen};
pub use job::{
    Checkpoint, Job, JobId, JobSpec, JobSpecBuilder, Progress, DEFAULT_PRIORITY, MAX_PRIORITY,
    MIN_PRIORITY,
};
pub use state::{ApprovalState, JobState};
pub use time_fmt::{format_elapsed, format_elapsed_ms, parse_duration, DurationParseError};
