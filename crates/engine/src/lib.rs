// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! t4a job queue engine: claiming, lifecycle transitions, stall recovery and
//! retention sweeps over a shared job store.

pub mod admission;
mod approval;
mod claim;
mod config;
pub mod deps;
mod error;
mod gc;
mod lifecycle;
mod monitor;
mod queue;

#[cfg(test)]
mod test_helpers;

pub use admission::{Admission, AllowAll, ResourceCaps};
pub use config::QueueConfig;
pub use error::QueueError;
pub use gc::CollectReport;
pub use monitor::RecoverReport;
pub use queue::{queue_order, JobFilter, Queue, QueueStats};
