// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue tunables

use std::time::Duration;

/// Tunables consumed by the queue engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Silence after the last heartbeat before a running job counts as stalled.
    pub lease_timeout: Duration,
    /// How many times the stall monitor may requeue a job before failing it.
    pub max_attempts: u32,
    /// Compare-and-swap attempts a single claim makes before reporting a race.
    pub claim_retries: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            lease_timeout: Duration::from_secs(30 * 60),
            max_attempts: 3,
            claim_retries: 5,
        }
    }
}
