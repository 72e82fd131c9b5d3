// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job state machine.
//!
//! ```text
//! pending --claim--> running --complete--> done
//!                    running --fail------> failed
//!                    running --pause-----> paused --claim--> running
//!                    running --stall-----> pending | failed
//! ```
//!
//! `pending` is the only initial state; `done` and `failed` are terminal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Running,
    Paused,
    Done,
    Failed,
}

impl JobState {
    pub const ALL: [JobState; 5] = [
        JobState::Pending,
        JobState::Running,
        JobState::Paused,
        JobState::Done,
        JobState::Failed,
    ];

    /// `done` and `failed` never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Done | JobState::Failed)
    }

    /// States a claim may start from.
    pub fn is_claimable(self) -> bool {
        matches!(self, JobState::Pending | JobState::Paused)
    }

    /// Whether `self -> next` is an edge of the state graph.
    pub fn can_transition_to(self, next: JobState) -> bool {
        use JobState::*;
        matches!(
            (self, next),
            (Pending, Running)
                | (Paused, Running)
                | (Running, Done)
                | (Running, Failed)
                | (Running, Paused)
                | (Running, Pending)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Running => "running",
            JobState::Paused => "paused",
            JobState::Done => "done",
            JobState::Failed => "failed",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown job state '{0}' (expected pending, running, paused, done or failed)")]
pub struct ParseStateError(pub String);

impl FromStr for JobState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobState::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStateError(s.to_string()))
    }
}

/// Human sign-off state. `None` for jobs that never needed approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalState {
    #[default]
    None,
    Pending,
    Approved,
}

impl ApprovalState {
    /// Initial approval state for a job.
    pub fn initial(requires_approval: bool) -> Self {
        if requires_approval {
            ApprovalState::Pending
        } else {
            ApprovalState::None
        }
    }
}

impl fmt::Display for ApprovalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalState::None => write!(f, "none"),
            ApprovalState::Pending => write!(f, "pending"),
            ApprovalState::Approved => write!(f, "approved"),
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
