// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission control consulted before a claim is written.
//!
//! Policies see the candidate and the currently running jobs and may veto
//! the claim. The check is not transactional with the claim write: two
//! claims of different jobs can both pass a cap that only one of them fits
//! under. Caps are therefore soft limits.

use std::collections::BTreeMap;

use t4a_core::Job;

/// Pluggable claim-time admission policy.
pub trait Admission: Send + Sync {
    /// Return `Err(reason)` to refuse the claim.
    fn admit(&self, candidate: &Job, running: &[Job]) -> Result<(), String>;

    /// Whether `admit` looks at `running`. When false the queue skips
    /// loading the running set.
    fn inspects_running(&self) -> bool {
        true
    }
}

/// Admits every claim.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Admission for AllowAll {
    fn admit(&self, _candidate: &Job, _running: &[Job]) -> Result<(), String> {
        Ok(())
    }

    fn inspects_running(&self) -> bool {
        false
    }
}

/// Per-resource-class concurrency caps.
///
/// A claim is refused when the quantity already held by running jobs plus
/// the candidate's own tag would exceed the cap for that class. Classes
/// without a cap are unlimited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceCaps {
    caps: BTreeMap<String, u32>,
}

impl ResourceCaps {
    pub fn new(caps: BTreeMap<String, u32>) -> Self {
        Self { caps }
    }

    pub fn with_cap(mut self, class: impl Into<String>, limit: u32) -> Self {
        self.caps.insert(class.into(), limit);
        self
    }

    pub fn caps(&self) -> &BTreeMap<String, u32> {
        &self.caps
    }
}

impl Admission for ResourceCaps {
    fn admit(&self, candidate: &Job, running: &[Job]) -> Result<(), String> {
        for (class, wanted) in &candidate.resource_tags {
            let Some(&limit) = self.caps.get(class) else {
                continue;
            };
            let in_use = running
                .iter()
                .filter(|j| j.id != candidate.id)
                .filter_map(|j| j.resource_tags.get(class))
                .fold(0u32, |sum, qty| sum.saturating_add(*qty));
            if in_use.saturating_add(*wanted) > limit {
                return Err(format!(
                    "{class} cap is {limit}, {in_use} in use, job needs {wanted}"
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "admission_tests.rs"]
mod tests;
