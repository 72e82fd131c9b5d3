// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Opening the queue over the state directory.

use std::path::PathBuf;

use anyhow::Result;
use t4a_core::{HexIdGen, Job, SystemClock};
use t4a_engine::{Queue, ResourceCaps};
use t4a_storage::FileStore;

use crate::config::Settings;

/// The production queue: file-backed, wall-clock, random ids.
pub type CliQueue = Queue<FileStore, SystemClock, HexIdGen>;

pub struct Context {
    pub state_dir: PathBuf,
    pub settings: Settings,
    pub queue: CliQueue,
}

impl Context {
    pub fn open(state_dir: PathBuf) -> Result<Self> {
        let settings = Settings::load(&state_dir)?;
        let store = FileStore::open(&state_dir)?;
        let mut queue = Queue::new(store, SystemClock, HexIdGen, settings.queue_config()?);
        if settings.admission.enforce_resource_caps {
            queue = queue.with_admission(ResourceCaps::new(settings.resources.clone()));
        }
        Ok(Self {
            state_dir,
            settings,
            queue,
        })
    }

    /// Resolve a command-line id (exact or unique prefix) to a job.
    pub fn job(&self, id: &str) -> Result<Job> {
        Ok(self.queue.resolve(id)?)
    }
}
