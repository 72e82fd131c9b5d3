// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::path::PathBuf;

use anyhow::{anyhow, Result};

// --- State directory ---

/// Resolve state directory: T4A_DIR > XDG_STATE_HOME/t4a > ~/.local/state/t4a
pub fn state_dir() -> Result<PathBuf> {
    if let Some(dir) = non_empty("T4A_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Some(xdg) = non_empty("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("t4a"));
    }
    let home = non_empty("HOME")
        .ok_or_else(|| anyhow!("cannot locate state directory: set T4A_DIR or HOME"))?;
    Ok(PathBuf::from(home).join(".local/state/t4a"))
}

// --- Identity ---

/// Claim owner: T4A_OWNER, else `agent-<pid>`.
pub fn owner() -> String {
    non_empty("T4A_OWNER").unwrap_or_else(|| format!("agent-{}", std::process::id()))
}

// --- Logging ---

pub fn log_filter() -> Option<String> {
    non_empty("T4A_LOG")
}

// --- Color ---

pub fn no_color() -> bool {
    std::env::var("NO_COLOR").is_ok_and(|v| v == "1")
}

pub fn force_color() -> bool {
    std::env::var("COLOR").is_ok_and(|v| v == "1")
}

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.is_empty())
}
