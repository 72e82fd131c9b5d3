// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File logging under the state directory.

use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;

pub const LOG_FILE: &str = "t4a.log";

/// Route `tracing` output to `<state dir>/t4a.log`.
///
/// Filter comes from `T4A_LOG` (default `info`). The returned guard flushes
/// buffered lines when dropped, so `main` must hold it until exit.
pub fn init(state_dir: &Path) -> Result<WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    std::fs::create_dir_all(state_dir)?;
    let file_appender = tracing_appender::rolling::never(state_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = crate::env::log_filter()
        .and_then(|f| EnvFilter::try_new(f).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    // An already-installed subscriber wins.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init();

    Ok(guard)
}
