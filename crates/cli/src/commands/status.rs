// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `t4a status` - queue summary, or one job in detail.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use t4a_core::{Clock, Job, JobState};
use t4a_engine::{JobFilter, QueueStats};

use crate::color;
use crate::context::Context;
use crate::output::{format_job_detail, print_json, OutputFormat};

#[derive(Args)]
pub struct StatusArgs {
    /// Job ID or prefix; omit for queue counts
    pub id: Option<String>,
}

pub fn handle(args: StatusArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    match args.id {
        Some(id) => job_status(&id, ctx, format),
        None => queue_status(ctx, format),
    }
}

fn job_status(id: &str, ctx: &Context, format: OutputFormat) -> Result<()> {
    let job = ctx.job(id)?;
    match format {
        OutputFormat::Text => {
            let now = ctx.queue.clock().epoch_ms();
            print!(
                "{}",
                format_job_detail(&job, now, color::should_colorize())
            );
        }
        OutputFormat::Json => print_json(&job)?,
    }
    Ok(())
}

fn queue_status(ctx: &Context, format: OutputFormat) -> Result<()> {
    let stats = ctx.queue.stats()?;
    let running = ctx.queue.list(&JobFilter::state(JobState::Running))?;
    let now = ctx.queue.clock().epoch_ms();
    let stalled = stalled_ids(&running, now, ctx.queue.config().lease_timeout);

    match format {
        OutputFormat::Text => print!("{}", format_queue_status(&stats, &stalled)),
        OutputFormat::Json => print_json(&serde_json::json!({
            "counts": stats,
            "total": stats.total(),
            "stalled": stalled,
        }))?,
    }
    Ok(())
}

fn stalled_ids(running: &[Job], now_ms: u64, lease: Duration) -> Vec<String> {
    let lease_ms = u64::try_from(lease.as_millis()).unwrap_or(u64::MAX);
    running
        .iter()
        .filter(|job| job.is_stalled(now_ms, lease_ms))
        .map(|job| job.id.to_string())
        .collect()
}

fn format_queue_status(stats: &QueueStats, stalled: &[String]) -> String {
    let mut out = format!("{} {stats}\n", color::header("Queue:"));
    if !stalled.is_empty() {
        out.push_str(&format!(
            "Stalled: {} (run `t4a recover`)\n",
            stalled.join(", ")
        ));
    }
    out
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
