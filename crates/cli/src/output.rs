// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;
use t4a_core::{format_elapsed_ms, ApprovalState, Job};

use crate::color;
use crate::table::{Column, Table};

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Absolute UTC timestamp, e.g. `2026-01-01 00:00:00 UTC`.
pub fn format_timestamp(epoch_ms: u64) -> String {
    i64::try_from(epoch_ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// `(class: N, ...)` for jobs that requested resources.
pub fn format_resources(job: &Job) -> Option<String> {
    if job.resource_tags.is_empty() {
        return None;
    }
    let parts: Vec<String> = job
        .resource_tags
        .iter()
        .map(|(class, qty)| format!("{class}: {qty}"))
        .collect();
    Some(parts.join(", "))
}

/// The one-line confirmation printed by `add`.
pub fn format_created(job: &Job) -> String {
    let mut line = job.id.to_string();
    if let Some(resources) = format_resources(job) {
        let _ = write!(line, " ({resources})");
    }
    if job.needs_approval() {
        line.push_str(" [needs approval]");
    }
    line
}

/// Queue listing: one row per job, first line is the head of the queue.
pub fn job_table(jobs: &[Job]) -> Table {
    let mut table = Table::new(vec![
        Column::muted("ID"),
        Column::right("PRI"),
        Column::status("STATUS"),
        Column::left("FLAGS"),
        Column::left("TITLE").with_max(80),
    ])
    .headless();
    for job in jobs {
        table.row(vec![
            job.id.to_string(),
            job.priority.to_string(),
            job.state.to_string(),
            flags(job),
            job.title.clone(),
        ]);
    }
    table
}

fn flags(job: &Job) -> String {
    let mut flags = Vec::new();
    if job.needs_approval() {
        flags.push("approval");
    }
    if !job.depends_on.is_empty() {
        flags.push("deps");
    }
    if !job.resource_tags.is_empty() {
        flags.push("res");
    }
    if flags.is_empty() {
        "-".to_string()
    } else {
        flags.join(",")
    }
}

/// Multi-line detail view printed by `status <id>`.
pub fn format_job_detail(job: &Job, now_ms: u64, colorize: bool) -> String {
    let (label, state) = if colorize {
        (
            color::apply_header("Job:"),
            color::apply_status(job.state.as_str()),
        )
    } else {
        ("Job:".to_string(), job.state.to_string())
    };
    let mut out = String::new();
    let _ = writeln!(out, "{label} {}", job.id);
    let _ = writeln!(out, "Title: {}", job.title);
    let _ = writeln!(out, "Status: {state}");
    let _ = writeln!(out, "Priority: {}", job.priority);
    if let Some(resources) = format_resources(job) {
        let _ = writeln!(out, "Resources: {resources}");
    }
    match job.approval_state {
        ApprovalState::None => {}
        ApprovalState::Pending => {
            let _ = writeln!(out, "Approval: PENDING");
        }
        ApprovalState::Approved => {
            let _ = writeln!(out, "Approval: APPROVED");
        }
    }
    if !job.depends_on.is_empty() {
        let deps: Vec<&str> = job.depends_on.iter().map(|d| d.as_str()).collect();
        let _ = writeln!(out, "Depends on: {}", deps.join(", "));
    }
    if let Some(owner) = &job.owner {
        let _ = writeln!(out, "Owner: {owner}");
    }
    if let Some(progress) = &job.progress {
        match &progress.message {
            Some(msg) => {
                let _ = writeln!(out, "Progress: {}% - {}", progress.percent, msg);
            }
            None => {
                let _ = writeln!(out, "Progress: {}%", progress.percent);
            }
        }
    }
    if job.attempt_count > 0 {
        let _ = writeln!(out, "Attempts: {}", job.attempt_count);
    }
    let _ = writeln!(out, "Created: {}", format_timestamp(job.created_at_ms));
    if let Some(claimed) = job.claimed_at_ms {
        let _ = writeln!(out, "Claimed: {}", format_timestamp(claimed));
    }
    if let Some(age) = job.lease_age_ms(now_ms) {
        let _ = writeln!(out, "Last heartbeat: {} ago", format_elapsed_ms(age));
    }
    if let Some(finished) = job.finished_at_ms {
        let _ = writeln!(out, "Finished: {}", format_timestamp(finished));
    }
    if let Some(summary) = &job.summary {
        let _ = writeln!(out, "Summary: {summary}");
    }
    if let Some(error) = &job.error {
        let _ = writeln!(out, "Error: {error}");
    }
    if !job.checkpoints.is_empty() {
        let _ = writeln!(out, "Checkpoints:");
        for cp in &job.checkpoints {
            let _ = writeln!(out, "  {}  {}", format_timestamp(cp.at_ms), cp.message);
        }
    }
    out
}
