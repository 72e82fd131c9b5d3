// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Housekeeping: stall recovery, retention sweeps, and the loop that runs both.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use t4a_core::parse_duration;
use t4a_engine::{CollectReport, RecoverReport};
use tracing::{error, info};

use crate::context::Context;
use crate::output::{print_json, OutputFormat};

const MINUTE: Duration = Duration::from_secs(60);
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Args)]
pub struct RecoverArgs {
    /// Heartbeat silence that counts as stalled (e.g. 30m; bare number = minutes)
    #[arg(long, value_parser = parse_minutes)]
    pub lease_timeout: Option<Duration>,
}

#[derive(Args)]
pub struct GcArgs {
    /// Remove finished jobs older than this (e.g. 7d; bare number = days)
    #[arg(long, value_parser = parse_days)]
    pub older_than: Option<Duration>,
    /// List what would be removed without removing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct SuperviseArgs {
    /// Time between sweeps (e.g. 30s, 5m; bare number = seconds)
    #[arg(long, default_value = "60s", value_parser = parse_seconds)]
    pub interval: Duration,
}

fn parse_minutes(s: &str) -> Result<Duration, String> {
    parse_duration(s, MINUTE).map_err(|e| e.to_string())
}

fn parse_days(s: &str) -> Result<Duration, String> {
    parse_duration(s, DAY).map_err(|e| e.to_string())
}

fn parse_seconds(s: &str) -> Result<Duration, String> {
    let d = parse_duration(s, Duration::from_secs(1)).map_err(|e| e.to_string())?;
    if d.is_zero() {
        return Err("interval must be greater than zero".to_string());
    }
    Ok(d)
}

fn recover_message(report: &RecoverReport) -> String {
    let mut out = format!("Recovered {} stalled job(s)", report.count());
    for id in &report.failed {
        out.push_str(&format!("\n  {id} failed: out of attempts"));
    }
    out
}

fn gc_message(report: &CollectReport) -> String {
    if report.dry_run {
        let mut out = format!("Would remove {} old job(s)", report.count());
        for id in &report.removed {
            out.push_str(&format!("\n  {id}"));
        }
        out
    } else {
        format!("Removed {} old job(s)", report.count())
    }
}

pub fn recover(args: RecoverArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let report = match args.lease_timeout {
        Some(lease) => ctx.queue.recover(lease)?,
        None => ctx.queue.recover_stalled()?,
    };
    match format {
        OutputFormat::Text => println!("{}", recover_message(&report)),
        OutputFormat::Json => print_json(&report)?,
    }
    Ok(())
}

pub fn gc(args: GcArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let older_than = match args.older_than {
        Some(d) => d,
        None => ctx.settings.retention()?,
    };
    let report = if args.dry_run {
        ctx.queue.collect_dry_run(older_than)?
    } else {
        ctx.queue.collect(older_than)?
    };
    match format {
        OutputFormat::Text => println!("{}", gc_message(&report)),
        OutputFormat::Json => print_json(&report)?,
    }
    Ok(())
}

/// One recover + gc pass. Errors are logged so the loop keeps going.
fn sweep_once(ctx: &Context, retention: Duration) {
    match ctx.queue.recover_stalled() {
        Ok(report) if !report.is_empty() => {
            println!("{}", recover_message(&report));
        }
        Ok(_) => {}
        Err(e) => error!(error = %e, "recovery sweep failed"),
    }
    match ctx.queue.collect(retention) {
        Ok(report) if report.count() > 0 => println!("{}", gc_message(&report)),
        Ok(_) => {}
        Err(e) => error!(error = %e, "retention sweep failed"),
    }
}

/// Run recover and gc every `interval` until Ctrl-C.
pub async fn supervise(args: SuperviseArgs, ctx: Context) -> Result<()> {
    let retention = ctx.settings.retention()?;
    let ctx = Arc::new(ctx);
    info!(interval_secs = args.interval.as_secs(), "supervisor started");
    println!(
        "Supervising {} every {:?} (Ctrl-C to stop)",
        ctx.state_dir.display(),
        args.interval
    );

    // Created outside the loop so select! does not reset it each pass.
    let mut ticker = tokio::time::interval(args.interval);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let ctx = Arc::clone(&ctx);
                tokio::task::spawn_blocking(move || sweep_once(&ctx, retention)).await?;
            }
            _ = &mut ctrl_c => break,
        }
    }

    info!("supervisor stopped");
    Ok(())
}

#[cfg(test)]
#[path = "maintenance_tests.rs"]
mod tests;
