// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! t4a - task queue for agents

mod color;
mod commands;
mod config;
mod context;
mod env;
mod logging;
mod output;
mod table;

use output::OutputFormat;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config as config_cmd, job, list, maintenance, status};

use crate::context::Context;

#[derive(Parser)]
#[command(
    name = "t4a",
    version,
    about = "t4a - Task queue for agents",
    arg_required_else_help = true
)]
struct Cli {
    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a job to the queue
    Add(job::AddArgs),
    /// List jobs in scheduling order
    List(list::ListArgs),
    /// Show queue counts, or one job in detail
    Status(status::StatusArgs),
    /// Claim a job (the next eligible one if no id is given)
    Claim(job::ClaimArgs),
    /// Mark a running job done
    Complete(job::CompleteArgs),
    /// Mark a running job failed
    Fail(job::FailArgs),
    /// Pause a running job so it can be claimed again later
    Pause(job::IdArgs),
    /// Change a job's priority
    Priority(job::PriorityArgs),
    /// Report progress on a running job (also a heartbeat)
    Progress(job::ProgressArgs),
    /// Record a checkpoint on a running job
    Checkpoint(job::CheckpointArgs),
    /// Approve a job that requires sign-off
    Approve(job::IdArgs),
    /// Append a line to a job's log
    Log(job::LogArgs),
    /// Print a job's log
    Logs(job::IdArgs),
    /// Read or write configuration
    Config(config_cmd::ConfigArgs),
    /// Return stalled running jobs to the queue
    Recover(maintenance::RecoverArgs),
    /// Remove old finished jobs
    Gc(maintenance::GcArgs),
    /// Run recover and gc periodically until Ctrl-C
    Supervise(maintenance::SuperviseArgs),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(1);
    }
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains the source error text, we skip
/// the "Caused by" chain to avoid noisy duplicate output (common when
/// thiserror variants use `#[error("... {0}")]` with `#[from]`).
/// Otherwise we render the full chain so context isn't lost.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;

    let state_dir = env::state_dir()?;
    let _log_guard = logging::init(&state_dir)?;

    let command = match cli.command {
        // Config edits must work even when the current file fails to load.
        Commands::Config(args) => return config_cmd::handle(args, &state_dir, format),
        command => command,
    };

    let ctx = Context::open(state_dir)?;
    match command {
        Commands::Add(args) => job::add(args, &ctx, format)?,
        Commands::List(args) => list::handle(args, &ctx, format)?,
        Commands::Status(args) => status::handle(args, &ctx, format)?,
        Commands::Claim(args) => job::claim(args, &ctx, format)?,
        Commands::Complete(args) => job::complete(args, &ctx, format)?,
        Commands::Fail(args) => job::fail(args, &ctx, format)?,
        Commands::Pause(args) => job::pause(args, &ctx, format)?,
        Commands::Priority(args) => job::priority(args, &ctx, format)?,
        Commands::Progress(args) => job::progress(args, &ctx, format)?,
        Commands::Checkpoint(args) => job::checkpoint(args, &ctx, format)?,
        Commands::Approve(args) => job::approve(args, &ctx, format)?,
        Commands::Log(args) => job::log(args, &ctx, format)?,
        Commands::Logs(args) => job::logs(args, &ctx, format)?,
        Commands::Recover(args) => maintenance::recover(args, &ctx, format)?,
        Commands::Gc(args) => maintenance::gc(args, &ctx, format)?,
        Commands::Supervise(args) => maintenance::supervise(args, ctx).await?,
        Commands::Config(_) => {}
    }

    Ok(())
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
