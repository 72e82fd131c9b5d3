// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job commands: create, claim, report, finish, approve, log.

use anyhow::{bail, Result};
use clap::Args;
use t4a_core::{is_job_id, Job, JobSpec};

use crate::context::Context;
use crate::output::{format_created, print_json, OutputFormat};

#[derive(Args)]
pub struct AddArgs {
    /// What the job should do
    pub title: String,
    /// Priority 0-100, higher runs first
    #[arg(short, long, allow_negative_numbers = true)]
    pub priority: Option<i64>,
    /// GPUs required (shorthand for --resource gpu=N)
    #[arg(long)]
    pub gpu: Option<u32>,
    /// Resource requirement (can be repeated: --resource api=1)
    #[arg(long = "resource", value_parser = parse_resource)]
    pub resources: Vec<(String, u32)>,
    /// Hold the job until someone runs `t4a approve`
    #[arg(long)]
    pub requires_approval: bool,
    /// Job that must be done first (can be repeated)
    #[arg(long = "depends-on")]
    pub depends_on: Vec<String>,
}

#[derive(Args)]
pub struct ClaimArgs {
    /// Job ID or prefix; omit to take the head of the queue
    pub id: Option<String>,
    /// Owner recorded on the job (default: $T4A_OWNER or agent-<pid>)
    #[arg(long)]
    pub owner: Option<String>,
}

#[derive(Args)]
pub struct IdArgs {
    /// Job ID or prefix
    pub id: String,
}

#[derive(Args)]
pub struct CompleteArgs {
    /// Job ID or prefix
    pub id: String,
    /// What was accomplished
    #[arg(short, long)]
    pub summary: Option<String>,
}

#[derive(Args)]
pub struct FailArgs {
    /// Job ID or prefix
    pub id: String,
    /// Why the job failed
    #[arg(short, long)]
    pub error: Option<String>,
}

#[derive(Args)]
pub struct PriorityArgs {
    /// Job ID or prefix
    pub id: String,
    /// New priority 0-100
    #[arg(allow_negative_numbers = true)]
    pub priority: i64,
}

#[derive(Args)]
pub struct ProgressArgs {
    /// Job ID or prefix
    pub id: String,
    /// Percent complete, 0-100
    #[arg(allow_negative_numbers = true)]
    pub percent: i64,
    #[arg(short, long)]
    pub message: Option<String>,
}

#[derive(Args)]
pub struct CheckpointArgs {
    /// Job ID or prefix
    pub id: String,
    #[arg(short, long)]
    pub message: String,
}

#[derive(Args)]
pub struct LogArgs {
    /// Job ID or prefix
    pub id: String,
    /// Text to append (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub line: Vec<String>,
}

fn parse_resource(s: &str) -> Result<(String, u32), String> {
    let (class, qty) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid resource '{s}': must be class=N"))?;
    let class = class.trim();
    if class.is_empty() {
        return Err(format!("invalid resource '{s}': empty class"));
    }
    let qty = qty
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid resource '{s}': quantity must be a whole number"))?;
    Ok((class.to_string(), qty))
}

fn build_spec(args: AddArgs) -> Result<JobSpec> {
    let mut builder = JobSpec::builder(args.title).requires_approval(args.requires_approval);
    if let Some(priority) = args.priority {
        builder = builder.priority(priority);
    }
    if let Some(gpu) = args.gpu {
        builder = builder.resource("gpu", gpu);
    }
    for (class, qty) in args.resources {
        builder = builder.resource(class, qty);
    }
    for dep in args.depends_on {
        if !is_job_id(&dep) {
            bail!("invalid job id '{dep}' for --depends-on (expected job-xxxxxxxx)");
        }
        builder = builder.depends_on(dep);
    }
    Ok(builder.build())
}

/// Print the job as JSON, or `text` otherwise.
fn report(job: &Job, format: OutputFormat, text: impl FnOnce(&Job) -> String) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", text(job)),
        OutputFormat::Json => print_json(job)?,
    }
    Ok(())
}

pub fn add(args: AddArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let job = ctx.queue.create(build_spec(args)?)?;
    report(&job, format, format_created)
}

pub fn claim(args: ClaimArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let owner = args.owner.unwrap_or_else(crate::env::owner);
    let job = match args.id {
        Some(id) => {
            let target = ctx.job(&id)?;
            ctx.queue.claim(target.id.as_str(), &owner)?
        }
        None => match ctx.queue.claim_next(&owner)? {
            Some(job) => job,
            None => bail!("no claimable jobs"),
        },
    };
    report(&job, format, |j| j.id.to_string())
}

pub fn complete(args: CompleteArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let target = ctx.job(&args.id)?;
    let job = ctx
        .queue
        .complete(target.id.as_str(), args.summary.as_deref())?;
    report(&job, format, |j| format!("Completed {}", j.id))
}

pub fn fail(args: FailArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let target = ctx.job(&args.id)?;
    let job = ctx.queue.fail(target.id.as_str(), args.error.as_deref())?;
    report(&job, format, |j| format!("Failed {}", j.id))
}

pub fn pause(args: IdArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let target = ctx.job(&args.id)?;
    let job = ctx.queue.pause(target.id.as_str())?;
    report(&job, format, |j| format!("Paused {}", j.id))
}

pub fn priority(args: PriorityArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let target = ctx.job(&args.id)?;
    let job = ctx.queue.update_priority(target.id.as_str(), args.priority)?;
    report(&job, format, |j| format!("{} priority {}", j.id, j.priority))
}

pub fn progress(args: ProgressArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let target = ctx.job(&args.id)?;
    let job = ctx
        .queue
        .progress(target.id.as_str(), args.percent, args.message.as_deref())?;
    report(&job, format, |j| format!("{} {}%", j.id, args.percent))
}

pub fn checkpoint(args: CheckpointArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let target = ctx.job(&args.id)?;
    let job = ctx.queue.checkpoint(target.id.as_str(), &args.message)?;
    report(&job, format, |j| {
        format!("{} checkpoint {}", j.id, j.checkpoints.len())
    })
}

pub fn approve(args: IdArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let target = ctx.job(&args.id)?;
    let job = ctx.queue.approve(target.id.as_str())?;
    report(&job, format, |j| format!("Approved {}", j.id))
}

pub fn log(args: LogArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let target = ctx.job(&args.id)?;
    let job = ctx
        .queue
        .append_log(target.id.as_str(), &args.line.join(" "))?;
    match format {
        OutputFormat::Text => {}
        OutputFormat::Json => print_json(&job)?,
    }
    Ok(())
}

pub fn logs(args: IdArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let target = ctx.job(&args.id)?;
    let lines = ctx.queue.logs(target.id.as_str())?;
    match format {
        OutputFormat::Text => {
            for line in &lines {
                println!("{line}");
            }
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "id": target.id,
            "lines": lines,
        }))?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
