// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `t4a list` - queue listing in scheduling order.

use anyhow::{bail, Result};
use clap::Args;
use t4a_core::{JobState, MAX_PRIORITY};
use t4a_engine::JobFilter;

use crate::context::Context;
use crate::output::{job_table, print_json, OutputFormat};

#[derive(Args)]
pub struct ListArgs {
    /// Include running and finished jobs
    #[arg(short, long)]
    pub all: bool,
    /// Only jobs in this state (can be repeated)
    #[arg(short, long = "state")]
    pub states: Vec<JobState>,
    /// Only jobs at or above this priority
    #[arg(long)]
    pub min_priority: Option<u8>,
}

fn filter_for(args: &ListArgs) -> Result<JobFilter> {
    let mut filter = if !args.states.is_empty() {
        JobFilter {
            states: Some(args.states.clone()),
            min_priority: None,
        }
    } else if args.all {
        JobFilter::all()
    } else {
        JobFilter::eligible()
    };
    if let Some(min) = args.min_priority {
        if min > MAX_PRIORITY {
            bail!("--min-priority must be between 0 and {MAX_PRIORITY}");
        }
        filter = filter.min_priority(min);
    }
    Ok(filter)
}

pub fn handle(args: ListArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let jobs = ctx.queue.list(&filter_for(&args)?)?;
    match format {
        OutputFormat::Text => {
            if jobs.is_empty() {
                println!("No jobs");
                return Ok(());
            }
            job_table(&jobs).render(&mut std::io::stdout())?;
        }
        OutputFormat::Json => print_json(&jobs)?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
