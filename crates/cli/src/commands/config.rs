// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `t4a config` - read and write `config.toml`

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config;
use crate::output::{print_json, OutputFormat};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print a value or section (e.g. queue.lease_timeout, resources)
    Get {
        /// Dotted key
        key: String,
    },
    /// Set a value; numbers and booleans keep their type
    Set {
        /// Dotted key
        key: String,
        value: String,
    },
}

pub fn handle(args: ConfigArgs, state_dir: &Path, format: OutputFormat) -> Result<()> {
    match args.command {
        ConfigCommand::Get { key } => {
            let value = config::get(state_dir, &key)?;
            match format {
                OutputFormat::Text => println!("{}", config::display_value(&value)?),
                OutputFormat::Json => print_json(&value)?,
            }
        }
        ConfigCommand::Set { key, value } => {
            let stored = config::set(state_dir, &key, &value)?;
            match format {
                OutputFormat::Text => println!("{key} = {stored}"),
                OutputFormat::Json => print_json(&serde_json::json!({
                    "key": key,
                    "value": stored,
                }))?,
            }
        }
    }
    Ok(())
}
