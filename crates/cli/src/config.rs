// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `config.toml` in the state directory.
//!
//! The file only holds overrides; every key has a default. `config get`
//! reads the merged view, `config set` writes a single dotted key into the
//! file and refuses values that would make the file unloadable.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use t4a_core::{parse_duration, DurationParseError};
use t4a_engine::QueueConfig;
use thiserror::Error;
use toml::{Table, Value};

pub const CONFIG_FILE: &str = "config.toml";

const SECOND: Duration = Duration::from_secs(1);
const DAY: Duration = Duration::from_secs(24 * 3600);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to write config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid duration for {key}: {source}")]
    Duration {
        key: &'static str,
        source: DurationParseError,
    },
    #[error("invalid config key '{0}'")]
    InvalidKey(String),
    #[error("config key '{0}' is not set")]
    NotSet(String),
    #[error("cannot set '{0}': a parent key holds a value, not a table")]
    NotATable(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueSection {
    pub lease_timeout: String,
    pub max_attempts: u32,
    pub claim_retries: u32,
}

impl Default for QueueSection {
    fn default() -> Self {
        Self {
            lease_timeout: "30m".to_string(),
            max_attempts: 3,
            claim_retries: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcSection {
    pub retention: String,
}

impl Default for GcSection {
    fn default() -> Self {
        Self {
            retention: "7d".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionSection {
    pub enforce_resource_caps: bool,
}

/// Typed view of `config.toml` with defaults filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub queue: QueueSection,
    pub gc: GcSection,
    pub admission: AdmissionSection,
    /// Per-class concurrency caps used when caps are enforced.
    pub resources: BTreeMap<String, u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            queue: QueueSection::default(),
            gc: GcSection::default(),
            admission: AdmissionSection::default(),
            resources: BTreeMap::from([("api_concurrent".to_string(), 3), ("gpu".to_string(), 1)]),
        }
    }
}

impl Settings {
    /// Load settings from `dir`; a missing file means all defaults.
    ///
    /// Tables merge key by key, so a file naming one resource class keeps
    /// the default caps for the rest.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        Ok(Value::Table(merged(dir)?).try_into()?)
    }

    pub fn queue_config(&self) -> Result<QueueConfig, ConfigError> {
        let lease_timeout = parse_duration(&self.queue.lease_timeout, SECOND).map_err(|source| {
            ConfigError::Duration {
                key: "queue.lease_timeout",
                source,
            }
        })?;
        Ok(QueueConfig {
            lease_timeout,
            max_attempts: self.queue.max_attempts,
            claim_retries: self.queue.claim_retries,
        })
    }

    pub fn retention(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.gc.retention, DAY).map_err(|source| ConfigError::Duration {
            key: "gc.retention",
            source,
        })
    }
}

/// Defaults overlaid with the file's contents, as a TOML tree.
pub fn merged(dir: &Path) -> Result<Table, ConfigError> {
    let mut base = match Value::try_from(Settings::default())? {
        Value::Table(t) => t,
        _ => Table::new(),
    };
    overlay(&mut base, read_table(&dir.join(CONFIG_FILE))?);
    Ok(base)
}

/// Look up a dotted key in the merged configuration.
pub fn get(dir: &Path, key: &str) -> Result<Value, ConfigError> {
    let table = merged(dir)?;
    let mut current: Option<&Value> = None;
    for part in split_key(key)? {
        let next = match current {
            None => table.get(part),
            Some(Value::Table(t)) => t.get(part),
            Some(_) => None,
        };
        current = Some(next.ok_or_else(|| ConfigError::NotSet(key.to_string()))?);
    }
    current
        .cloned()
        .ok_or_else(|| ConfigError::NotSet(key.to_string()))
}

/// Write one dotted key into the config file, creating parent tables.
pub fn set(dir: &Path, key: &str, raw: &str) -> Result<Value, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    let mut file = read_table(&path)?;
    let parts = split_key(key)?;
    let value = parse_value(raw);

    let (leaf, parents) = parts
        .split_last()
        .ok_or_else(|| ConfigError::InvalidKey(key.to_string()))?;
    let mut table = &mut file;
    for part in parents {
        let entry = table
            .entry(part.to_string())
            .or_insert_with(|| Value::Table(Table::new()));
        table = match entry {
            Value::Table(t) => t,
            _ => return Err(ConfigError::NotATable(key.to_string())),
        };
    }
    table.insert(leaf.to_string(), value.clone());

    // Reject writes that would leave an unloadable file behind.
    let settings: Settings = Value::Table(file.clone()).try_into()?;
    settings.queue_config()?;
    settings.retention()?;

    std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    std::fs::write(&path, toml::to_string_pretty(&file)?)
        .map_err(|source| ConfigError::Io { path, source })?;
    Ok(value)
}

/// Integers, floats and booleans keep their type; anything else is a string.
pub fn parse_value(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        Value::Integer(i)
    } else if let Some(f) = raw
        .parse::<f64>()
        .ok()
        .filter(|_| raw.chars().any(|c| c.is_ascii_digit()))
    {
        Value::Float(f)
    } else if let Ok(b) = raw.parse::<bool>() {
        Value::Boolean(b)
    } else {
        Value::String(raw.to_string())
    }
}

/// Render a value for `config get`: strings bare, tables as TOML.
pub fn display_value(value: &Value) -> Result<String, ConfigError> {
    Ok(match value {
        Value::String(s) => s.clone(),
        Value::Table(t) => toml::to_string_pretty(t)?.trim_end().to_string(),
        other => other.to_string(),
    })
}

fn split_key(key: &str) -> Result<Vec<&str>, ConfigError> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|p| p.trim().is_empty()) {
        return Err(ConfigError::InvalidKey(key.to_string()));
    }
    Ok(parts)
}

fn read_table(path: &Path) -> Result<Table, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text.parse::<Table>()?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Table::new()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn overlay(base: &mut Table, over: Table) {
    for (key, value) in over {
        match value {
            Value::Table(o) if matches!(base.get(&key), Some(Value::Table(_))) => {
                if let Some(Value::Table(b)) = base.get_mut(&key) {
                    overlay(b, o);
                }
            }
            value => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
