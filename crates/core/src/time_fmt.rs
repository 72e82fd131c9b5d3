// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable durations: formatting for display, parsing for config and flags.

use std::time::Duration;
use thiserror::Error;

/// Format seconds as a short human-readable duration: `"5s"`, `"2m"`, `"1h30m"`, `"3d"`.
///
/// For the hours range, minutes are included when non-zero (e.g. `"1h"` vs `"1h5m"`).
pub fn format_elapsed(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86400 {
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        if m > 0 {
            format!("{}h{}m", h, m)
        } else {
            format!("{}h", h)
        }
    } else {
        format!("{}d", secs / 86400)
    }
}

/// Format milliseconds as a short human-readable duration.
pub fn format_elapsed_ms(ms: u64) -> String {
    format_elapsed(ms / 1000)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    #[error("empty duration")]
    Empty,
    #[error("invalid duration '{0}': expected a number with optional s, m, h or d suffix")]
    Invalid(String),
}

/// Parse `"30s"`, `"15m"`, `"2h"` or `"7d"`.
///
/// A bare number is read in `bare_unit`, so `gc --older-than 1` can mean one
/// day while a config value of `1800` can mean seconds.
pub fn parse_duration(input: &str, bare_unit: Duration) -> Result<Duration, DurationParseError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(DurationParseError::Empty);
    }

    let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (digits, suffix) = s.split_at(split);
    let n: u64 = digits
        .parse()
        .map_err(|_| DurationParseError::Invalid(input.to_string()))?;

    let unit = match suffix.trim() {
        "" => bare_unit,
        "ms" => Duration::from_millis(1),
        "s" | "sec" | "secs" => Duration::from_secs(1),
        "m" | "min" | "mins" => Duration::from_secs(60),
        "h" | "hr" | "hrs" => Duration::from_secs(3600),
        "d" | "day" | "days" => Duration::from_secs(86400),
        _ => return Err(DurationParseError::Invalid(input.to_string())),
    };

    u32::try_from(n)
        .ok()
        .and_then(|n| unit.checked_mul(n))
        .ok_or_else(|| DurationParseError::Invalid(input.to_string()))
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
