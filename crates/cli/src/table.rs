// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Column-aligned renderer for job listings.
//!
//! Widths count characters, not bytes, so titles with non-ASCII text line
//! up and truncate on character boundaries.

use std::io::Write;

use crate::color;

/// Column text alignment.
pub enum Align {
    Left,
    Right,
}

/// How a cell's text is styled after padding.
pub enum CellStyle {
    Plain,
    Muted,
    /// Job state coloring via [`color::apply_status`].
    Status,
}

/// A column definition in a [`Table`].
pub struct Column {
    pub name: &'static str,
    pub align: Align,
    pub style: CellStyle,
    /// Values longer than this are truncated (`None` = unlimited).
    pub max_width: Option<usize>,
}

impl Column {
    fn new(name: &'static str, align: Align, style: CellStyle) -> Self {
        Self {
            name,
            align,
            style,
            max_width: None,
        }
    }

    pub fn left(name: &'static str) -> Self {
        Self::new(name, Align::Left, CellStyle::Plain)
    }

    pub fn right(name: &'static str) -> Self {
        Self::new(name, Align::Right, CellStyle::Plain)
    }

    pub fn muted(name: &'static str) -> Self {
        Self::new(name, Align::Left, CellStyle::Muted)
    }

    pub fn status(name: &'static str) -> Self {
        Self::new(name, Align::Left, CellStyle::Status)
    }

    pub fn with_max(mut self, max: usize) -> Self {
        self.max_width = Some(max);
        self
    }
}

/// A tabular renderer that auto-computes column widths from data.
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
    colorize: bool,
    header: bool,
}

/// Column separator: double space.
const SEP: &str = "  ";

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            colorize: color::should_colorize(),
            header: true,
        }
    }

    /// Create a table that never emits color codes.
    #[cfg(test)]
    pub fn plain(columns: Vec<Column>) -> Self {
        Self {
            colorize: false,
            ..Self::new(columns)
        }
    }

    /// Create a table that always emits color codes.
    #[cfg(test)]
    pub fn colored(columns: Vec<Column>) -> Self {
        Self {
            colorize: true,
            ..Self::new(columns)
        }
    }

    /// Omit the header row, so the first line is the first job.
    pub fn headless(mut self) -> Self {
        self.header = false;
        self
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// Render header (unless headless) and rows to `out`.
    ///
    /// The last column is never padded. Color is applied after padding so
    /// escape codes don't count toward widths.
    pub fn render(&self, out: &mut impl Write) -> std::io::Result<()> {
        if self.rows.is_empty() {
            return Ok(());
        }
        let widths = self.compute_widths();
        let last = self.columns.len().saturating_sub(1);

        if self.header {
            let cells: Vec<String> = self
                .columns
                .iter()
                .enumerate()
                .map(|(i, col)| {
                    let padded = fit(col.name, widths[i], &col.align, i == last);
                    if self.colorize {
                        color::apply_header(&padded)
                    } else {
                        padded
                    }
                })
                .collect();
            writeln!(out, "{}", cells.join(SEP))?;
        }

        for row in &self.rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .enumerate()
                .map(|(i, col)| {
                    let raw = row.get(i).map(String::as_str).unwrap_or("");
                    let text = truncate(raw, col.max_width);
                    let padded = fit(text, widths[i], &col.align, i == last);
                    stylize(&padded, &col.style, self.colorize)
                })
                .collect();
            writeln!(out, "{}", cells.join(SEP))?;
        }
        Ok(())
    }

    fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let header = if self.header { width(col.name) } else { 0 };
                let data = self
                    .rows
                    .iter()
                    .map(|row| {
                        let w = row.get(i).map(|s| width(s)).unwrap_or(0);
                        col.max_width.map_or(w, |max| w.min(max))
                    })
                    .max()
                    .unwrap_or(0);
                header.max(data)
            })
            .collect()
    }
}

fn width(s: &str) -> usize {
    s.chars().count()
}

/// Pad to `width`, except a left-aligned last column which stays ragged.
fn fit(text: &str, width: usize, align: &Align, is_last: bool) -> String {
    match align {
        Align::Left if is_last => text.to_string(),
        Align::Left => format!("{:<width$}", text),
        Align::Right => format!("{:>width$}", text),
    }
}

fn truncate(s: &str, max: Option<usize>) -> &str {
    match max {
        Some(m) => s.char_indices().nth(m).map_or(s, |(idx, _)| &s[..idx]),
        None => s,
    }
}

fn stylize(text: &str, style: &CellStyle, colorize: bool) -> String {
    if !colorize {
        return text.to_string();
    }
    match style {
        CellStyle::Plain => text.to_string(),
        CellStyle::Muted => color::apply_muted(text),
        CellStyle::Status => color::apply_status(text),
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
