//! Rendering of decoded records for the terminal.
//!
//! Every renderer returns the full text to print, newline-terminated, so
//! the presentation layer only decides where it goes.

use crate::domain::records::{Campaign, DataFields, List, User};
use anyhow::{Result, anyhow};
use chrono::{Local, TimeZone};
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

pub const NIL_PLACEHOLDER: &str = "<nil>";
pub const MAX_VALUE_WIDTH: usize = 40;
const ELLIPSIS: &str = "...";
const COLUMN_PADDING: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    #[default]
    Table,
}

/// Cuts `s` to at most `max` characters, the last three being `...`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(ELLIPSIS.len())).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Renders one data-field value for a table cell.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => NIL_PLACEHOLDER.to_string(),
        Value::String(s) => truncate(s, MAX_VALUE_WIDTH),
        Value::Array(_) | Value::Object(_) => truncate(&value.to_string(), MAX_VALUE_WIDTH),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
    }
}

/// Flattens nested data fields into `(dotted.path, rendered value)` rows,
/// depth-first with keys in lexicographic order at every level.
pub fn flatten_fields(fields: &DataFields) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    flatten_into("", fields.iter().collect(), &mut rows);
    rows
}

fn flatten_into(prefix: &str, mut entries: Vec<(&String, &Value)>, rows: &mut Vec<(String, String)>) {
    entries.sort_by(|a, b| a.0.cmp(b.0));
    for (key, value) in entries {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(nested) => flatten_into(&path, nested.iter().collect(), rows),
            leaf => rows.push((path, format_value(leaf))),
        }
    }
}

/// Aligns cells into columns padded to the widest cell plus two spaces.
/// The last column is left unpadded.
pub fn render_table(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let mut out = String::new();
    for row in rows {
        let last = row.len().saturating_sub(1);
        for (i, cell) in row.iter().enumerate() {
            out.push_str(cell);
            if i < last {
                let pad = widths[i] - cell.width() + COLUMN_PADDING;
                out.extend(std::iter::repeat_n(' ', pad));
            }
        }
        out.push('\n');
    }
    out
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let pretty =
        serde_json::to_string_pretty(value).map_err(|e| anyhow!("Failed to format JSON: {}", e))?;
    Ok(pretty + "\n")
}

pub fn render_user(user: &User, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => render_json(user),
        OutputFormat::Table => {
            let rows: Vec<Vec<String>> = flatten_fields(&user.data_fields)
                .into_iter()
                .map(|(key, value)| vec![key, value])
                .collect();
            Ok(render_table(&rows))
        }
    }
}

pub fn render_lists(lists: &[List], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => render_json(lists),
        OutputFormat::Table => {
            let rows: Vec<Vec<String>> = lists
                .iter()
                .map(|list| {
                    vec![
                        list.id.to_string(),
                        list.name.clone(),
                        list.description.clone().unwrap_or_default(),
                        format_date(list.created_at),
                        list.list_type.clone(),
                    ]
                })
                .collect();
            Ok(render_table(&rows))
        }
    }
}

pub fn render_campaigns(campaigns: &[Campaign], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => render_json(campaigns),
        OutputFormat::Table => {
            let rows: Vec<Vec<String>> = campaigns
                .iter()
                .map(|campaign| {
                    vec![
                        campaign.id.to_string(),
                        campaign.name.clone(),
                        campaign.campaign_state.clone(),
                        campaign.message_medium.clone(),
                    ]
                })
                .collect();
            Ok(render_table(&rows))
        }
    }
}

/// Local calendar date of an epoch-milliseconds timestamp.
pub fn format_date(epoch_millis: i64) -> String {
    Local
        .timestamp_millis_opt(epoch_millis)
        .single()
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// List-member exports are printed as received, newline-terminated.
pub fn render_raw(body: &[u8]) -> Vec<u8> {
    let mut out = body.to_vec();
    if !out.ends_with(b"\n") {
        out.push(b'\n');
    }
    out
}
