//! Crontab text → schedule entries.
//!
//! Grammar, per non-comment, non-blank line:
//!
//! ```text
//! <minute> <hour> <day-of-month> <month> <day-of-week> <command>
//! @weekly <command>
//! ```
//!
//! Fields are `*` or comma-separated non-negative integers; the command is
//! the rest of the line verbatim. The weekday field accepts the legacy
//! Sunday=0 spelling and normalizes it to ISO Sunday=7.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{CrontabError, Result};
use crate::types::{Entry, ShellCommand, TimeField};

/// Parse a whole crontab into entries, one per schedule line, in source
/// order. Any malformed line fails the whole parse.
pub fn parse_crontab(data: &str) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for (idx, raw) in data.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        debug!(line = line_no, text = line, "parsing crontab line");
        let entry = match line.strip_prefix('@') {
            Some(rest) => parse_shortcut(rest, line_no)?,
            None => parse_schedule_line(line, line_no)?,
        };
        entries.push(entry);
    }
    Ok(entries)
}

/// `@weekly <command>`: Monday 00:00, any day-of-month, any month.
fn parse_shortcut(rest: &str, line: usize) -> Result<Entry> {
    let (name, command) = rest
        .split_once(char::is_whitespace)
        .map(|(n, c)| (n, c.trim_start()))
        .filter(|(_, c)| !c.is_empty())
        .ok_or_else(|| CrontabError::Malformed {
            line,
            reason: "shortcut line needs a command".into(),
        })?;
    if name != "weekly" {
        return Err(CrontabError::UnsupportedShortcut {
            line,
            name: name.to_string(),
        });
    }
    Ok(Entry::new(
        ShellCommand::new(command),
        TimeField::values([0]),
        TimeField::values([0]),
        TimeField::Any,
        TimeField::Any,
        TimeField::values([1]),
    ))
}

fn parse_schedule_line(line: &str, line_no: usize) -> Result<Entry> {
    let (fields, command) = split_fields(line).ok_or_else(|| CrontabError::Malformed {
        line: line_no,
        reason: "expected five time fields followed by a command".into(),
    })?;
    Ok(Entry::new(
        ShellCommand::new(command),
        parse_field(fields[0], line_no, None)?,
        parse_field(fields[1], line_no, None)?,
        parse_field(fields[2], line_no, None)?,
        parse_field(fields[3], line_no, None)?,
        parse_field(fields[4], line_no, Some(sunday_zero_to_iso))?,
    ))
}

/// Split a trimmed line into its five time fields and the verbatim command
/// remainder (internal whitespace preserved). `None` if anything is missing.
fn split_fields(line: &str) -> Option<([&str; 5], &str)> {
    let mut rest = line;
    let mut fields = [""; 5];
    for field in fields.iter_mut() {
        rest = rest.trim_start();
        let end = rest.find(char::is_whitespace)?;
        *field = &rest[..end];
        rest = &rest[end..];
    }
    let command = rest.trim_start();
    if command.is_empty() {
        return None;
    }
    Some((fields, command))
}

/// `*` → wildcard; otherwise a comma-separated integer list, each value
/// passed through `converter` when one is given.
fn parse_field(token: &str, line: usize, converter: Option<fn(u32) -> u32>) -> Result<TimeField> {
    if token == "*" {
        return Ok(TimeField::Any);
    }
    let mut values = BTreeSet::new();
    for part in token.split(',') {
        let n: u32 = part.parse().map_err(|_| CrontabError::Malformed {
            line,
            reason: format!("invalid field value '{token}'"),
        })?;
        values.insert(converter.map_or(n, |conv| conv(n)));
    }
    Ok(TimeField::Values(values))
}

/// Legacy crontabs spell Sunday as 0; entry matching uses ISO 1–7.
fn sunday_zero_to_iso(dow: u32) -> u32 {
    if dow == 0 {
        7
    } else {
        dow
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
