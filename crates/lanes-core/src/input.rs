//! Reading entry listings from text.
//!
//! Three neutral formats are accepted. None of them is tied to a particular
//! version-control tool; whatever produces the listing is responsible for
//! ordering it children-first.
//!
//! - `text`: one entry per line, `<id> [<parent> ...]`, whitespace separated.
//!   Blank lines and lines starting with `#` are skipped.
//! - `json`: an array of `{"current": id, "parents": [id, ...]}` objects.
//! - `jsonl`: one such object per line; blank lines are skipped.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::{ChangeId, GraphEntry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    #[default]
    Text,
    Json,
    Jsonl,
}

impl InputFormat {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Jsonl => "jsonl",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown input format '{0}' (expected text, json, or jsonl)")]
pub struct UnknownFormat(String);

impl FromStr for InputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "jsonl" | "ndjson" => Ok(Self::Jsonl),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// Failure to turn text into entries. Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: empty change id")]
    EmptyId { line: usize },
}

impl InputError {
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::Json { line, .. } | Self::EmptyId { line } => *line,
        }
    }
}

/// Parse a whole listing in the given format.
pub fn parse_entries(content: &str, format: InputFormat) -> Result<Vec<GraphEntry>, InputError> {
    match format {
        InputFormat::Text => Ok(parse_text(content)),
        InputFormat::Json => parse_json(content),
        InputFormat::Jsonl => parse_jsonl(content),
    }
}

fn parse_text(content: &str) -> Vec<GraphEntry> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let current = fields.next()?;
            Some(GraphEntry::new(current, fields))
        })
        .collect()
}

fn parse_json(content: &str) -> Result<Vec<GraphEntry>, InputError> {
    let entries: Vec<GraphEntry> =
        serde_json::from_str(content).map_err(|source| InputError::Json {
            line: source.line(),
            source,
        })?;
    // JSON entries carry no line of their own; report the element index + 1.
    for (index, entry) in entries.iter().enumerate() {
        ensure_ids(entry, index + 1)?;
    }
    Ok(entries)
}

fn parse_jsonl(content: &str) -> Result<Vec<GraphEntry>, InputError> {
    let mut entries = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let entry: GraphEntry = serde_json::from_str(line).map_err(|source| InputError::Json {
            line: line_no,
            source,
        })?;
        ensure_ids(&entry, line_no)?;
        entries.push(entry);
    }
    Ok(entries)
}

fn ensure_ids(entry: &GraphEntry, line: usize) -> Result<(), InputError> {
    let blank = |id: &ChangeId| id.as_str().trim().is_empty();
    if blank(&entry.current) || entry.parents.iter().any(blank) {
        return Err(InputError::EmptyId { line });
    }
    Ok(())
}
