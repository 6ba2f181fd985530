use anyhow::{Result, bail};
use clap::Args;
use lanes_core::error::ErrorCode;
use lanes_core::input::InputFormat;
use lanes_core::{
    EntryIssue, GraphEntry, Passthrough, RowLayout, Severity, calculate, check_entries, timing,
};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::cmd::{project_config, source};
use crate::output::{CliError, OutputMode, pretty_kv, pretty_rule, render_error, render_mode};

/// Arguments for `lanes layout`.
#[derive(Args, Debug)]
pub struct LayoutArgs {
    /// Entry listing, newest first. Reads stdin when absent or `-`.
    pub file: Option<PathBuf>,

    /// Listing format: text, json, or jsonl. Defaults to `[input] format`.
    #[arg(long, value_name = "FORMAT")]
    pub input_format: Option<InputFormat>,

    /// Refuse listings with duplicate ids or parents above children.
    #[arg(long)]
    pub check: bool,
}

/// Payload for `lanes layout`.
#[derive(Debug, Serialize)]
pub struct LayoutReport<'a> {
    pub rows: &'a [RowLayout],
    pub width: usize,
    pub unresolved: &'a [Passthrough],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<EntryIssue>,
}

/// Execute `lanes layout`.
///
/// # Errors
///
/// Returns an error if the listing cannot be read, fails `--check`, or the
/// output cannot be written.
pub fn run_layout(args: &LayoutArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let config = project_config(project_root, output)?;
    let format = args.input_format.unwrap_or(config.input.format);
    let entries = source::load_entries(args.file.as_ref(), format, output)?;

    let issues = if args.check || config.layout.check_order {
        checked_issues(&entries, output)?
    } else {
        Vec::new()
    };

    let layout = timing::timed_rows("layout.calculate", entries.len(), || calculate(&entries));
    if layout.width() > config.layout.warn_width {
        warn!(
            width = layout.width(),
            limit = config.layout.warn_width,
            "layout is wider than layout.warn_width"
        );
    }
    if !layout.unresolved().is_empty() {
        info!(
            unresolved = layout.unresolved().len(),
            "some parents are outside the listing"
        );
    }

    let report = LayoutReport {
        rows: layout.rows(),
        width: layout.width(),
        unresolved: layout.unresolved(),
        issues,
    };
    let glyphs = config.render.glyphs;
    timing::timed_rows("layout.render", report.rows.len(), || {
        render_mode(output, &report, write_text, |r, w| write_pretty(r, glyphs, w))
    })
}

/// Run the order checker, logging every issue and refusing on errors.
fn checked_issues(entries: &[GraphEntry], output: OutputMode) -> Result<Vec<EntryIssue>> {
    let issues = timing::timed_rows("check.run", entries.len(), || check_entries(entries));
    for issue in &issues {
        warn!(row = issue.row(), "{issue}");
    }

    let errors = issues
        .iter()
        .filter(|issue| issue.severity() == Severity::Error)
        .count();
    if errors > 0 {
        let msg = format!("{errors} ordering error(s) in the listing");
        render_error(output, &CliError::from_code(ErrorCode::OrderViolation, &msg))?;
        bail!("{msg}");
    }
    Ok(issues)
}

fn join_lanes(lanes: &[usize]) -> String {
    if lanes.is_empty() {
        return "-".to_string();
    }
    lanes
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn join_passthroughs(passthroughs: &[Passthrough]) -> String {
    if passthroughs.is_empty() {
        return "-".to_string();
    }
    passthroughs
        .iter()
        .map(|p| format!("{}:{}", p.target, p.lane))
        .collect::<Vec<_>>()
        .join(",")
}

fn write_text(report: &LayoutReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "id\tlane\tchildren\tparents\tpassthrough")?;
    for row in report.rows {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}",
            row.change_id,
            row.lane,
            join_lanes(&row.child_lanes),
            join_lanes(&row.parent_lanes),
            join_passthroughs(&row.passthrough_lanes)
        )?;
    }
    Ok(())
}

/// Pretty output abbreviates ids to this many characters, like `git log --oneline`.
const SHORT_ID_LEN: usize = 12;

/// One cell per lane: `*` for the node, `|` for a line passing the node's
/// height, blank otherwise.
///
/// Lines passing row `i` are exactly the passthroughs of row `i - 1`.
fn lane_column(node: usize, passing: &[Passthrough], width: usize) -> String {
    let mut cells = String::with_capacity(width * 2);
    for lane in 0..width {
        let glyph = if lane == node {
            '*'
        } else if passing.iter().any(|p| p.lane == lane) {
            '|'
        } else {
            ' '
        };
        cells.push(glyph);
        cells.push(' ');
    }
    cells
}

fn row_tags(row: &RowLayout) -> &'static str {
    match (row.is_merge(), row.is_convergence()) {
        (true, true) => "  [merge, fork]",
        (true, false) => "  [merge]",
        (false, true) => "  [fork]",
        (false, false) => "",
    }
}

fn write_pretty(report: &LayoutReport<'_>, glyphs: bool, w: &mut dyn Write) -> io::Result<()> {
    let mut passing: &[Passthrough] = &[];
    for row in report.rows {
        let tags = row_tags(row);
        if glyphs {
            let column = lane_column(row.lane, passing, report.width);
            writeln!(w, "{column} {}{tags}", row.change_id.short(SHORT_ID_LEN))?;
        } else {
            let id = row.change_id.short(SHORT_ID_LEN);
            writeln!(w, "{id}  lane {}{tags}", row.lane)?;
        }
        passing = &row.passthrough_lanes;
    }

    pretty_rule(w)?;
    pretty_kv(w, "rows", report.rows.len().to_string())?;
    pretty_kv(w, "width", report.width.to_string())?;
    let unresolved = if report.unresolved.is_empty() {
        "none".to_string()
    } else {
        report
            .unresolved
            .iter()
            .map(|p| p.target.short(SHORT_ID_LEN))
            .collect::<Vec<_>>()
            .join(", ")
    };
    pretty_kv(w, "unresolved", unresolved)?;
    for issue in &report.issues {
        writeln!(w, "warning: {issue}")?;
    }
    Ok(())
}

/// Compute and render a listing in memory. Used by tests.
#[cfg(test)]
fn render_to_string(entries: &[GraphEntry], mode: OutputMode, glyphs: bool) -> String {
    let layout: lanes_core::GraphLayout = calculate(entries);
    let report = LayoutReport {
        rows: layout.rows(),
        width: layout.width(),
        unresolved: layout.unresolved(),
        issues: Vec::new(),
    };
    let mut buf = Vec::new();
    crate::output::write_mode(mode, &report, &mut buf, write_text, |r, w| {
        write_pretty(r, glyphs, w)
    })
    .expect("render");
    String::from_utf8(buf).expect("utf8")
}
