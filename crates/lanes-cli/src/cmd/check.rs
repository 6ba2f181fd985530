use anyhow::{Result, bail};
use clap::Args;
use lanes_core::error::ErrorCode;
use lanes_core::input::InputFormat;
use lanes_core::{EntryIssue, Severity, check_entries, timing};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::cmd::{project_config, source};
use crate::output::{CliError, OutputMode, pretty_kv, pretty_rule, render_error, render_mode};

/// Arguments for `lanes check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Entry listing, newest first. Reads stdin when absent or `-`.
    pub file: Option<PathBuf>,

    /// Listing format: text, json, or jsonl. Defaults to `[input] format`.
    #[arg(long, value_name = "FORMAT")]
    pub input_format: Option<InputFormat>,
}

/// Payload for `lanes check`.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub ok: bool,
    pub entries: usize,
    pub errors: usize,
    pub warnings: usize,
    pub issues: Vec<EntryIssue>,
}

impl CheckReport {
    fn new(entries: usize, issues: Vec<EntryIssue>) -> Self {
        let errors = issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Error)
            .count();
        Self {
            ok: errors == 0,
            entries,
            errors,
            warnings: issues.len() - errors,
            issues,
        }
    }
}

/// Execute `lanes check`.
///
/// # Errors
///
/// Returns an error if the listing cannot be read or contains any
/// error-severity issue.
pub fn run_check(args: &CheckArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let config = project_config(project_root, output)?;
    let format = args.input_format.unwrap_or(config.input.format);
    let entries = source::load_entries(args.file.as_ref(), format, output)?;

    let issues = timing::timed_rows("check.run", entries.len(), || check_entries(&entries));
    let report = CheckReport::new(entries.len(), issues);
    render_mode(output, &report, write_text, write_pretty)?;

    if !report.ok {
        let msg = format!("{} ordering error(s) in the listing", report.errors);
        render_error(output, &CliError::from_code(ErrorCode::OrderViolation, &msg))?;
        bail!("{msg}");
    }
    Ok(())
}

const fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    }
}

fn write_text(report: &CheckReport, w: &mut dyn Write) -> io::Result<()> {
    for issue in &report.issues {
        writeln!(
            w,
            "{}\t{}\t{issue}",
            severity_label(issue.severity()),
            issue.row()
        )?;
    }
    writeln!(
        w,
        "ok={} entries={} errors={} warnings={}",
        report.ok, report.entries, report.errors, report.warnings
    )
}

fn write_pretty(report: &CheckReport, w: &mut dyn Write) -> io::Result<()> {
    for issue in &report.issues {
        writeln!(w, "{}: {issue}", severity_label(issue.severity()))?;
    }
    if !report.issues.is_empty() {
        pretty_rule(w)?;
    }
    pretty_kv(w, "entries", report.entries.to_string())?;
    pretty_kv(w, "errors", report.errors.to_string())?;
    pretty_kv(w, "warnings", report.warnings.to_string())?;
    if report.ok {
        writeln!(w, "✓ listing is in child-before-parent order")?;
    }
    Ok(())
}
