//! Reading entry listings from a file or stdin.

use anyhow::{Context, Result, bail};
use lanes_core::GraphEntry;
use lanes_core::error::ErrorCode;
use lanes_core::input::{InputFormat, parse_entries};
use lanes_core::timing;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::output::{CliError, OutputMode, render_error};

/// `None` and `-` both mean stdin.
fn is_stdin(file: Option<&Path>) -> bool {
    file.is_none_or(|path| path.as_os_str() == "-")
}

fn read_content(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if !is_stdin(file) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read stdin")?;
            Ok(content)
        }
    }
}

/// Read and parse a listing, rendering failures in the requested output mode.
///
/// # Errors
///
/// Returns an error if the source cannot be read or does not parse in
/// `format`.
pub fn load_entries(
    file: Option<&PathBuf>,
    format: InputFormat,
    output: OutputMode,
) -> Result<Vec<GraphEntry>> {
    let file = file.map(PathBuf::as_path);
    let content = match timing::timed("input.read", || read_content(file)) {
        Ok(content) => content,
        Err(e) => {
            render_error(
                output,
                &CliError::from_code(ErrorCode::InputReadFailed, format!("{e:#}")),
            )?;
            return Err(e);
        }
    };

    match parse_entries(&content, format) {
        Ok(entries) => {
            debug!(
                entries = entries.len(),
                %format,
                stdin = is_stdin(file),
                "loaded entry listing"
            );
            Ok(entries)
        }
        Err(e) => {
            let msg = format!("{format} input, {e}");
            render_error(output, &CliError::from_code(ErrorCode::InputParseError, &msg))?;
            bail!("{msg}");
        }
    }
}
