//! Shared output layer for pretty/text/JSON parity across CLI commands.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` / hidden `--json` flag
//! 2. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. `output` in the user config
//! 4. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use anyhow::bail;
use clap::ValueEnum;
use lanes_core::config::normalize_output_mode;
use lanes_core::error::ErrorCode;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<12} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (lane glyphs, sections, visual framing).
    Pretty,
    /// Tab-separated rows for scripts and pipes.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    /// Canonical name, as accepted by `--format` and the user config.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Text => "text",
            Self::Json => "json",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match normalize_output_mode(name)? {
            "json" => Some(Self::Json),
            "text" => Some(Self::Text),
            _ => Some(Self::Pretty),
        }
    }
}

/// Core resolution logic, separated from I/O for testability.
fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    user_output: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }

    if json_flag {
        return OutputMode::Json;
    }

    // Unknown values fall through to the next source.
    if let Some(mode) = format_env.and_then(OutputMode::from_name) {
        return mode;
    }

    if let Some(mode) = user_output.and_then(OutputMode::from_name) {
        return mode;
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from CLI flags, environment, user config, and TTY
/// defaults.
pub fn resolve_output_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    user_output: Option<&str>,
) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(
        format_flag,
        json_flag,
        env_val.as_deref(),
        user_output,
        is_tty,
    )
}

/// Render a serializable value with explicit pretty/text renderers.
///
/// A failed write to stdout is reported on stderr as `E5001`.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let stderr = io::stderr();
    render_into(
        mode,
        value,
        &mut stdout.lock(),
        &mut stderr.lock(),
        text_fn,
        pretty_fn,
    )
}

fn render_into<T: Serialize>(
    mode: OutputMode,
    value: &T,
    out: &mut dyn Write,
    err: &mut dyn Write,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let written = write_mode(mode, value, out, text_fn, pretty_fn).and_then(|()| {
        out.flush()?;
        Ok(())
    });
    if let Err(e) = written {
        let error = CliError::from_code(
            ErrorCode::OutputWriteFailed,
            format!("failed to write output: {e:#}"),
        );
        write_error(mode, &error, err)?;
        bail!("output write failed: {e:#}");
    }
    Ok(())
}

/// Same as [`render_mode`] but into any writer.
pub fn write_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    out: &mut dyn Write,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, out)?,
        OutputMode::Pretty => pretty_fn(value, out)?,
    }
    Ok(())
}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (`E####`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// Create a simple error with just a message.
    #[cfg(test)]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            error_code: None,
        }
    }

    /// Create an error carrying a catalog code and its remediation hint.
    pub fn from_code(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
        }
    }
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_error(mode, error, &mut out)
}

fn write_error(mode: OutputMode, error: &CliError, out: &mut dyn Write) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut *out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            match &error.error_code {
                Some(code) => writeln!(out, "error[{code}]: {}", error.message)?,
                None => writeln!(out, "error: {}", error.message)?,
            }
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── resolve_output_mode_inner ───────────────────────────────────────────

    #[test]
    fn resolve_format_flag_wins_over_everything() {
        let mode = resolve_output_mode_inner(
            Some(OutputMode::Text),
            true,
            Some("pretty"),
            Some("json"),
            true,
        );
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_json_flag_wins_over_env() {
        let mode = resolve_output_mode_inner(None, true, Some("pretty"), None, true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_env_wins_over_user_config() {
        let mode = resolve_output_mode_inner(None, false, Some("text"), Some("json"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_user_config_when_env_unset() {
        let mode = resolve_output_mode_inner(None, false, None, Some("json"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_accepts_legacy_aliases() {
        let mode = resolve_output_mode_inner(None, false, Some("TABLE"), None, true);
        assert_eq!(mode, OutputMode::Text);
        let mode = resolve_output_mode_inner(None, false, None, Some("human"), false);
        assert_eq!(mode, OutputMode::Pretty);
    }

    #[test]
    fn resolve_unknown_values_fall_through_to_tty() {
        let tty = resolve_output_mode_inner(None, false, Some("fancy"), Some("loud"), true);
        assert_eq!(tty, OutputMode::Pretty);
        let pipe = resolve_output_mode_inner(None, false, Some("fancy"), None, false);
        assert_eq!(pipe, OutputMode::Text);
    }

    // ── errors ──────────────────────────────────────────────────────────────

    #[test]
    fn cli_error_from_code_carries_hint() {
        let err = CliError::from_code(ErrorCode::OrderViolation, "2 order errors");
        assert_eq!(err.error_code.as_deref(), Some("E2003"));
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn error_json_is_wrapped() {
        let err = CliError::from_code(ErrorCode::InputParseError, "line 3: bad");
        let mut buf = Vec::new();
        write_error(OutputMode::Json, &err, &mut buf).expect("write");
        let value: serde_json::Value = serde_json::from_slice(&buf).expect("json");
        assert_eq!(value["error"]["error_code"], "E2002");
        assert_eq!(value["error"]["message"], "line 3: bad");
    }

    #[test]
    fn error_text_without_code_or_suggestion() {
        let err = CliError::new("boom");
        let mut buf = Vec::new();
        write_error(OutputMode::Text, &err, &mut buf).expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "error: boom\n");
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_stdout_write_is_e5001() {
        let value = serde_json::json!({"width": 2});
        for mode in [OutputMode::Text, OutputMode::Json] {
            let mut err = Vec::new();
            let result = render_into(
                mode,
                &value,
                &mut ClosedPipe,
                &mut err,
                |_, w| writeln!(w, "width\t2"),
                |_, w| writeln!(w, "width: 2"),
            );
            assert!(result.is_err());
            let stderr = String::from_utf8(err).expect("utf8");
            assert!(stderr.contains("E5001"), "{mode:?}: {stderr}");
        }
    }

    #[test]
    fn successful_render_leaves_stderr_empty() {
        let value = serde_json::json!({"width": 2});
        let mut out = Vec::new();
        let mut err = Vec::new();
        render_into(
            OutputMode::Pretty,
            &value,
            &mut out,
            &mut err,
            |_, w| writeln!(w, "text"),
            |_, w| writeln!(w, "pretty"),
        )
        .expect("render");
        assert_eq!(out, b"pretty\n");
        assert!(err.is_empty());
    }

    #[test]
    fn output_mode_names_round_trip_through_aliases() {
        for mode in [OutputMode::Pretty, OutputMode::Text, OutputMode::Json] {
            assert_eq!(OutputMode::from_name(mode.as_str()), Some(mode));
        }
    }

    #[test]
    fn write_mode_dispatches() {
        let value = serde_json::json!({"n": 1});
        let mut buf = Vec::new();
        write_mode(
            OutputMode::Text,
            &value,
            &mut buf,
            |_, w| writeln!(w, "text"),
            |_, w| writeln!(w, "pretty"),
        )
        .expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "text\n");

        let mut buf = Vec::new();
        write_mode(
            OutputMode::Json,
            &value,
            &mut buf,
            |_, w| writeln!(w, "text"),
            |_, w| writeln!(w, "pretty"),
        )
        .expect("write");
        let parsed: serde_json::Value = serde_json::from_slice(&buf).expect("json");
        assert_eq!(parsed["n"], 1);
    }
}
