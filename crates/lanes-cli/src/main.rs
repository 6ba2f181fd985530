#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use lanes_core::config::load_user_config;
use lanes_core::timing;
use output::OutputMode;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "lanes: minimal-width lane layout for commit graphs",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit command timing report to stderr.
    #[arg(long, global = true)]
    timing: bool,

    /// Output format. Defaults to pretty on a terminal, text when piped.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Assign lanes to a newest-first entry listing",
        long_about = "Read a children-first listing of changes and their parents, \
                      then print the lane of every node, parent line and passing line.",
        after_help = "EXAMPLES:\n    # Lay out a text listing\n    lanes layout log.txt\n\n    # Read JSON lines from stdin\n    cat log.jsonl | lanes layout --input-format jsonl\n\n    # Refuse out-of-order listings\n    lanes layout --check log.txt --json"
    )]
    Layout(cmd::layout::LayoutArgs),

    #[command(
        about = "Check that a listing is in child-before-parent order",
        after_help = "EXAMPLES:\n    # Check a listing, exit non-zero on errors\n    lanes check log.txt"
    )]
    Check(cmd::check::CheckArgs),

    #[command(about = "Inspect configuration")]
    Config(cmd::config::ConfigArgs),

    #[command(about = "Generate shell completion scripts")]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env("LANES_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "lanes=debug,lanes_core=debug,info"
        } else if quiet {
            "error"
        } else {
            "lanes=info,lanes_core=info,warn"
        })
    });

    let format = env::var("LANES_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// The user config's preferred output mode. An unreadable user config is
/// skipped with a warning here; `config show` reports it as `E1002`.
fn user_output() -> Option<String> {
    match load_user_config() {
        Ok(user) => user.output,
        Err(e) => {
            warn!(error = %format!("{e:#}"), "ignoring unreadable user config");
            None
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let timing_enabled = cli.timing || timing::timing_enabled_from_env();
    timing::set_timing_enabled(timing_enabled);
    timing::clear_timings();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let output = output::resolve_output_mode(cli.format, cli.json, user_output().as_deref());

    let command_result = match cli.command {
        Commands::Layout(ref args) => timing::timed("cmd.layout", || {
            cmd::layout::run_layout(args, output, &project_root)
        }),
        Commands::Check(ref args) => timing::timed("cmd.check", || {
            cmd::check::run_check(args, output, &project_root)
        }),
        Commands::Config(ref args) => timing::timed("cmd.config", || {
            cmd::config::run_config(args, &project_root, output)
        }),
        Commands::Completions(ref args) => timing::timed("cmd.completions", || {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command, output)
        }),
    };

    if timing_enabled {
        let report = timing::collect_report();
        if report.is_empty() {
            eprintln!("timing report: no samples recorded");
        } else {
            eprintln!("timing report:");
            eprintln!("{}", report.display_table());
            eprintln!("timing report (json):");
            eprintln!("{}", serde_json::to_string_pretty(&report.to_json())?);
        }
    }

    command_result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_flag_parses_before_subcommand() {
        let cli = Cli::parse_from(["lanes", "--timing", "check"]);
        assert!(cli.timing);
        assert!(matches!(cli.command, Commands::Check(_)));
    }

    #[test]
    fn timing_flag_parses_after_subcommand() {
        let cli = Cli::parse_from(["lanes", "layout", "log.txt", "--timing"]);
        assert!(cli.timing);
        match cli.command {
            Commands::Layout(args) => {
                assert_eq!(args.file.as_deref(), Some(std::path::Path::new("log.txt")));
                assert!(!args.check);
            }
            other => panic!("expected layout, got {other:?}"),
        }
    }

    #[test]
    fn format_flag_parses() {
        let cli = Cli::parse_from(["lanes", "--format", "json", "check"]);
        assert_eq!(cli.format, Some(OutputMode::Json));
        let cli = Cli::parse_from(["lanes", "layout", "--format", "text"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["lanes", "layout", "--json"]);
        assert!(cli.json);
    }

    #[test]
    fn input_format_parses_aliases() {
        let cli = Cli::parse_from(["lanes", "layout", "--input-format", "ndjson", "--check"]);
        match cli.command {
            Commands::Layout(args) => {
                assert_eq!(
                    args.input_format,
                    Some(lanes_core::input::InputFormat::Jsonl)
                );
                assert!(args.check);
            }
            other => panic!("expected layout, got {other:?}"),
        }
    }

    #[test]
    fn unknown_input_format_is_rejected() {
        let result = Cli::try_parse_from(["lanes", "check", "--input-format", "yaml"]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_and_verbose_are_global() {
        let cli = Cli::parse_from(["lanes", "check", "-q"]);
        assert!(cli.quiet);
        let cli = Cli::parse_from(["lanes", "config", "show", "-v"]);
        assert!(cli.verbose);
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
