use anyhow::{Result, bail};
use clap::Args;
use clap_complete::{Shell, generate};
use lanes_core::error::ErrorCode;
use std::io::Write;

use crate::output::{CliError, OutputMode, render_error};

/// Arguments for `lanes completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script generation.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Completion script for `lanes` in `shell`.
fn completion_script(shell: Shell, command: &mut clap::Command) -> Vec<u8> {
    let mut script = Vec::new();
    generate(shell, command, "lanes", &mut script);
    script
}

/// Print the completion script, reporting a closed stdout as `E5001`.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn run_completions(
    shell: Shell,
    command: &mut clap::Command,
    output: OutputMode,
) -> Result<()> {
    let script = completion_script(shell, command);
    let mut out = std::io::stdout().lock();
    if let Err(e) = out.write_all(&script).and_then(|()| out.flush()) {
        let msg = format!("failed to write {shell} completions: {e}");
        render_error(output, &CliError::from_code(ErrorCode::OutputWriteFailed, &msg))?;
        bail!("{msg}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, Command};

    fn lanes_like() -> Command {
        Command::new("lanes")
            .subcommand(Command::new("layout").arg(Arg::new("file")))
            .subcommand(Command::new("check"))
    }

    #[test]
    fn bash_script_registers_lanes_and_subcommands() {
        let script = completion_script(Shell::Bash, &mut lanes_like());
        let script = String::from_utf8(script).expect("utf8");
        assert!(script.contains("complete -F _lanes"), "{script}");
        assert!(script.contains("layout"));
        assert!(script.contains("check"));
    }

    #[test]
    fn zsh_script_uses_compdef_header() {
        let script = completion_script(Shell::Zsh, &mut lanes_like());
        let script = String::from_utf8(script).expect("utf8");
        assert!(script.starts_with("#compdef lanes"), "{script}");
    }
}
