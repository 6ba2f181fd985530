use anyhow::{Context, Result, anyhow, bail};
use lanes_core::error::ErrorCode;
use clap::{Args, Subcommand};
use lanes_core::config::{
    EffectiveConfig, project_config_path, resolve_config, user_config_path,
};
use std::path::Path;
use toml::Value;

use crate::output::{CliError, OutputMode, render_error};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Show resolved or raw configuration
    Show(ShowArgs),
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// Show raw project config only
    #[arg(long, conflicts_with = "user")]
    project: bool,

    /// Show raw user config only
    #[arg(long)]
    user: bool,
}

pub fn run_config(args: &ConfigArgs, project_root: &Path, output: OutputMode) -> Result<()> {
    match &args.command {
        ConfigCommand::Show(show) => run_show(show, project_root, output),
    }
}

fn run_show(args: &ShowArgs, project_root: &Path, output: OutputMode) -> Result<()> {
    if args.project {
        let value = or_config_error(load_toml_table(&project_config_path(project_root)), output)?;
        print_toml_or_json(&value, output)?;
        return Ok(());
    }

    if args.user {
        let path = user_config_path().ok_or_else(|| anyhow!("No user config directory"))?;
        let value = or_config_error(load_toml_table(&path), output)?;
        print_toml_or_json(&value, output)?;
        return Ok(());
    }

    let effective = or_config_error(resolve_config(project_root, output.as_str()), output)?;
    print_effective(&effective, output)
}

/// Report a config load failure as `E1002` before propagating it.
fn or_config_error<T>(loaded: Result<T>, output: OutputMode) -> Result<T> {
    loaded.or_else(|e| {
        render_error(
            output,
            &CliError::from_code(ErrorCode::ConfigParseError, format!("{e:#}")),
        )?;
        Err(e)
    })
}

fn load_toml_table(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Ok(Value::Table(toml::map::Map::new()));
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let value: Value =
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

    if !value.is_table() {
        bail!("{} must contain a top-level TOML table", path.display());
    }

    Ok(value)
}

fn print_toml_or_json(value: &Value, output: OutputMode) -> Result<()> {
    match output {
        OutputMode::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputMode::Text | OutputMode::Pretty => print!("{}", toml::to_string_pretty(value)?),
    }
    Ok(())
}

fn effective_lines(value: &EffectiveConfig) -> Vec<(&'static str, String)> {
    let mut lines = vec![
        ("resolved_output", value.resolved_output.clone()),
        ("input.format", value.project.input.format.to_string()),
        ("layout.check_order", value.project.layout.check_order.to_string()),
        ("layout.warn_width", value.project.layout.warn_width.to_string()),
        ("render.glyphs", value.project.render.glyphs.to_string()),
    ];
    if let Some(out) = &value.user.output {
        lines.push(("user.output", out.clone()));
    }
    lines
}

fn print_effective(value: &EffectiveConfig, output: OutputMode) -> Result<()> {
    match output {
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        OutputMode::Text => {
            for (key, val) in effective_lines(value) {
                println!("{key}={val}");
            }
        }
        OutputMode::Pretty => {
            println!("resolved_output = \"{}\"", value.resolved_output);
            println!();
            print!("{}", toml::to_string_pretty(&value.project)?);
            if let Some(out) = &value.user.output {
                println!();
                println!("# user");
                println!("output = \"{out}\"");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanes_core::config::{ProjectConfig, UserConfig};

    #[test]
    fn missing_file_is_empty_table() {
        let dir = tempfile::tempdir().expect("temp dir");
        let value = load_toml_table(&dir.path().join("absent.toml")).expect("load");
        assert!(value.as_table().is_some_and(toml::map::Map::is_empty));
    }

    #[test]
    fn invalid_toml_names_the_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[layout\n").expect("write");
        let err = load_toml_table(&path).expect_err("invalid toml");
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn effective_lines_cover_every_key() {
        let value = EffectiveConfig {
            project: ProjectConfig::default(),
            user: UserConfig {
                output: Some("json".to_string()),
            },
            resolved_output: "text".to_string(),
        };
        let lines = effective_lines(&value);
        let keys: Vec<&str> = lines.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec![
                "resolved_output",
                "input.format",
                "layout.check_order",
                "layout.warn_width",
                "render.glyphs",
                "user.output",
            ]
        );
        assert_eq!(lines[1].1, "text");
        assert_eq!(lines[3].1, "32");
    }
}
