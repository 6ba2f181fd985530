pub mod check;
pub mod completions;
pub mod config;
pub mod layout;
pub mod source;

use anyhow::Result;
use lanes_core::config::{ProjectConfig, load_project_config};
use lanes_core::error::ErrorCode;
use std::path::Path;

use crate::output::{CliError, OutputMode, render_error};

/// Load `.lanes/config.toml`, reporting parse failures as `E1002`.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed.
pub fn project_config(project_root: &Path, output: OutputMode) -> Result<ProjectConfig> {
    match load_project_config(project_root) {
        Ok(config) => Ok(config),
        Err(e) => {
            render_error(
                output,
                &CliError::from_code(ErrorCode::ConfigParseError, format!("{e:#}")),
            )?;
            Err(e)
        }
    }
}
