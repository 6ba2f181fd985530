use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::input::InputFormat;

/// Relative location of the project config file.
pub const PROJECT_CONFIG_PATH: &str = ".lanes/config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub format: InputFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Run the order checker before every layout.
    #[serde(default)]
    pub check_order: bool,
    /// Log a warning when a layout needs more lanes than this.
    #[serde(default = "default_warn_width")]
    pub warn_width: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            check_order: false,
            warn_width: default_warn_width(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Draw the ASCII lane column in pretty output.
    #[serde(default = "default_true")]
    pub glyphs: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            glyphs: default_true(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub resolved_output: String,
}

#[must_use]
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_CONFIG_PATH)
}

#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lanes/config.toml"))
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_config_path(project_root);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(path) = user_config_path() else {
        return Ok(UserConfig::default());
    };
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load project and user config and record the output mode the caller
/// settled on. Output precedence lives with the front end; this only
/// normalizes the name it was given.
///
/// # Errors
///
/// Returns an error if either config file exists but cannot be read or parsed.
pub fn resolve_config(project_root: &Path, resolved_output: &str) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;

    Ok(EffectiveConfig {
        project,
        user,
        resolved_output: normalize_output_mode(resolved_output)
            .unwrap_or("text")
            .to_string(),
    })
}

/// Normalize an output mode name, accepting the legacy `human`/`table` aliases.
#[must_use]
pub fn normalize_output_mode(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pretty" | "human" => Some("pretty"),
        "text" | "table" => Some("text"),
        "json" => Some("json"),
        _ => None,
    }
}

const fn default_true() -> bool {
    true
}

const fn default_warn_width() -> usize {
    32
}
