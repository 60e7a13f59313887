//! Configuration handling
//!
//! Configuration is stored in `.quest/config.toml` (project) with a global
//! fallback at the platform config dir (e.g. `~/.config/quest/config.toml`).
//! A project file overrides the global one wholesale.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse {0}: {1}")]
    Parse(PathBuf, String),
}

/// Focus (pomodoro) session settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FocusConfig {
    /// Length of a focus session in minutes
    pub work_minutes: u64,

    /// Length of the break suggested afterwards
    pub break_minutes: u64,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            break_minutes: 5,
        }
    }
}

/// Board display settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BoardConfig {
    /// Whether the dashboard shows the done column on startup
    pub show_done: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self { show_done: true }
    }
}

/// Combined configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub focus: FocusConfig,
    pub board: BoardConfig,
}

impl Config {
    /// Returns the global config file path, if a home directory is known
    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "quest", "quest-cli")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads configuration for a project: the project file if present,
    /// otherwise the global file, otherwise defaults
    pub fn load(project_root: &Path) -> Result<Self> {
        let project_path = project_root.join(".quest").join("config.toml");
        if project_path.is_file() {
            return Self::from_file(&project_path);
        }

        if let Some(global_path) = Self::global_config_path() {
            if global_path.is_file() {
                return Self::from_file(&global_path);
            }
        }

        Ok(Self::default())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config = toml::from_str(&raw)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e.to_string()))?;

        Ok(config)
    }
}
