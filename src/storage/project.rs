//! Project management
//!
//! Handles project initialization and provides access to the task store.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{Config, TaskStore};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a quest project. Run 'quest init' first.")]
    NotInProject,
}

/// A quest project rooted at a directory containing `.quest/`
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(".quest").is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::load(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Self::find_root().ok_or(ProjectError::NotInProject)?;
        Self::open(root)
    }

    /// Walks up from the current directory looking for `.quest/`
    fn find_root() -> Option<PathBuf> {
        let mut dir = env::current_dir().ok()?;
        loop {
            if dir.join(".quest").is_dir() {
                return Some(dir);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Initializes a new project at the given path
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let quest_dir = root.join(".quest");

        fs::create_dir_all(&quest_dir).with_context(|| {
            format!("Failed to create .quest directory: {}", quest_dir.display())
        })?;

        let config_path = quest_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# Quest CLI configuration

[focus]
# Length of a focus session in minutes
work_minutes = 25
# Suggested break length in minutes
break_minutes = 5

[board]
# Show the done column on the dashboard at startup
show_done = true
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the `.quest` directory path
    pub fn quest_dir(&self) -> PathBuf {
        self.root.join(".quest")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the task store for this project
    pub fn task_store(&self) -> TaskStore {
        TaskStore::new(self.quest_dir().join("tasks.jsonl"))
    }
}
