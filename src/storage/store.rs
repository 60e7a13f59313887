//! JSONL storage for tasks
//!
//! Tasks live in `.quest/tasks.jsonl`, one JSON object per line. Line order
//! is the collection order the derived views key off, so reads return tasks
//! in file order and rewrites preserve it; `add` appends. Uses file locking
//! for concurrent access safety.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use fs2::FileExt;

use crate::domain::{DraftTask, Task, TaskStatus};

/// Store for task data in JSONL format
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    /// Creates a new task store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all tasks in collection (file) order
    pub fn list(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open task store: {}", self.path.display()))?;

        // Shared lock for reading
        file.lock_shared()
            .context("Failed to acquire read lock on task store")?;

        let reader = BufReader::new(&file);
        let mut tasks = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let task: Task = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse task at line {}", line_num + 1))?;

            tasks.push(task);
        }

        // Lock is released when file is dropped
        Ok(tasks)
    }

    /// Returns the task with the given id
    pub fn get(&self, id: u64) -> Result<Task> {
        self.list()?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| anyhow::anyhow!("Quest not found: {}", id))
    }

    /// Writes all tasks to the store, preserving the given order
    pub fn write_all(&self, tasks: &[Task]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Write to temp file first
        let temp_path = self.path.with_extension("jsonl.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            // Exclusive lock
            file.lock_exclusive()
                .context("Failed to acquire write lock on task store")?;

            let mut writer = BufWriter::new(&file);

            for task in tasks {
                let line = serde_json::to_string(task).context("Failed to serialize task")?;
                writeln!(writer, "{}", line).context("Failed to write task")?;
            }

            writer.flush().context("Failed to flush task store")?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    /// Appends a single task without rewriting the file
    fn append(&self, task: &Task) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open task store: {}", self.path.display()))?;

        file.lock_exclusive()
            .context("Failed to acquire write lock on task store")?;

        let mut writer = BufWriter::new(&file);
        let line = serde_json::to_string(task).context("Failed to serialize task")?;
        writeln!(writer, "{}", line).context("Failed to write task")?;

        writer.flush().context("Failed to flush task store")?;

        Ok(())
    }

    /// Creates a task with the next sequential id and appends it
    pub fn add(&self, title: &str) -> Result<Task> {
        let title = title.trim();
        if title.is_empty() {
            bail!("Quest title must not be empty");
        }

        let tasks = self.list()?;
        let id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;

        let task = Task::new(id, title);
        self.append(&task)?;
        Ok(task)
    }

    /// Removes a task by id; unknown ids are an error
    pub fn remove(&self, id: u64) -> Result<Task> {
        let mut tasks = self.list()?;
        let Some(pos) = tasks.iter().position(|t| t.id == id) else {
            bail!("Quest not found: {}", id);
        };

        let removed = tasks.remove(pos);
        self.write_all(&tasks)?;
        Ok(removed)
    }

    /// Sets a task's status and persists the change
    pub fn set_status(&self, id: u64, status: TaskStatus) -> Result<Task> {
        self.update(id, |task| task.set_status(status))
    }

    /// Replaces a task's dependency list as given.
    ///
    /// No validation here: unknown ids, self-references and duplicates are
    /// tolerated in storage and normalized by the stages engine.
    pub fn set_deps(&self, id: u64, deps: Vec<u64>) -> Result<Task> {
        self.update(id, |task| task.set_deps(deps))
    }

    /// Appends a parsed plan, allocating fresh ids in plan order and
    /// rewriting index references to the new ids
    pub fn import(&self, drafts: &[DraftTask]) -> Result<Vec<Task>> {
        let mut tasks = self.list()?;
        let next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;

        let ids: Vec<u64> = (0..drafts.len() as u64).map(|offset| next_id + offset).collect();

        let mut created = Vec::with_capacity(drafts.len());
        for (draft, &id) in drafts.iter().zip(&ids) {
            let mut task = Task::new(id, draft.title.as_str());
            task.set_deps(
                draft
                    .deps
                    .iter()
                    .filter(|&&index| index < ids.len())
                    .map(|&index| ids[index])
                    .collect(),
            );
            created.push(task);
        }

        tasks.extend(created.iter().cloned());
        self.write_all(&tasks)?;
        Ok(created)
    }

    fn update(&self, id: u64, mutate: impl FnOnce(&mut Task)) -> Result<Task> {
        let mut tasks = self.list()?;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            bail!("Quest not found: {}", id);
        };

        mutate(task);
        let updated = task.clone();
        self.write_all(&tasks)?;
        Ok(updated)
    }
}
