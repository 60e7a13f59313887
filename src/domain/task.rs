//! Task domain model
//!
//! Tasks ("quests") are flat records with integer ids. Status is not stored
//! directly: the persisted format keeps the legacy `completed`/`inProgress`
//! boolean pair, and [`TaskStatus::from_flags`] is the single authoritative
//! mapping from that pair to a status. `completed` wins when both are set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status derived from the stored flag pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Classifies a `completed`/`in_progress` flag pair.
    ///
    /// Total and exhaustive: every pair maps to exactly one status, and
    /// `completed` takes precedence when both flags are set.
    pub fn from_flags(completed: bool, in_progress: bool) -> Self {
        if completed {
            TaskStatus::Done
        } else if in_progress {
            TaskStatus::InProgress
        } else {
            TaskStatus::Todo
        }
    }

    /// Returns true if this status represents completion
    pub fn is_complete(&self) -> bool {
        matches!(self, TaskStatus::Done)
    }

    /// Returns a display label for the status
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }

    /// Returns the board marker for the status
    pub fn marker(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "[ ]",
            TaskStatus::InProgress => "[~]",
            TaskStatus::Done => "[x]",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A quest in the log
///
/// Serialized field names match the original flat-file format (camelCase,
/// two status booleans), so existing task files stay readable and written
/// files stay readable by older tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, allocated sequentially by the store
    pub id: u64,

    /// Human-readable title (trimmed, non-empty)
    pub title: String,

    #[serde(default)]
    pub completed: bool,

    #[serde(default)]
    pub in_progress: bool,

    /// Ids of tasks that should be finished first. Entries are a best-effort
    /// hint: self-references, unknown ids and duplicates are tolerated here
    /// and normalized away by the stages engine.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<u64>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task with the given id and title
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: title.into().trim().to_string(),
            completed: false,
            in_progress: false,
            deps: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the derived status of this task
    pub fn status(&self) -> TaskStatus {
        TaskStatus::from_flags(self.completed, self.in_progress)
    }

    /// Sets the status by rewriting the flag pair
    ///
    /// New writes are normalized: `Done` clears `in_progress`. Legacy records
    /// with both flags set remain representable and classify as done.
    pub fn set_status(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Todo => {
                self.completed = false;
                self.in_progress = false;
            }
            TaskStatus::InProgress => {
                self.completed = false;
                self.in_progress = true;
            }
            TaskStatus::Done => {
                self.completed = true;
                self.in_progress = false;
            }
        }
        self.updated_at = Utc::now();
    }

    /// Replaces the dependency list as given, without validation
    pub fn set_deps(&mut self, deps: Vec<u64>) {
        self.deps = deps;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifier_is_total_and_exhaustive() {
        assert_eq!(TaskStatus::from_flags(false, false), TaskStatus::Todo);
        assert_eq!(TaskStatus::from_flags(false, true), TaskStatus::InProgress);
        assert_eq!(TaskStatus::from_flags(true, false), TaskStatus::Done);
        // Both flags set: completed wins
        assert_eq!(TaskStatus::from_flags(true, true), TaskStatus::Done);
    }

    #[test]
    fn new_task_is_todo() {
        let task = Task::new(1, "Slay the dragon");
        assert_eq!(task.status(), TaskStatus::Todo);
        assert!(!task.completed);
        assert!(!task.in_progress);
        assert!(task.deps.is_empty());
    }

    #[test]
    fn title_is_trimmed() {
        let task = Task::new(1, "  padded  ");
        assert_eq!(task.title, "padded");
    }

    #[test]
    fn status_transitions_rewrite_flags() {
        let mut task = Task::new(1, "Quest");

        task.set_status(TaskStatus::InProgress);
        assert_eq!((task.completed, task.in_progress), (false, true));
        assert_eq!(task.status(), TaskStatus::InProgress);

        task.set_status(TaskStatus::Done);
        assert_eq!((task.completed, task.in_progress), (true, false));
        assert_eq!(task.status(), TaskStatus::Done);

        task.set_status(TaskStatus::Todo);
        assert_eq!((task.completed, task.in_progress), (false, false));
        assert_eq!(task.status(), TaskStatus::Todo);
    }

    #[test]
    fn legacy_both_flags_classify_as_done() {
        let mut task = Task::new(1, "Quest");
        task.completed = true;
        task.in_progress = true;
        assert_eq!(task.status(), TaskStatus::Done);
    }

    #[test]
    fn deserializes_legacy_camel_case_records() {
        // Minimal record as older tooling wrote it: no timestamps, no deps
        let json = r#"{"id":3,"title":"Forge a sword","inProgress":true}"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.id, 3);
        assert_eq!(task.status(), TaskStatus::InProgress);
        assert!(task.deps.is_empty());
    }

    #[test]
    fn serializes_camel_case_flag_pair() {
        let mut task = Task::new(7, "Quest");
        task.set_status(TaskStatus::InProgress);

        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains(r#""inProgress":true"#));
        assert!(json.contains(r#""completed":false"#));
        // No derived status field is ever written
        assert!(!json.contains("status"));
    }

    #[test]
    fn serde_roundtrip() {
        let mut task = Task::new(2, "Gather herbs");
        task.set_deps(vec![1, 1, 2]);

        let json = serde_json::to_string(&task).unwrap();
        let parsed: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, task);
    }

    #[test]
    fn status_labels() {
        assert_eq!(TaskStatus::Todo.to_string(), "todo");
        assert_eq!(TaskStatus::InProgress.to_string(), "in-progress");
        assert_eq!(TaskStatus::Done.to_string(), "done");
    }
}
