//! Dashboard application state

use anyhow::Result;

use crate::domain::Task;
use crate::storage::Project;

/// Which tab is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Board,
    Stages,
}

/// Application state
pub struct App {
    project: Project,

    /// Snapshot of the quest log, in collection order
    tasks: Vec<Task>,

    view: View,

    /// Whether the board shows the done column
    show_done: bool,
}

impl App {
    pub fn new() -> Result<Self> {
        let project = Project::open_current()?;
        let tasks = project.task_store().list()?;
        let show_done = project.config().board.show_done;

        Ok(Self {
            project,
            tasks,
            view: View::default(),
            show_done,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn show_done(&self) -> bool {
        self.show_done
    }

    pub fn next_view(&mut self) {
        self.view = match self.view {
            View::Board => View::Stages,
            View::Stages => View::Board,
        };
    }

    pub fn toggle_done(&mut self) {
        self.show_done = !self.show_done;
    }

    /// Re-reads the store snapshot
    pub fn reload(&mut self) -> Result<()> {
        self.tasks = self.project.task_store().list()?;
        Ok(())
    }
}
