//! Status board: tasks grouped into three columns
//!
//! A stable partition of the task collection by derived status. Both the CLI
//! printer and the dashboard render from this one grouping.

use super::task::{Task, TaskStatus};

/// Tasks partitioned by status, input order preserved within each column
#[derive(Debug, Default)]
pub struct StatusBoard<'a> {
    todo: Vec<&'a Task>,
    in_progress: Vec<&'a Task>,
    done: Vec<&'a Task>,
}

impl<'a> StatusBoard<'a> {
    pub fn todo(&self) -> &[&'a Task] {
        &self.todo
    }

    pub fn in_progress(&self) -> &[&'a Task] {
        &self.in_progress
    }

    pub fn done(&self) -> &[&'a Task] {
        &self.done
    }

    /// Total number of tasks across all three columns
    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Groups tasks into the three status columns.
///
/// Every task lands in exactly one column and relative input order is kept.
/// All three columns exist even when empty.
pub fn group_by_status(tasks: &[Task]) -> StatusBoard<'_> {
    let mut board = StatusBoard::default();

    for task in tasks {
        match task.status() {
            TaskStatus::Todo => board.todo.push(task),
            TaskStatus::InProgress => board.in_progress.push(task),
            TaskStatus::Done => board.done.push(task),
        }
    }

    board
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: u64, status: TaskStatus) -> Task {
        let mut task = Task::new(id, format!("Quest {}", id));
        task.set_status(status);
        task
    }

    #[test]
    fn every_task_lands_in_exactly_one_column() {
        let tasks = vec![
            task(1, TaskStatus::Done),
            task(2, TaskStatus::InProgress),
            task(3, TaskStatus::Todo),
            task(4, TaskStatus::Todo),
        ];

        let board = group_by_status(&tasks);

        assert_eq!(board.len(), tasks.len());
        assert_eq!(board.todo().len(), 2);
        assert_eq!(board.in_progress().len(), 1);
        assert_eq!(board.done().len(), 1);
    }

    #[test]
    fn partition_is_stable() {
        let tasks = vec![
            task(5, TaskStatus::Todo),
            task(2, TaskStatus::Todo),
            task(9, TaskStatus::Todo),
        ];

        let board = group_by_status(&tasks);
        let ids: Vec<u64> = board.todo().iter().map(|t| t.id).collect();

        assert_eq!(ids, vec![5, 2, 9]);
    }

    #[test]
    fn empty_input_keeps_all_columns() {
        let board = group_by_status(&[]);

        assert!(board.is_empty());
        assert!(board.todo().is_empty());
        assert!(board.in_progress().is_empty());
        assert!(board.done().is_empty());
    }

    #[test]
    fn both_flags_set_goes_to_done() {
        let mut ambiguous = Task::new(1, "Legacy quest");
        ambiguous.completed = true;
        ambiguous.in_progress = true;

        let tasks = vec![ambiguous];
        let board = group_by_status(&tasks);

        assert_eq!(board.done().len(), 1);
        assert!(board.in_progress().is_empty());
    }
}
