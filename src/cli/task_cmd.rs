//! Task CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::domain::{layer, TaskStatus};
use crate::storage::Project;

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a quest to the log
    Add {
        /// Quest title
        title: String,

        /// Ids of quests that should be finished first (repeatable)
        #[arg(long = "dep", value_name = "ID")]
        deps: Vec<u64>,
    },

    /// List all quests
    List,

    /// Show quest details
    Show {
        /// Quest id
        id: u64,
    },

    /// Mark a quest as in progress
    Start {
        /// Quest id
        id: u64,
    },

    /// Mark a quest as done
    Done {
        /// Quest id
        id: u64,
    },

    /// Put a quest back to todo
    Reopen {
        /// Quest id
        id: u64,
    },

    /// Remove a quest from the log
    Rm {
        /// Quest id
        id: u64,
    },

    /// Add a dependency: TASK waits for ON
    Dep {
        /// Quest that will wait
        task: u64,

        /// Quest that should be finished first
        on: u64,
    },

    /// Remove a dependency
    Undep {
        /// Quest to unblock
        task: u64,

        /// Dependency to remove
        on: u64,
    },
}

pub fn run(cmd: TaskCommands, output: &Output) -> Result<()> {
    match cmd {
        TaskCommands::Add { title, deps } => add(output, &title, deps),
        TaskCommands::List => list(output),
        TaskCommands::Show { id } => show(output, id),
        TaskCommands::Start { id } => set_status(output, id, TaskStatus::InProgress),
        TaskCommands::Done { id } => set_status(output, id, TaskStatus::Done),
        TaskCommands::Reopen { id } => set_status(output, id, TaskStatus::Todo),
        TaskCommands::Rm { id } => remove(output, id),
        TaskCommands::Dep { task, on } => add_dep(output, task, on),
        TaskCommands::Undep { task, on } => remove_dep(output, task, on),
    }
}

fn add(output: &Output, title: &str, deps: Vec<u64>) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.task_store();

    let mut task = store.add(title)?;
    if !deps.is_empty() {
        task = store.set_deps(task.id, deps)?;
        warn_about_deps(output, &store, task.id)?;
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": task.id,
            "title": task.title,
            "status": task.status(),
            "deps": task.deps,
        }));
    } else {
        output.success(&format!("Created quest {}: {}", task.id, task.title));
    }

    Ok(())
}

fn list(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let tasks = project.task_store().list()?;

    if output.is_json() {
        let items: Vec<_> = tasks
            .iter()
            .map(|t| {
                serde_json::json!({
                    "id": t.id,
                    "title": t.title,
                    "status": t.status(),
                    "deps": t.deps,
                })
            })
            .collect();
        output.data(&items);
    } else if tasks.is_empty() {
        println!("No quests in the log");
    } else {
        println!("{:<6} {:<12} {:<30} DEPS", "ID", "STATUS", "TITLE");
        println!("{}", "-".repeat(70));

        for task in &tasks {
            let deps = task
                .deps
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            println!(
                "{:<6} {:<12} {:<30} {}",
                task.id,
                task.status().label(),
                task.title,
                deps
            );
        }
    }

    Ok(())
}

fn show(output: &Output, id: u64) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.task_store();

    let tasks = store.list()?;
    let task = tasks
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| anyhow::anyhow!("Quest not found: {}", id))?;

    // Deps still standing in the way: present in the log and not done
    let waiting_on: Vec<u64> = task
        .deps
        .iter()
        .copied()
        .filter(|&dep| {
            dep != task.id
                && tasks
                    .iter()
                    .any(|t| t.id == dep && !t.status().is_complete())
        })
        .collect();

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": task.id,
            "title": task.title,
            "status": task.status(),
            "deps": task.deps,
            "waitingOn": waiting_on,
            "createdAt": task.created_at,
            "updatedAt": task.updated_at,
        }));
    } else {
        println!("Quest {}: {}", task.id, task.title);
        println!("  Status:  {}", task.status());
        if !task.deps.is_empty() {
            let deps = task
                .deps
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            println!("  Deps:    {}", deps);
        }
        if !waiting_on.is_empty() {
            let waiting = waiting_on
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            println!("  Waiting: {}", waiting);
        }
        println!("  Created: {}", task.created_at.format("%Y-%m-%d %H:%M"));
    }

    Ok(())
}

fn set_status(output: &Output, id: u64, status: TaskStatus) -> Result<()> {
    let project = Project::open_current()?;
    let task = project.task_store().set_status(id, status)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": task.id,
            "title": task.title,
            "status": task.status(),
        }));
    } else {
        let verb = match status {
            TaskStatus::Todo => "Reopened",
            TaskStatus::InProgress => "Started",
            TaskStatus::Done => "Completed",
        };
        output.success(&format!("{} quest {}: {}", verb, task.id, task.title));
    }

    Ok(())
}

fn remove(output: &Output, id: u64) -> Result<()> {
    let project = Project::open_current()?;
    let task = project.task_store().remove(id)?;

    output.success(&format!("Removed quest {}: {}", task.id, task.title));
    Ok(())
}

fn add_dep(output: &Output, task_id: u64, on: u64) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.task_store();

    if task_id == on {
        output.warn("a quest cannot depend on itself; nothing changed");
        return Ok(());
    }

    let task = store.get(task_id)?;
    if task.deps.contains(&on) {
        output.success(&format!("Quest {} already waits for {}", task_id, on));
        return Ok(());
    }

    let mut deps = task.deps;
    deps.push(on);
    store.set_deps(task_id, deps)?;

    warn_about_deps(output, &store, task_id)?;
    output.success(&format!("Quest {} now waits for {}", task_id, on));
    Ok(())
}

fn remove_dep(output: &Output, task_id: u64, on: u64) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.task_store();

    let task = store.get(task_id)?;
    if !task.deps.contains(&on) {
        anyhow::bail!("Quest {} does not wait for {}", task_id, on);
    }

    let deps = task.deps.into_iter().filter(|&d| d != on).collect();
    store.set_deps(task_id, deps)?;

    output.success(&format!("Quest {} no longer waits for {}", task_id, on));
    Ok(())
}

/// Deps are a hint, not a constraint: bad references are stored anyway, but
/// tell the user what the stages view will make of them
fn warn_about_deps(output: &Output, store: &crate::storage::TaskStore, task_id: u64) -> Result<()> {
    let tasks = store.list()?;

    if let Some(task) = tasks.iter().find(|t| t.id == task_id) {
        for &dep in &task.deps {
            if dep != task.id && !tasks.iter().any(|t| t.id == dep) {
                output.warn(&format!(
                    "quest {} is not in the log; the stages view ignores it",
                    dep
                ));
            }
        }
    }

    if layer(&tasks).has_cycle() {
        output.warn("dependency cycle detected; the stages view groups the cycle into one final stage");
    }

    Ok(())
}
