//! View commands (board, stages)
//!
//! Plain-text and JSON renderings of the two derived views. The JSON shapes
//! are the wire encoding consumers get: a record keyed by status for the
//! board, an ordered array-of-arrays of `{id, title}` plus a cycle flag for
//! the stages.

use anyhow::Result;
use serde_json::json;

use super::output::Output;
use crate::domain::{group_by_status, layer, Task};
use crate::storage::Project;

fn summary(task: &Task) -> serde_json::Value {
    json!({ "id": task.id, "title": task.title })
}

/// Print the three status columns
pub fn board(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let tasks = project.task_store().list()?;

    output.verbose_ctx("board", &format!("Grouping {} quests", tasks.len()));
    let board = group_by_status(&tasks);

    if output.is_json() {
        output.data(&json!({
            "todo": board.todo().iter().map(|t| summary(t)).collect::<Vec<_>>(),
            "in-progress": board.in_progress().iter().map(|t| summary(t)).collect::<Vec<_>>(),
            "done": board.done().iter().map(|t| summary(t)).collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    if board.is_empty() {
        println!("No quests in the log");
        return Ok(());
    }

    let columns = [
        ("Todo", board.todo()),
        ("In Progress", board.in_progress()),
        ("Done", board.done()),
    ];

    for (name, tasks) in columns {
        println!("{} ({})", name, tasks.len());
        for task in tasks {
            println!("  {} {} - {}", task.status().marker(), task.id, task.title);
        }
        output.blank();
    }

    Ok(())
}

/// Print the dependency stages
pub fn stages(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let tasks = project.task_store().list()?;

    output.verbose_ctx("stages", &format!("Layering {} quests", tasks.len()));
    let plan = layer(&tasks);

    if output.is_json() {
        let stages: Vec<Vec<_>> = plan
            .stages()
            .iter()
            .map(|stage| stage.iter().map(|t| summary(t)).collect())
            .collect();
        output.data(&json!({
            "stages": stages,
            "cycle": plan.has_cycle(),
        }));
        return Ok(());
    }

    if plan.is_empty() {
        println!("No quests in the log");
        return Ok(());
    }

    for (index, stage) in plan.stages().iter().enumerate() {
        println!("Stage {} ({})", index + 1, stage.len());
        for task in stage {
            println!("  {} {} - {}", task.status().marker(), task.id, task.title);
        }
        output.blank();
    }

    if plan.has_cycle() {
        output.warn("the final stage is a dependency cycle, not a parallel group");
    }

    Ok(())
}
