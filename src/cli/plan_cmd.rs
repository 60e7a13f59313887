//! Plan commands: import an AI-generated quest list
//!
//! The chat itself happens elsewhere; this takes whatever text the
//! collaborator produced (a file, or stdin from a pipe) and runs the
//! coercion in [`crate::domain::parse_plan`].

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use super::output::Output;
use crate::domain::parse_plan;
use crate::storage::Project;

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Import a quest plan from collaborator text
    Import {
        /// File holding the plan text (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Preview the parsed plan without writing anything
        #[arg(long)]
        dry_run: bool,
    },
}

pub fn run(cmd: PlanCommands, output: &Output) -> Result<()> {
    match cmd {
        PlanCommands::Import { file, dry_run } => import(output, file, dry_run),
    }
}

fn import(output: &Output, file: Option<PathBuf>, dry_run: bool) -> Result<()> {
    let text = match &file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan: {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read plan from stdin")?;
            buffer
        }
    };

    let drafts = parse_plan(&text)?;
    output.verbose_ctx("plan", &format!("Parsed {} draft quests", drafts.len()));

    if drafts.is_empty() {
        output.success("Plan contained no quests");
        return Ok(());
    }

    if dry_run {
        if output.is_json() {
            let items: Vec<_> = drafts
                .iter()
                .map(|d| serde_json::json!({ "title": d.title, "deps": d.deps }))
                .collect();
            output.data(&items);
        } else {
            println!("Plan preview ({} quests):", drafts.len());
            for (index, draft) in drafts.iter().enumerate() {
                let deps = draft
                    .deps
                    .iter()
                    .map(|d| format!("#{}", d + 1))
                    .collect::<Vec<_>>()
                    .join(", ");
                if deps.is_empty() {
                    println!("  #{} {}", index + 1, draft.title);
                } else {
                    println!("  #{} {} (after {})", index + 1, draft.title, deps);
                }
            }
        }
        return Ok(());
    }

    let project = Project::open_current()?;
    let created = project.task_store().import(&drafts)?;

    if output.is_json() {
        let items: Vec<_> = created
            .iter()
            .map(|t| serde_json::json!({ "id": t.id, "title": t.title, "deps": t.deps }))
            .collect();
        output.data(&items);
    } else {
        output.success(&format!("Imported {} quests:", created.len()));
        for task in &created {
            println!("  {} - {}", task.id, task.title);
        }
    }

    Ok(())
}
