//! Focus command: a pomodoro countdown
//!
//! Optionally starts a quest first, then counts down a work session in the
//! terminal. Durations come from the flag or the project config.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;

use super::output::Output;
use crate::storage::Project;

pub fn run(output: &Output, task: Option<u64>, minutes: Option<u64>) -> Result<()> {
    let project = Project::open_current()?;
    let minutes = minutes.unwrap_or(project.config().focus.work_minutes);

    if let Some(id) = task {
        let started = project
            .task_store()
            .set_status(id, crate::domain::TaskStatus::InProgress)?;
        if !output.is_json() {
            println!("Started quest {}: {}", started.id, started.title);
        }
    }

    output.verbose_ctx("focus", &format!("Session length: {} minutes", minutes));
    countdown(output, minutes)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "task": task,
            "minutes": minutes,
            "finishedAt": Utc::now(),
        }));
    } else {
        output.success(&format!(
            "Focus session complete ({} min). Take a {} minute break!",
            minutes,
            project.config().focus.break_minutes
        ));
    }

    Ok(())
}

fn countdown(output: &Output, minutes: u64) -> Result<()> {
    let total_seconds = minutes * 60;

    // The live countdown is a text-mode nicety; JSON consumers just wait
    for elapsed in 0..total_seconds {
        if !output.is_json() {
            let left = total_seconds - elapsed;
            print!("\r  {:02}:{:02} remaining ", left / 60, left % 60);
            io::stdout().flush()?;
        }
        thread::sleep(Duration::from_secs(1));
    }

    if !output.is_json() && total_seconds > 0 {
        println!();
    }

    Ok(())
}
