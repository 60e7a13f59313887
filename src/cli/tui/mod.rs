//! Interactive dashboard
//!
//! A terminal view over the quest log: a board tab (status columns) and a
//! stages tab (dependency layering), both rendered straight from the shared
//! domain functions.

mod app;
mod ui;

use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use anyhow::{anyhow, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};

use super::Output;
use app::App;

/// Launch the dashboard
pub fn run(output: &Output) -> Result<()> {
    output.verbose_ctx("dash", "Initializing dashboard");

    let mut terminal = ui::init_terminal()?;

    let mut app = match App::new() {
        Ok(app) => app,
        Err(e) => {
            ui::restore_terminal()?;
            return Err(e);
        }
    };

    // Keep the terminal usable even if drawing panics
    let result = panic::catch_unwind(AssertUnwindSafe(|| event_loop(&mut terminal, &mut app)));

    let restore_result = ui::restore_terminal();

    match result {
        Ok(inner) => {
            restore_result?;
            inner
        }
        Err(payload) => {
            let _ = restore_result;
            if let Some(s) = payload.downcast_ref::<&str>() {
                Err(anyhow!("Dashboard panicked: {}", s))
            } else if let Some(s) = payload.downcast_ref::<String>() {
                Err(anyhow!("Dashboard panicked: {}", s))
            } else {
                Err(anyhow!("Dashboard panicked with unknown error"))
            }
        }
    }
}

fn event_loop(terminal: &mut ui::Terminal, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab => app.next_view(),
                KeyCode::Char('d') => app.toggle_done(),
                KeyCode::Char('r') => app.reload()?,
                _ => {}
            }
        }
    }
}
