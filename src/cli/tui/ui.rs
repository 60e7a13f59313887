//! Dashboard drawing

use std::io::{self, stdout, Stdout};

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use super::app::{App, View};
use crate::domain::{group_by_status, layer, Task};

/// Terminal type alias
pub type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for dashboard mode
pub fn init_terminal() -> Result<Terminal> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = ratatui::Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Draw the current view
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    match app.view() {
        View::Board => draw_board(frame, app, chunks[0]),
        View::Stages => draw_stages(frame, app, chunks[0]),
    }

    draw_footer(frame, app, chunks[1]);
}

fn draw_board(frame: &mut Frame, app: &App, area: Rect) {
    let board = group_by_status(app.tasks());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(area);

    draw_column(frame, "Todo", board.todo(), Color::Green, columns[0]);
    draw_column(
        frame,
        "In Progress",
        board.in_progress(),
        Color::Yellow,
        columns[1],
    );

    if app.show_done() {
        draw_column(frame, "Done", board.done(), Color::DarkGray, columns[2]);
    } else {
        let hidden = Paragraph::new("hidden (press d)").style(Style::default().fg(Color::DarkGray));
        let block = Block::default()
            .title(format!("Done ({})", board.done().len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hidden.block(block), columns[2]);
    }
}

fn draw_column(frame: &mut Frame, name: &str, tasks: &[&Task], color: Color, area: Rect) {
    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            ListItem::new(format!(
                "{} {}",
                task.status().marker(),
                truncate_str(&task.title, 25)
            ))
            .style(Style::default().fg(color))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(format!("{} ({})", name, tasks.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );

    frame.render_widget(list, area);
}

fn draw_stages(frame: &mut Frame, app: &App, area: Rect) {
    let plan = layer(app.tasks());

    if plan.is_empty() {
        let empty = Paragraph::new("No quests yet. Add one with 'quest add'.").block(
            Block::default()
                .title("Stages")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(empty, area);
        return;
    }

    let count = plan.len() as u32;
    let constraints: Vec<Constraint> = (0..count).map(|_| Constraint::Ratio(1, count)).collect();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (index, stage) in plan.stages().iter().enumerate() {
        let last = index + 1 == plan.len();
        let collapsed_cycle = last && plan.has_cycle();

        let color = if collapsed_cycle {
            Color::Red
        } else {
            Color::Cyan
        };
        let title = if collapsed_cycle {
            format!("Stage {} (cycle)", index + 1)
        } else {
            format!("Stage {} ({})", index + 1, stage.len())
        };

        let items: Vec<ListItem> = stage
            .iter()
            .map(|task| {
                ListItem::new(format!(
                    "{} {}",
                    task.status().marker(),
                    truncate_str(&task.title, 20)
                ))
                .style(Style::default().fg(color))
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );

        frame.render_widget(list, columns[index]);
    }
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let view = match app.view() {
        View::Board => "board",
        View::Stages => "stages",
    };

    let mut help = format!(
        " {} | Tab switch view | d toggle done | r reload | q quit",
        view
    );
    if app.view() == View::Stages && layer(app.tasks()).has_cycle() {
        help.push_str(" | cycle detected");
    }

    let footer = Paragraph::new(help).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Truncate a string to max_len characters, adding "..." if truncated
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
