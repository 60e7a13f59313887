//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{focus, plan_cmd, task_cmd, tui, view};
use crate::storage::Project;

#[derive(Parser)]
#[command(name = "quest")]
#[command(author, version, about = "Gamified quest log and focus timer")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new quest project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Manage quests
    #[command(flatten)]
    Task(task_cmd::TaskCommands),

    /// Show the status board (todo / in-progress / done columns)
    Board,

    /// Show quests layered into dependency stages
    Stages,

    /// Import an AI-generated quest plan
    #[command(subcommand)]
    Plan(plan_cmd::PlanCommands),

    /// Run a focus (pomodoro) session
    Focus {
        /// Quest to start before the session
        task: Option<u64>,

        /// Session length in minutes (defaults to config)
        #[arg(long, short)]
        minutes: Option<u64>,
    },

    /// Open the interactive dashboard
    Dash,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    output.verbose("Quest CLI starting");

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing project at: {}", path));
            let project = Project::init(&path)?;
            output.success(&format!(
                "Initialized quest project at {}",
                project.root().display()
            ));
        }

        Commands::Task(cmd) => task_cmd::run(cmd, &output)?,

        Commands::Board => view::board(&output)?,
        Commands::Stages => view::stages(&output)?,

        Commands::Plan(cmd) => plan_cmd::run(cmd, &output)?,

        Commands::Focus { task, minutes } => focus::run(&output, task, minutes)?,

        Commands::Dash => tui::run(&output)?,
    }

    Ok(())
}
