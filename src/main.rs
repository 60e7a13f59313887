//! Quest CLI - Gamified quest log and focus timer

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = quest_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
