use anyhow::Result;

use gauntlet_tracker::cli::Command;
use gauntlet_tracker::{handle_export, handle_poll, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Poll => handle_poll(),
        Command::Export { event } => handle_export(*event),
    }
}
