use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "voting gauntlet scoreboard tracker")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Fetch the current event page, persist new results and print the report
    Poll,
    /// Write the chronological export and leaderboard JSON files for an event
    Export {
        /// Event id (optional, defaults to the most recent stored event)
        #[arg(short, long)]
        event: Option<i64>,
    },
}
