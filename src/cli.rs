use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Productivity dashboard over a task store.
/// Storage defaults to ~/.goalboard/tasks.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "gb", version, about = "Goal and completion dashboard CLI")]
pub struct Cli {
    /// Path to the JSON task store.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Print views as JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}
