//! # gb - Goal Board
//!
//! A command-line productivity dashboard computed over a task store: active tasks
//! with labels, priorities, deadlines and parent links, plus the history of
//! completed tasks.
//!
//! ## Views
//!
//! - **Goal rate**: the share of `@goal` tasks that are ongoing (`@non-milestone`)
//! - **Dated goals**: goals with a deadline, earliest first, coloured by urgency
//! - **Remaining work**: active non-goal tasks, never counting `@daily` chores
//! - **Completion stats**: completions per day over a window with a moving average
//! - **Task panel**: a configurable filter with root-first breadcrumbs per task
//!
//! ## Quick Start
//!
//! ```bash
//! # Everything at once
//! gb dashboard
//!
//! # Completions over the last 30 days, 7-day moving average
//! gb stats --days 30 --span 7
//!
//! # Breadcrumbs of a nested task
//! gb ancestors 6X7rM8997g3RQmvh
//!
//! # Change what the task panel shows
//! gb config set-filter "@goal & p1"
//! ```
//!
//! Data is stored locally in `~/.goalboard/` as `tasks.json` (the task snapshot) and
//! `config.json` (view settings).

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

pub mod cli;
pub mod cmd;
pub mod colors;
pub mod config;
pub mod dashboard;
pub mod dates;
pub mod db;
pub mod error;
pub mod fields;
pub mod filter;
pub mod labels;
pub mod repository;
pub mod task;
pub mod views {
    pub mod dated_goals;
    pub mod deadline;
    pub mod goal_rate;
    pub mod remaining;
    pub mod stats;
    pub mod tree;
}

use cli::Cli;
use cmd::*;
use config::ConfigStore;
use db::TaskStore;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to initialise logging: {e}");
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return;
    }

    // Determine the data directory
    let data_dir = if let Some(db_path) = cli.db.as_ref() {
        db_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| std::path::Path::new("."))
            .to_path_buf()
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let data_dir = PathBuf::from(home).join(".goalboard");
        if let Err(e) = std::fs::create_dir_all(&data_dir) {
            eprintln!("Failed to create data directory {}: {}", data_dir.display(), e);
            process::exit(1);
        }
        data_dir
    };
    let db_path = cli.db.clone().unwrap_or_else(|| data_dir.join("tasks.json"));

    let mut store = match TaskStore::load(&db_path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error loading task store {}: {}", db_path.display(), e);
            process::exit(1);
        }
    };
    debug!(db = %store.path().display(), data_dir = %data_dir.display(), "resolved storage paths");
    let mut config = ConfigStore::in_dir(&data_dir);
    let json = cli.json;

    let result = match cli.command {
        Commands::Completions { .. } => unreachable!("completions handled above"),
        Commands::Rate { query } => cmd_rate(&store, &query, json),
        Commands::Dated { query, today } => cmd_dated(&store, &query, today.as_deref(), json),
        Commands::Remaining { query, exclude } => cmd_remaining(&store, &config, &query, exclude, json),
        Commands::Stats { days, span, until } => cmd_stats(&store, &config, days, span, until.as_deref(), json),
        Commands::Panel { today } => cmd_panel(&store, &config, today.as_deref(), json),
        Commands::Ancestors { id } => cmd_ancestors(&store, &id, json),
        Commands::Deadline { date, today } => cmd_deadline(&date, today.as_deref(), json),
        Commands::Dashboard { today } => cmd_dashboard(&store, &config, today.as_deref(), json),
        Commands::Complete { id } => cmd_complete(&mut store, &id),
        Commands::Config { action } => cmd_config(&mut config, action, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
