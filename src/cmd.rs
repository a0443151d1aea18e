//! Command implementations for the CLI interface.
//!
//! This module contains the handlers behind each subcommand. Every view command
//! runs one fetch-then-compute use case from `dashboard` and prints the result
//! either as a table or, with `--json`, as pretty JSON.

use chrono::{Local, NaiveDate};
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use serde::Serialize;
use tracing::info;

use crate::cli::Cli;
use crate::colors::paint;
use crate::config::{CompletionStatsConfig, ConfigStore, TaskPanelConfig};
use crate::dashboard::*;
use crate::dates::parse_date_input;
use crate::db::TaskStore;
use crate::error::{Error, Result};
use crate::repository::{ConfigRepository, TaskRepository};
use crate::views::deadline::classify_deadline;
use crate::views::goal_rate::GoalRate;
use crate::views::stats::{CompletionStats, CompletionWindow};
use crate::views::tree::TaskTreeNode;

#[derive(Subcommand)]
pub enum Commands {
    /// Show the share of goals that are ongoing (non-milestone).
    Rate {
        /// Query selecting goal tasks.
        #[arg(long, default_value = GOAL_QUERY)]
        query: String,
    },

    /// List goals with a deadline, earliest first.
    Dated {
        /// Query selecting dated goals.
        #[arg(long, default_value = DATED_GOAL_QUERY)]
        query: String,
        /// Reference day: YYYY-MM-DD, "today", "in Nd", "Nd ago".
        #[arg(long)]
        today: Option<String>,
    },

    /// Count remaining work, skipping recurring daily tasks and excluded labels.
    Remaining {
        /// Query selecting active work.
        #[arg(long, default_value = REMAINING_WORK_QUERY)]
        query: String,
        /// Extra label to exclude. May be repeated; adds to the configured exclusions.
        #[arg(long = "exclude")]
        exclude: Vec<String>,
    },

    /// Show daily completions with a moving average.
    Stats {
        /// Number of days in the window (default from config).
        #[arg(long)]
        days: Option<u32>,
        /// Moving average span in days (default from config).
        #[arg(long)]
        span: Option<u32>,
        /// Last day of the window (default today).
        #[arg(long)]
        until: Option<String>,
    },

    /// Show the task panel: configured filter, breadcrumbs and deadlines.
    Panel {
        #[arg(long)]
        today: Option<String>,
    },

    /// Show the ancestor chain of a task.
    Ancestors {
        /// Task ID.
        id: String,
    },

    /// Classify a deadline relative to today.
    Deadline {
        /// Deadline date.
        date: String,
        #[arg(long)]
        today: Option<String>,
    },

    /// Show every view at once.
    Dashboard {
        #[arg(long)]
        today: Option<String>,
    },

    /// Mark a task complete.
    Complete {
        /// Task ID.
        id: String,
    },

    /// Show or change view configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print both config records.
    Show,
    /// Set the task panel filter query.
    SetFilter {
        query: String,
    },
    /// Replace the labels excluded from remaining work.
    SetExcluded {
        labels: Vec<String>,
    },
    /// Change the completion stats window and moving average span.
    SetStats {
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        span: Option<u32>,
    },
}

/// Resolve an optional reference-day argument, defaulting to the local date.
fn resolve_day(arg: Option<&str>) -> Result<NaiveDate> {
    let today = Local::now().date_naive();
    match arg {
        None => Ok(today),
        Some(s) => parse_date_input(s, today)
            .ok_or_else(|| Error::InvalidArgument(format!("cannot parse date '{s}'"))),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| Error::InvalidArgument(format!("cannot encode output: {e}")))?;
    println!("{out}");
    Ok(())
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

fn print_goal_rate(rate: &GoalRate) {
    println!(
        "Goals: {}   Non-milestone: {}   Rate: {}%",
        rate.goal_count, rate.non_milestone_count, rate.percentage
    );
}

fn print_dated_goals(rows: &[DatedGoalRow]) {
    println!("{:<12} {:<11} {:<14} {}", "ID", "Deadline", "When", "Goal");
    for row in rows {
        println!(
            "{:<12} {:<11} {} {}",
            truncate(&row.goal.id, 12),
            row.goal.deadline,
            paint(format!("{:<14}", row.display.label), row.display.urgency),
            row.goal.content
        );
    }
    if rows.is_empty() {
        println!("-");
    }
}

fn print_stats(stats: &CompletionStats) {
    println!("{:<11} {:>5} {:>8}  {}", "Date", "Done", "Avg", "");
    for day in &stats.daily {
        println!(
            "{:<11} {:>5} {:>8.2}  {}",
            day.date,
            day.count,
            day.moving_average,
            "#".repeat(day.count.min(60))
        );
    }
    let s = &stats.summary;
    println!(
        "Total: {} over {} days ({:.2}/day), best day: {}",
        s.total,
        s.days,
        s.mean_per_day,
        s.best_day.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
    );
}

fn print_panel(rows: &[PanelRow]) {
    println!("{:<12} {:<3} {:<14} {}", "ID", "Pri", "Deadline", "Task");
    for row in rows {
        let when = match &row.deadline_display {
            Some(d) => paint(format!("{:<14}", d.label), d.urgency).to_string(),
            None => format!("{:<14}", "-"),
        };
        let crumb = if row.breadcrumb.is_empty() {
            String::new()
        } else {
            format!("{} › ", row.breadcrumb)
        };
        println!(
            "{:<12} {:<3} {} {}{}",
            truncate(&row.node.id, 12),
            row.node.priority.filter_name(),
            when,
            crumb,
            row.node.content
        );
    }
    if rows.is_empty() {
        println!("-");
    }
}

fn print_ancestors(node: &TaskTreeNode) {
    println!("{} (#{})", node.content, node.id);
    let Some(parent) = node.parent.immediate_parent() else {
        println!("Parent:    -");
        return;
    };
    println!("Parent:    {} (#{})", parent.content, parent.id);
    println!("Ancestors (root first, depth {}):", node.parent.depth());
    for (depth, p) in node.parent.breadcrumb().iter().enumerate() {
        println!("{}- {} (#{})", "  ".repeat(depth + 1), p.content, p.id);
    }
}

pub fn cmd_rate(store: &TaskStore, query: &str, json: bool) -> Result<()> {
    let rate = load_goal_rate(store, query)?;
    if json {
        return print_json(&rate);
    }
    print_goal_rate(&rate);
    Ok(())
}

pub fn cmd_dated(store: &TaskStore, query: &str, today: Option<&str>, json: bool) -> Result<()> {
    let rows = load_dated_goals(store, query, resolve_day(today)?)?;
    if json {
        return print_json(&rows);
    }
    print_dated_goals(&rows);
    Ok(())
}

pub fn cmd_remaining(
    store: &TaskStore,
    config: &ConfigStore,
    query: &str,
    exclude: Vec<String>,
    json: bool,
) -> Result<()> {
    let mut excluded = config.task_panel_config()?.excluded_labels;
    excluded.extend(exclude);
    let count = load_remaining_work(store, query, excluded.as_slice())?;
    if json {
        return print_json(&serde_json::json!({ "remaining": count }));
    }
    println!("Remaining: {count}");
    Ok(())
}

pub fn cmd_stats(
    store: &TaskStore,
    config: &ConfigStore,
    days: Option<u32>,
    span: Option<u32>,
    until: Option<&str>,
    json: bool,
) -> Result<()> {
    let stored = config.completion_stats_config()?;
    let until = resolve_day(until)?;
    let days = days.unwrap_or(stored.window_days);
    let window = CompletionWindow::ending_on(until, days)
        .ok_or_else(|| Error::InvalidArgument(format!("a {days}-day window ending on {until} is out of range")))?;
    let stats = load_completion_stats(store, window, span.unwrap_or(stored.moving_average_span))?;
    if json {
        return print_json(&stats);
    }
    print_stats(&stats);
    Ok(())
}

pub fn cmd_panel(store: &TaskStore, config: &ConfigStore, today: Option<&str>, json: bool) -> Result<()> {
    let panel_config = config.task_panel_config()?;
    let rows = load_task_panel(store, &panel_config, resolve_day(today)?)?;
    if json {
        return print_json(&rows);
    }
    println!("Filter: {}", panel_config.filter);
    print_panel(&rows);
    Ok(())
}

pub fn cmd_ancestors(store: &TaskStore, id: &str, json: bool) -> Result<()> {
    let node = load_task_node(store, id)?;
    if json {
        return print_json(&node);
    }
    print_ancestors(&node);
    Ok(())
}

pub fn cmd_deadline(date: &str, today: Option<&str>, json: bool) -> Result<()> {
    let today = resolve_day(today)?;
    let deadline = parse_date_input(date, today)
        .ok_or_else(|| Error::InvalidArgument(format!("cannot parse date '{date}'")))?;
    let display = classify_deadline(deadline, today);
    if json {
        return print_json(&display);
    }
    println!(
        "{} ({}, {})",
        paint(&display.label, display.urgency),
        display.urgency,
        display.urgency.color_name()
    );
    Ok(())
}

pub fn cmd_dashboard(store: &TaskStore, config: &ConfigStore, today: Option<&str>, json: bool) -> Result<()> {
    let dash = load_dashboard(store, store, config, resolve_day(today)?)?;
    if json {
        return print_json(&dash);
    }
    println!("== Goals ({})", dash.today);
    print_goal_rate(&dash.goal_rate);
    println!("\n== Dated goals");
    print_dated_goals(&dash.dated_goals);
    println!("\n== Remaining work: {}", dash.remaining_work);
    println!("\n== Completions");
    print_stats(&dash.completion_stats);
    println!("\n== Task panel");
    print_panel(&dash.panel);
    Ok(())
}

pub fn cmd_complete(store: &mut TaskStore, id: &str) -> Result<()> {
    store.complete(id)?;
    println!("Completed task {id}.");
    Ok(())
}

pub fn cmd_config(config: &mut ConfigStore, action: ConfigAction, json: bool) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let file = config.read()?;
            if json {
                return print_json(&file);
            }
            println!("Config:             {}", config.path().display());
            println!("Panel filter:       {}", file.task_panel.filter);
            println!(
                "Excluded labels:    {}",
                if file.task_panel.excluded_labels.is_empty() {
                    "-".into()
                } else {
                    file.task_panel.excluded_labels.join(",")
                }
            );
            println!("Stats window days:  {}", file.completion_stats.window_days);
            println!("Moving avg span:    {}", file.completion_stats.moving_average_span);
        }
        ConfigAction::SetFilter { query } => {
            // Reject queries the store could never answer.
            crate::filter::Filter::parse(&query)?;
            let current = config.task_panel_config()?;
            config.set_task_panel_config(&TaskPanelConfig { filter: query.clone(), ..current })?;
            info!(filter = %query, "panel filter updated");
            println!("Panel filter set to '{query}'.");
        }
        ConfigAction::SetExcluded { labels } => {
            let current = config.task_panel_config()?;
            config.set_task_panel_config(&TaskPanelConfig { excluded_labels: labels, ..current })?;
            println!("Excluded labels updated.");
        }
        ConfigAction::SetStats { days, span } => {
            let current = config.completion_stats_config()?;
            let updated = CompletionStatsConfig {
                window_days: days.unwrap_or(current.window_days),
                moving_average_span: span.unwrap_or(current.moving_average_span),
            };
            if updated.window_days == 0 || updated.moving_average_span == 0 {
                return Err(Error::InvalidArgument("days and span must be at least 1".into()));
            }
            config.set_completion_stats_config(&updated)?;
            println!(
                "Stats window: {} days, moving average span: {} days.",
                updated.window_days, updated.moving_average_span
            );
        }
    }
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
