//! Fetch-then-compute use cases behind each dashboard view.
//!
//! Each function asks a repository for the collection it needs and hands it to the
//! matching pure view. Repository failures are returned unchanged.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::config::{CompletionStatsConfig, TaskPanelConfig};
use crate::error::{Error, RepositoryError, RequestError, Result};
use crate::repository::{CompletionStatsRepository, ConfigRepository, TaskRepository};
use crate::views::dated_goals::{dated_goals, DatedGoalTask};
use crate::views::deadline::{classify_deadline, DeadlineDisplay};
use crate::views::goal_rate::{goal_rate, GoalRate};
use crate::views::remaining::remaining_work;
use crate::views::stats::{completion_stats, CompletionStats, CompletionWindow};
use crate::views::tree::{build_task_tree, TaskIndex, TaskTreeNode};

pub const GOAL_QUERY: &str = "@goal";
pub const DATED_GOAL_QUERY: &str = "@goal & !no deadline";
pub const REMAINING_WORK_QUERY: &str = "!@goal";
const EVERYTHING: &str = "";

pub fn load_goal_rate(repo: &dyn TaskRepository, query: &str) -> std::result::Result<GoalRate, RequestError> {
    let goals = repo.get_all(query)?;
    Ok(goal_rate(&goals))
}

/// A dated goal together with how its deadline reads today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatedGoalRow {
    #[serde(flatten)]
    pub goal: DatedGoalTask,
    pub display: DeadlineDisplay,
}

pub fn load_dated_goals(
    repo: &dyn TaskRepository,
    query: &str,
    today: NaiveDate,
) -> std::result::Result<Vec<DatedGoalRow>, RequestError> {
    let tasks = repo.get_all(query)?;
    Ok(dated_goals(&tasks)
        .into_iter()
        .map(|goal| DatedGoalRow {
            display: classify_deadline(goal.deadline, today),
            goal,
        })
        .collect())
}

pub fn load_remaining_work<S: AsRef<str>>(
    repo: &dyn TaskRepository,
    query: &str,
    excluded_labels: &[S],
) -> std::result::Result<usize, RequestError> {
    let tasks = repo.get_all(query)?;
    Ok(remaining_work(&tasks, excluded_labels))
}

pub fn load_completion_stats(
    repo: &dyn CompletionStatsRepository,
    window: CompletionWindow,
    span: u32,
) -> std::result::Result<CompletionStats, RepositoryError> {
    let events = repo.fetch_completed_tasks(window)?;
    Ok(completion_stats(&events, window, span))
}

/// One task panel entry: the task with resolved ancestors and its deadline reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelRow {
    #[serde(flatten)]
    pub node: TaskTreeNode,
    pub breadcrumb: String,
    pub deadline_display: Option<DeadlineDisplay>,
}

/// Tasks matching the panel filter, with parents resolved against every task.
pub fn load_task_panel(
    repo: &dyn TaskRepository,
    config: &TaskPanelConfig,
    today: NaiveDate,
) -> std::result::Result<Vec<PanelRow>, RequestError> {
    let all = repo.get_all(EVERYTHING)?;
    let selected = repo.get_all(&config.filter)?;
    debug!(indexed = all.len(), selected = selected.len(), "building task panel");
    Ok(build_task_tree(&all, &selected)
        .into_iter()
        .map(|node| PanelRow {
            breadcrumb: node.parent.breadcrumb_string(),
            deadline_display: node.deadline.map(|d| classify_deadline(d, today)),
            node,
        })
        .collect())
}

/// Resolve one task's tree node; the task itself must be active.
pub fn load_task_node(repo: &dyn TaskRepository, task_id: &str) -> std::result::Result<TaskTreeNode, RequestError> {
    let all = repo.get_all(EVERYTHING)?;
    let index = TaskIndex::new(&all);
    index
        .get(task_id)
        .map(|t| index.tree_node(t))
        .ok_or_else(|| RequestError::NotFound(task_id.to_string()))
}

/// Every derived view at once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub today: NaiveDate,
    pub goal_rate: GoalRate,
    pub dated_goals: Vec<DatedGoalRow>,
    pub remaining_work: usize,
    pub completion_stats: CompletionStats,
    pub panel: Vec<PanelRow>,
}

pub fn load_dashboard(
    tasks: &dyn TaskRepository,
    history: &dyn CompletionStatsRepository,
    config: &dyn ConfigRepository,
    today: NaiveDate,
) -> Result<Dashboard> {
    let panel_config = config.task_panel_config()?;
    let stats_config: CompletionStatsConfig = config.completion_stats_config()?;
    let days = stats_config.window_days;
    let window = CompletionWindow::ending_on(today, days)
        .ok_or_else(|| Error::InvalidArgument(format!("a {days}-day window ending on {today} is out of range")))?;
    Ok(Dashboard {
        today,
        goal_rate: load_goal_rate(tasks, GOAL_QUERY)?,
        dated_goals: load_dated_goals(tasks, DATED_GOAL_QUERY, today)?,
        remaining_work: load_remaining_work(tasks, REMAINING_WORK_QUERY, panel_config.excluded_labels.as_slice())?,
        completion_stats: load_completion_stats(history, window, stats_config.moving_average_span)?,
        panel: load_task_panel(tasks, &panel_config, today)?,
    })
}
