//! Collaborator contracts the derived views are fed from.
//!
//! These traits abstract the task service, the completion history and the config
//! store so the views can be computed against the local JSON store or a test
//! double alike.

use crate::config::{CompletionStatsConfig, TaskPanelConfig};
use crate::error::{RepositoryError, RequestError};
use crate::task::{CompletedTask, Task};
use crate::views::stats::CompletionWindow;

pub trait TaskRepository {
    /// Every active task matching `filter`, in the service's filter language.
    fn get_all(&self, filter: &str) -> Result<Vec<Task>, RequestError>;

    /// Mark a task complete.
    fn complete(&mut self, task_id: &str) -> Result<(), RequestError>;
}

pub trait CompletionStatsRepository {
    /// Completion events whose completion date falls inside `window`.
    fn fetch_completed_tasks(&self, window: CompletionWindow) -> Result<Vec<CompletedTask>, RepositoryError>;
}

pub trait ConfigRepository {
    fn task_panel_config(&self) -> Result<TaskPanelConfig, RepositoryError>;
    fn set_task_panel_config(&mut self, config: &TaskPanelConfig) -> Result<(), RepositoryError>;
    fn completion_stats_config(&self) -> Result<CompletionStatsConfig, RepositoryError>;
    fn set_completion_stats_config(&mut self, config: &CompletionStatsConfig) -> Result<(), RepositoryError>;
}
