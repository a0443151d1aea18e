//! User-settable view configuration and its JSON-backed store.
//!
//! Both records live in one `config.json` next to the task store. Missing fields
//! fall back to their defaults, and a missing file yields default records.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::write_json_atomic;
use crate::error::RepositoryError;
use crate::repository::ConfigRepository;

pub const DEFAULT_PANEL_FILTER: &str = "@goal";
pub const DEFAULT_WINDOW_DAYS: u32 = 14;
pub const DEFAULT_MOVING_AVERAGE_SPAN: u32 = 7;

/// Settings of the task panel and the remaining-work counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskPanelConfig {
    /// Query selecting the tasks shown in the panel.
    pub filter: String,
    /// Labels, beyond recurring daily tasks, that never count as remaining work.
    pub excluded_labels: Vec<String>,
}

impl Default for TaskPanelConfig {
    fn default() -> Self {
        TaskPanelConfig {
            filter: DEFAULT_PANEL_FILTER.to_string(),
            excluded_labels: Vec::new(),
        }
    }
}

/// Settings of the completion statistics view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionStatsConfig {
    /// Number of days, ending today, the statistics cover.
    pub window_days: u32,
    /// Number of trailing days each moving average spans.
    pub moving_average_span: u32,
}

impl Default for CompletionStatsConfig {
    fn default() -> Self {
        CompletionStatsConfig {
            window_days: DEFAULT_WINDOW_DAYS,
            moving_average_span: DEFAULT_MOVING_AVERAGE_SPAN,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub task_panel: TaskPanelConfig,
    pub completion_stats: CompletionStatsConfig,
}

/// Config records persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: &Path) -> Self {
        ConfigStore {
            path: path.to_path_buf(),
        }
    }

    /// The store for `config.json` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(&dir.join("config.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<ConfigFile, RepositoryError> {
        if !self.path.exists() {
            return Ok(ConfigFile::default());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn write(&self, file: &ConfigFile) -> Result<(), RepositoryError> {
        write_json_atomic(&self.path, file)?;
        debug!(path = %self.path.display(), "saved config");
        Ok(())
    }
}

impl ConfigRepository for ConfigStore {
    fn task_panel_config(&self) -> Result<TaskPanelConfig, RepositoryError> {
        Ok(self.read()?.task_panel)
    }

    fn set_task_panel_config(&mut self, config: &TaskPanelConfig) -> Result<(), RepositoryError> {
        let mut file = self.read()?;
        file.task_panel = config.clone();
        self.write(&file)
    }

    fn completion_stats_config(&self) -> Result<CompletionStatsConfig, RepositoryError> {
        Ok(self.read()?.completion_stats)
    }

    fn set_completion_stats_config(&mut self, config: &CompletionStatsConfig) -> Result<(), RepositoryError> {
        let mut file = self.read()?;
        file.completion_stats = *config;
        self.write(&file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_missing() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::in_dir(dir.path());
        assert_eq!(store.task_panel_config().unwrap(), TaskPanelConfig::default());
        assert_eq!(store.completion_stats_config().unwrap().window_days, 14);
        assert_eq!(store.completion_stats_config().unwrap().moving_average_span, 7);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::in_dir(dir.path());
        fs::write(store.path(), r#"{"completion_stats": {"window_days": 30}}"#).unwrap();
        let stats = store.completion_stats_config().unwrap();
        assert_eq!(stats.window_days, 30);
        assert_eq!(stats.moving_average_span, DEFAULT_MOVING_AVERAGE_SPAN);
        assert_eq!(store.task_panel_config().unwrap().filter, DEFAULT_PANEL_FILTER);
    }

    #[test]
    fn test_records_are_written_independently() {
        let dir = tempdir().unwrap();
        let mut store = ConfigStore::in_dir(dir.path());
        let panel = TaskPanelConfig {
            filter: "@goal & p1".into(),
            excluded_labels: vec!["noise".into()],
        };
        store.set_task_panel_config(&panel).unwrap();
        store
            .set_completion_stats_config(&CompletionStatsConfig { window_days: 7, moving_average_span: 3 })
            .unwrap();
        let reread = ConfigStore::in_dir(dir.path());
        assert_eq!(reread.task_panel_config().unwrap(), panel);
        assert_eq!(reread.completion_stats_config().unwrap().moving_average_span, 3);
    }

    #[test]
    fn test_corrupt_file_is_repository_error() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::in_dir(dir.path());
        fs::write(store.path(), "[1, 2").unwrap();
        let err = store.task_panel_config().unwrap_err();
        assert!(err.message.starts_with("invalid JSON"));
        assert_eq!(err.status, None);
    }
}
