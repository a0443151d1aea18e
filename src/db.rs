//! Local JSON task store.
//!
//! This module provides `TaskStore`, a file-backed snapshot of the task service:
//! the active tasks plus the history of completed tasks. It implements the task
//! and completion-history repository contracts so every derived view can run
//! against it.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{RepositoryError, RequestError};
use crate::filter::Filter;
use crate::repository::{CompletionStatsRepository, TaskRepository};
use crate::task::{CompletedTask, Task};
use crate::views::stats::CompletionWindow;

/// Serialized shape of the store file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub completed: Vec<CompletedTask>,
}

/// A task snapshot bound to the file it was loaded from.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    snapshot: Snapshot,
}

impl TaskStore {
    /// Load the store from `path`; a missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self, RequestError> {
        let snapshot = if path.exists() {
            let mut buf = String::new();
            File::open(path)?.read_to_string(&mut buf)?;
            serde_json::from_str(&buf)?
        } else {
            debug!(path = %path.display(), "no task store yet, starting empty");
            Snapshot::default()
        };
        debug!(
            tasks = snapshot.tasks.len(),
            completed = snapshot.completed.len(),
            "loaded task store"
        );
        Ok(TaskStore::with_snapshot(path, snapshot))
    }

    /// An unsaved store holding `snapshot`, to be written to `path`.
    pub fn with_snapshot(path: &Path, snapshot: Snapshot) -> Self {
        TaskStore {
            path: path.to_path_buf(),
            snapshot,
        }
    }

    /// Save to the backing file using atomic write (temp file + rename).
    pub fn save(&self) -> std::io::Result<()> {
        write_json_atomic(&self.path, &self.snapshot)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tasks(&self) -> &[Task] {
        &self.snapshot.tasks
    }

    pub fn completed(&self) -> &[CompletedTask] {
        &self.snapshot.completed
    }
}

impl TaskRepository for TaskStore {
    fn get_all(&self, filter: &str) -> Result<Vec<Task>, RequestError> {
        let parsed = Filter::parse(filter)?;
        let tasks: Vec<Task> = self
            .tasks()
            .iter()
            .filter(|t| parsed.matches(t))
            .cloned()
            .collect();
        debug!(filter, matched = tasks.len(), "queried tasks");
        Ok(tasks)
    }

    fn complete(&mut self, task_id: &str) -> Result<(), RequestError> {
        let idx = self
            .snapshot
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| RequestError::NotFound(task_id.to_string()))?;
        let task = self.snapshot.tasks.remove(idx);
        self.snapshot.completed.push(CompletedTask {
            id: task.id,
            content: task.content,
            completed_at: Local::now().naive_local(),
            labels: task.labels,
        });
        self.save()?;
        info!(task_id, "task completed");
        Ok(())
    }
}

impl CompletionStatsRepository for TaskStore {
    fn fetch_completed_tasks(&self, window: CompletionWindow) -> Result<Vec<CompletedTask>, RepositoryError> {
        let events: Vec<CompletedTask> = self
            .completed()
            .iter()
            .filter(|c| window.contains(c.completed_on()))
            .cloned()
            .collect();
        debug!(since = %window.since, until = %window.until, events = events.len(), "fetched completions");
        Ok(events)
    }
}

/// Atomic-ish JSON write via temp + rename.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> std::io::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_string_pretty(value)?;
    let mut f = File::create(&tmp)?;
    f.write_all(data.as_bytes())?;
    f.flush()?;
    fs::rename(tmp, path)?;
    Ok(())
}
