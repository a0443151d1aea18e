//! Task data structures as delivered by the task store.
//!
//! This module defines the `Task` record for active work items and the
//! `CompletedTask` record for historical completion events. Neither is ever
//! mutated once fetched; every derived view borrows them read-only.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::fields::Priority;
use crate::labels::{labels_contain, normalise_label};

/// An active work item with labels, priority, optional dates and an optional parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub due: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default, alias = "child_order")]
    pub order: i64,
}

impl Task {
    /// True when any of this task's labels normalises to the same key as `label`.
    pub fn has_label(&self, label: &str) -> bool {
        labels_contain(&self.labels, label)
    }

    /// Iterate over this task's labels in normalised form.
    pub fn normalised_labels(&self) -> impl Iterator<Item = String> + '_ {
        self.labels.iter().map(|l| normalise_label(l))
    }
}

#[cfg(test)]
impl Task {
    /// A bare task with every optional field unset.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Task {
            id: id.into(),
            content: content.into(),
            labels: Vec::new(),
            deadline: None,
            due: None,
            priority: Priority::default(),
            parent_id: None,
            project_id: None,
            order: 0,
        }
    }
}

/// A historical completion event.
///
/// `completed_at` carries no timezone: the store records local wall-clock time and
/// nothing downstream converts it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedTask {
    pub id: String,
    pub content: String,
    pub completed_at: NaiveDateTime,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl CompletedTask {
    /// The calendar day this completion is bucketed under.
    pub fn completed_on(&self) -> NaiveDate {
        self.completed_at.date()
    }
}
