//! Goals that carry a deadline, earliest first.

use chrono::NaiveDate;
use serde::Serialize;

use crate::task::Task;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatedGoalTask {
    pub id: String,
    pub content: String,
    pub deadline: NaiveDate,
    pub order: i64,
}

impl DatedGoalTask {
    /// Project a task into a dated goal; `None` when the task has no deadline.
    pub fn from_task(task: &Task) -> Option<Self> {
        let deadline = task.deadline?;
        Some(DatedGoalTask {
            id: task.id.clone(),
            content: task.content.clone(),
            deadline,
            order: task.order,
        })
    }
}

/// Keep the tasks with a deadline, sorted by deadline then manual order.
///
/// The sort is stable, so tasks equal on both keys keep their input order.
pub fn dated_goals(tasks: &[Task]) -> Vec<DatedGoalTask> {
    let mut dated: Vec<DatedGoalTask> = tasks.iter().filter_map(DatedGoalTask::from_task).collect();
    dated.sort_by_key(|g| (g.deadline, g.order));
    dated
}
