//! Ancestor chains and task tree nodes.
//!
//! Parent links are plain ids resolved through a `TaskIndex` over the full task
//! collection. The walk is iterative and keeps a visited set, so broken links,
//! foreign parents and cycles all end the chain instead of erroring or looping.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::fields::Priority;
use crate::task::Task;

/// One ancestor, linked to its own parent.
///
/// Cloning, comparison, formatting and dropping all walk the links in a loop, so
/// a deep chain never recurses.
pub struct ParentTask {
    pub id: String,
    pub content: String,
    pub order: i64,
    pub parent: Option<Box<ParentTask>>,
}

impl ParentTask {
    /// This ancestor followed by its own ancestors, up to the root.
    fn lineage(&self) -> impl Iterator<Item = &ParentTask> {
        std::iter::successors(Some(self), |p| p.parent.as_deref())
    }

    fn detached(&self) -> ParentTask {
        ParentTask {
            id: self.id.clone(),
            content: self.content.clone(),
            order: self.order,
            parent: None,
        }
    }
}

/// Link unlinked nodes, given root first, into a chain headed by the last one.
fn link_root_down(root_first: impl IntoIterator<Item = ParentTask>) -> Option<Box<ParentTask>> {
    let mut chain = None;
    for mut node in root_first {
        node.parent = chain;
        chain = Some(Box::new(node));
    }
    chain
}

impl Drop for ParentTask {
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(mut node) = next {
            next = node.parent.take();
        }
    }
}

impl Clone for ParentTask {
    fn clone(&self) -> Self {
        let above: Vec<&ParentTask> = self.lineage().skip(1).collect();
        let mut head = self.detached();
        head.parent = link_root_down(above.into_iter().rev().map(ParentTask::detached));
        head
    }
}

impl PartialEq for ParentTask {
    fn eq(&self, other: &Self) -> bool {
        let mut ours = self.lineage();
        let mut theirs = other.lineage();
        loop {
            match (ours.next(), theirs.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if ParentEntry::from(a) == ParentEntry::from(b) => {}
                _ => return false,
            }
        }
    }
}

impl Eq for ParentTask {}

impl fmt::Debug for ParentTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let above: Vec<ParentEntry<'_>> = self.lineage().skip(1).map(ParentEntry::from).collect();
        f.debug_struct("ParentTask")
            .field("id", &self.id)
            .field("content", &self.content)
            .field("order", &self.order)
            .field("ancestors", &above)
            .finish()
    }
}

/// One chain link without its parent pointer.
#[derive(Debug, PartialEq, Eq, Serialize)]
struct ParentEntry<'a> {
    id: &'a str,
    content: &'a str,
    order: i64,
}

impl<'a> From<&'a ParentTask> for ParentEntry<'a> {
    fn from(p: &'a ParentTask) -> Self {
        ParentEntry {
            id: &p.id,
            content: &p.content,
            order: p.order,
        }
    }
}

/// The resolved ancestors of a task, starting at its immediate parent.
///
/// Serializes as a flat list from the immediate parent up to the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AncestorChain(pub Option<Box<ParentTask>>);

impl Serialize for AncestorChain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(ParentEntry::from))
    }
}

impl AncestorChain {
    pub fn immediate_parent(&self) -> Option<&ParentTask> {
        self.0.as_deref()
    }

    /// Ancestors from the immediate parent up to the root.
    pub fn iter(&self) -> impl Iterator<Item = &ParentTask> {
        self.0.iter().flat_map(|p| p.lineage())
    }

    pub fn depth(&self) -> usize {
        self.iter().count()
    }

    /// Ancestors from the root down to the immediate parent.
    pub fn breadcrumb(&self) -> Vec<&ParentTask> {
        let mut crumbs: Vec<&ParentTask> = self.iter().collect();
        crumbs.reverse();
        crumbs
    }

    /// Root-first ancestor contents joined with ` › `.
    pub fn breadcrumb_string(&self) -> String {
        self.breadcrumb()
            .iter()
            .map(|p| p.content.as_str())
            .collect::<Vec<_>>()
            .join(" › ")
    }
}

/// A task with its parent id replaced by the resolved ancestor chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskTreeNode {
    pub id: String,
    pub content: String,
    pub labels: Vec<String>,
    pub deadline: Option<NaiveDate>,
    pub due: Option<NaiveDate>,
    pub priority: Priority,
    pub project_id: Option<String>,
    pub order: i64,
    pub parent: AncestorChain,
}

/// Id lookup over the full task collection.
pub struct TaskIndex<'a> {
    by_id: HashMap<&'a str, &'a Task>,
}

impl<'a> TaskIndex<'a> {
    /// Index `tasks` by id. On duplicate ids the first occurrence wins.
    pub fn new(tasks: &'a [Task]) -> Self {
        let mut by_id = HashMap::with_capacity(tasks.len());
        for t in tasks {
            by_id.entry(t.id.as_str()).or_insert(t);
        }
        TaskIndex { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a Task> {
        self.by_id.get(id).copied()
    }

    /// Resolve the ancestor chain of `task`.
    pub fn ancestors(&self, task: &Task) -> AncestorChain {
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(task.id.as_str());

        // Immediate parent first.
        let mut hops: Vec<&Task> = Vec::new();
        let mut next = task.parent_id.as_deref();
        while let Some(pid) = next {
            let Some(parent) = self.get(pid) else {
                debug!(task = %task.id, parent = pid, "parent not found, chain ends");
                break;
            };
            if !visited.insert(parent.id.as_str()) {
                debug!(task = %task.id, parent = pid, "parent cycle detected, chain ends");
                break;
            }
            hops.push(parent);
            next = parent.parent_id.as_deref();
        }

        AncestorChain(link_root_down(hops.into_iter().rev().map(|hop| ParentTask {
            id: hop.id.clone(),
            content: hop.content.clone(),
            order: hop.order,
            parent: None,
        })))
    }

    pub fn tree_node(&self, task: &Task) -> TaskTreeNode {
        TaskTreeNode {
            id: task.id.clone(),
            content: task.content.clone(),
            labels: task.labels.clone(),
            deadline: task.deadline,
            due: task.due,
            priority: task.priority,
            project_id: task.project_id.clone(),
            order: task.order,
            parent: self.ancestors(task),
        }
    }
}

/// Resolve tree nodes for `selected`, looking parents up in `all`.
pub fn build_task_tree(all: &[Task], selected: &[Task]) -> Vec<TaskTreeNode> {
    let index = TaskIndex::new(all);
    selected.iter().map(|t| index.tree_node(t)).collect()
}
