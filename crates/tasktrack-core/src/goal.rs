use std::fmt;

use serde::{Deserialize, Serialize};

use crate::task::{eq_ignore_case, TaskId};

/// Session-scoped handle for a goal. See [`TaskId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GoalId(pub u64);

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named group of tasks with its own completion flag.
///
/// Linked tasks stay in the store's task list; the goal only records
/// their ids, in the order they were added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    pub is_complete: bool,
    pub task_ids: Vec<TaskId>,
}

impl Goal {
    pub fn new(id: GoalId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_complete: false,
            task_ids: Vec::new(),
        }
    }

    pub fn name_matches(&self, name: &str) -> bool {
        eq_ignore_case(&self.name, name)
    }

    /// Links a task. Duplicates are allowed.
    pub fn add_task(&mut self, id: TaskId) {
        self.task_ids.push(id);
    }
}
