use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::goal::{Goal, GoalId};
use crate::storage::{Snapshot, Storage, StorageError};
use crate::task::{eq_ignore_case, NewTask, Task, TaskEdit, TaskId};

/// Field to order the task list by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Lexicographic, case-sensitive.
    Name,
    /// Earliest deadline first.
    Deadline,
    /// High, then Medium, then Low.
    Priority,
}

/// Counts over the current collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub total_goals: usize,
    pub completed_goals: usize,
}

impl Stats {
    pub fn pending_tasks(&self) -> usize {
        self.total_tasks.saturating_sub(self.completed_tasks)
    }

    pub fn pending_goals(&self) -> usize {
        self.total_goals.saturating_sub(self.completed_goals)
    }
}

/// Holds tasks and goals in memory and keeps the backing storage in sync.
///
/// Every mutation is followed by a full save. If that save fails the change
/// stays in memory and the storage error is returned; a later successful
/// save (explicit or from the next mutation) writes it out.
///
/// Name lookups are case-insensitive and pick the first match in list
/// order. Names are not unique, so each name-based operation has a
/// `*_by_id` counterpart.
pub struct TaskStore<S: Storage> {
    storage: S,
    tasks: Vec<Task>,
    goals: Vec<Goal>,
    next_task_id: u64,
    next_goal_id: u64,
}

impl<S: Storage> TaskStore<S> {
    /// Opens a store, loading whatever the storage backend holds.
    pub fn open(storage: S) -> Result<Self, StoreError> {
        let Snapshot { tasks, goals } = storage.load()?;
        let next_task_id = tasks.iter().map(|t| t.id.0).max().unwrap_or(0) + 1;
        let next_goal_id = goals.iter().map(|g| g.id.0).max().unwrap_or(0) + 1;

        Ok(Self {
            storage,
            tasks,
            goals,
            next_task_id,
            next_goal_id,
        })
    }

    /// Writes the current state to storage.
    pub fn save(&self) -> Result<(), StoreError> {
        self.storage.save(&self.tasks, &self.goals)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    /// All tasks in their current order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Creates an incomplete task at the end of the list.
    pub fn add_task(&mut self, fields: NewTask) -> Result<Task, StoreError> {
        let id = TaskId(self.next_task_id);
        self.next_task_id += 1;

        let task = Task::new(id, fields);
        tracing::debug!(id = id.0, "Adding task '{}'", task.name);
        self.tasks.push(task.clone());
        self.save()?;
        Ok(task)
    }

    /// First task whose name matches, ignoring case.
    pub fn find_task_by_name(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name_matches(name))
    }

    /// Every task whose name matches, ignoring case, in list order.
    pub fn find_tasks_by_name(&self, name: &str) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.name_matches(name)).collect()
    }

    /// Resolves a name to the id of the first matching task.
    pub fn resolve_task(&self, name: &str) -> Result<TaskId, StoreError> {
        self.find_task_by_name(name)
            .map(|t| t.id)
            .ok_or_else(|| StoreError::TaskNotFound(name.to_string()))
    }

    /// Marks the first task named `name` as complete.
    pub fn mark_complete(&mut self, name: &str) -> Result<Task, StoreError> {
        let id = self.resolve_task(name)?;
        self.mark_complete_by_id(id)
    }

    pub fn mark_complete_by_id(&mut self, id: TaskId) -> Result<Task, StoreError> {
        let task = self.task_mut(id)?;
        task.is_complete = true;
        let task = task.clone();

        tracing::debug!(id = id.0, "Completed task '{}'", task.name);
        self.save()?;
        Ok(task)
    }

    /// Removes the first task named `name` and unlinks it from every goal.
    pub fn remove_task(&mut self, name: &str) -> Result<Task, StoreError> {
        let id = self.resolve_task(name)?;
        self.remove_task_by_id(id)
    }

    pub fn remove_task_by_id(&mut self, id: TaskId) -> Result<Task, StoreError> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::TaskNotFound(id.to_string()))?;
        let task = self.tasks.remove(index);

        for goal in &mut self.goals {
            goal.task_ids.retain(|t| *t != id);
        }

        tracing::debug!(id = id.0, "Removed task '{}'", task.name);
        self.save()?;
        Ok(task)
    }

    /// Applies `edit` to the first task named `name`.
    pub fn edit_task(&mut self, name: &str, edit: TaskEdit) -> Result<Task, StoreError> {
        let id = self.resolve_task(name)?;
        self.edit_task_by_id(id, edit)
    }

    pub fn edit_task_by_id(&mut self, id: TaskId, edit: TaskEdit) -> Result<Task, StoreError> {
        let task = self.task_mut(id)?;
        task.apply(edit);
        let task = task.clone();

        tracing::debug!(id = id.0, "Edited task '{}'", task.name);
        self.save()?;
        Ok(task)
    }

    /// Tasks whose category equals `category`, ignoring case.
    pub fn filter_by_category(&self, category: &str) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| eq_ignore_case(&t.category, category))
            .collect()
    }

    /// Stable in-place sort of the task list. The new order is saved.
    pub fn sort_by(&mut self, key: SortKey) -> Result<(), StoreError> {
        match key {
            SortKey::Name => self.tasks.sort_by(|a, b| a.name.cmp(&b.name)),
            SortKey::Deadline => self.tasks.sort_by_key(|t| t.deadline),
            SortKey::Priority => self.tasks.sort_by_key(|t| t.priority),
        }
        self.save()
    }

    pub fn sort_by_name(&mut self) -> Result<(), StoreError> {
        self.sort_by(SortKey::Name)
    }

    pub fn sort_by_deadline(&mut self) -> Result<(), StoreError> {
        self.sort_by(SortKey::Deadline)
    }

    pub fn sort_by_priority(&mut self) -> Result<(), StoreError> {
        self.sort_by(SortKey::Priority)
    }

    fn task_mut(&mut self, id: TaskId) -> Result<&mut Task, StoreError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::TaskNotFound(id.to_string()))
    }

    // ------------------------------------------------------------------
    // Goals
    // ------------------------------------------------------------------

    /// All goals in insertion order.
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn add_goal(&mut self, name: impl Into<String>) -> Result<Goal, StoreError> {
        let id = GoalId(self.next_goal_id);
        self.next_goal_id += 1;

        let goal = Goal::new(id, name);
        tracing::debug!(id = id.0, "Adding goal '{}'", goal.name);
        self.goals.push(goal.clone());
        self.save()?;
        Ok(goal)
    }

    pub fn find_goal_by_name(&self, name: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.name_matches(name))
    }

    pub fn resolve_goal(&self, name: &str) -> Result<GoalId, StoreError> {
        self.find_goal_by_name(name)
            .map(|g| g.id)
            .ok_or_else(|| StoreError::GoalNotFound(name.to_string()))
    }

    pub fn mark_goal_complete(&mut self, name: &str) -> Result<Goal, StoreError> {
        let id = self.resolve_goal(name)?;
        self.mark_goal_complete_by_id(id)
    }

    pub fn mark_goal_complete_by_id(&mut self, id: GoalId) -> Result<Goal, StoreError> {
        let goal = self.goal_mut(id)?;
        goal.is_complete = true;
        let goal = goal.clone();

        tracing::debug!(id = id.0, "Completed goal '{}'", goal.name);
        self.save()?;
        Ok(goal)
    }

    pub fn remove_goal(&mut self, name: &str) -> Result<Goal, StoreError> {
        let id = self.resolve_goal(name)?;
        self.remove_goal_by_id(id)
    }

    /// Removes a goal. Its linked tasks stay in the task list.
    pub fn remove_goal_by_id(&mut self, id: GoalId) -> Result<Goal, StoreError> {
        let index = self
            .goals
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| StoreError::GoalNotFound(id.to_string()))?;
        let goal = self.goals.remove(index);

        tracing::debug!(id = id.0, "Removed goal '{}'", goal.name);
        self.save()?;
        Ok(goal)
    }

    /// Links the first task named `task_name` to the first goal named
    /// `goal_name`. The goal is looked up first.
    pub fn add_task_to_goal(
        &mut self,
        goal_name: &str,
        task_name: &str,
    ) -> Result<Goal, StoreError> {
        let goal_id = self.resolve_goal(goal_name)?;
        let task_id = self.resolve_task(task_name)?;
        self.add_task_to_goal_by_id(goal_id, task_id)
    }

    /// Links a task to a goal. Linking the same task twice is allowed.
    pub fn add_task_to_goal_by_id(
        &mut self,
        goal_id: GoalId,
        task_id: TaskId,
    ) -> Result<Goal, StoreError> {
        if self.task(task_id).is_none() {
            return Err(StoreError::TaskNotFound(task_id.to_string()));
        }
        let goal = self.goal_mut(goal_id)?;
        goal.add_task(task_id);
        let goal = goal.clone();

        tracing::debug!(goal = goal_id.0, task = task_id.0, "Linked task to goal");
        self.save()?;
        Ok(goal)
    }

    /// The tasks linked to `goal`, in link order.
    pub fn goal_tasks(&self, goal: &Goal) -> Vec<&Task> {
        goal.task_ids.iter().filter_map(|id| self.task(*id)).collect()
    }

    fn goal_mut(&mut self, id: GoalId) -> Result<&mut Goal, StoreError> {
        self.goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| StoreError::GoalNotFound(id.to_string()))
    }

    // ------------------------------------------------------------------
    // Statistics
    // ------------------------------------------------------------------

    pub fn stats(&self) -> Stats {
        Stats {
            total_tasks: self.tasks.len(),
            completed_tasks: self.tasks.iter().filter(|t| t.is_complete).count(),
            total_goals: self.goals.len(),
            completed_goals: self.goals.iter().filter(|g| g.is_complete).count(),
        }
    }
}

/// Errors that can occur in TaskStore operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Goal not found: {0}")]
    GoalNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl StoreError {
    /// True for lookup misses, which callers report and carry on from.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::TaskNotFound(_) | StoreError::GoalNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::priority::Priority;
    use crate::storage::FileStorage;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_store() -> (TaskStore<FileStorage>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("data.txt"));
        let store = TaskStore::open(storage).unwrap();
        (store, temp_dir)
    }

    fn new_task(name: &str) -> NewTask {
        NewTask::new(
            name,
            "Work",
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            Priority::Medium,
        )
    }

    #[test]
    fn test_ids_are_not_reused() {
        let (mut store, _temp) = create_test_store();

        let first = store.add_task(new_task("First")).unwrap();
        store.remove_task_by_id(first.id).unwrap();
        let second = store.add_task(new_task("Second")).unwrap();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_duplicate_names_are_addressable_by_id() {
        let (mut store, _temp) = create_test_store();

        let first = store.add_task(new_task("Same")).unwrap();
        let second = store.add_task(new_task("same")).unwrap();

        assert_eq!(store.find_tasks_by_name("SAME").len(), 2);
        store.mark_complete_by_id(second.id).unwrap();

        assert!(!store.task(first.id).unwrap().is_complete);
        assert!(store.task(second.id).unwrap().is_complete);
    }

    #[test]
    fn test_removing_task_unlinks_it_from_goals() {
        let (mut store, _temp) = create_test_store();

        store.add_task(new_task("Run 5k")).unwrap();
        store.add_task(new_task("Stretch")).unwrap();
        store.add_goal("Get fit").unwrap();
        store.add_task_to_goal("get fit", "run 5k").unwrap();
        store.add_task_to_goal("Get fit", "Stretch").unwrap();

        store.remove_task("Run 5k").unwrap();

        let goal = store.find_goal_by_name("Get fit").unwrap();
        let names: Vec<_> = store.goal_tasks(goal).iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Stretch"]);
    }

    #[test]
    fn test_missing_goal_reported_before_missing_task() {
        let (mut store, _temp) = create_test_store();

        let err = store.add_task_to_goal("Nope", "Also nope").unwrap_err();
        assert!(matches!(err, StoreError::GoalNotFound(_)));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_failed_save_keeps_change_in_memory() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where the data directory should be.
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let storage = FileStorage::new(blocker.join("data.txt"));
        let mut store = TaskStore::open(storage).unwrap();

        let err = store.add_task(new_task("Unsaved")).unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
        assert!(!err.is_not_found());
        assert_eq!(store.tasks().len(), 1);
    }
}
