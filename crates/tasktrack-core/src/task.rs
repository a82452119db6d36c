use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::priority::Priority;

/// Date format used for deadlines, both on disk and at prompts.
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` deadline.
pub fn parse_deadline(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), DEADLINE_FORMAT)
}

/// Session-scoped handle for a task.
///
/// Ids are handed out by the store in increasing order and are never reused
/// within a session. They are not written to disk: loading assigns them
/// afresh in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Display name, also used for case-insensitive lookup. Not unique.
    pub name: String,
    pub description: String,
    /// Free-form grouping label, e.g. "Work" or "Personal".
    pub category: String,
    pub deadline: NaiveDate,
    pub priority: Priority,
    pub is_complete: bool,
}

impl Task {
    /// Builds an incomplete task from its fields.
    pub fn new(id: TaskId, fields: NewTask) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            category: fields.category,
            deadline: fields.deadline,
            priority: fields.priority,
            is_complete: false,
        }
    }

    /// Case-insensitive name comparison used by every name lookup.
    pub fn name_matches(&self, name: &str) -> bool {
        eq_ignore_case(&self.name, name)
    }

    /// Applies the overrides in `edit`, keeping fields it leaves unset.
    pub fn apply(&mut self, edit: TaskEdit) {
        if let Some(name) = non_blank(edit.name) {
            self.name = name;
        }
        if let Some(description) = non_blank(edit.description) {
            self.description = description;
        }
        if let Some(category) = non_blank(edit.category) {
            self.category = category;
        }
        if let Some(deadline) = edit.deadline {
            self.deadline = deadline;
        }
        if let Some(priority) = edit.priority {
            self.priority = priority;
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] due {} ({}){}",
            self.name,
            self.category,
            self.deadline.format(DEADLINE_FORMAT),
            self.priority,
            if self.is_complete { " - done" } else { "" }
        )?;
        if !self.description.is_empty() {
            write!(f, ": {}", self.description)?;
        }
        Ok(())
    }
}

/// Fields supplied when creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub description: String,
    pub category: String,
    pub deadline: NaiveDate,
    pub priority: Priority,
}

impl NewTask {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        deadline: NaiveDate,
        priority: Priority,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category: category.into(),
            deadline,
            priority,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Partial update for a task.
///
/// `None` keeps the current value. Blank strings are treated the same way,
/// so raw prompt input can be passed straight through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub priority: Option<Priority>,
}

impl TaskEdit {
    pub fn is_empty(&self) -> bool {
        non_blank(self.name.clone()).is_none()
            && non_blank(self.description.clone()).is_none()
            && non_blank(self.category.clone()).is_none()
            && self.deadline.is_none()
            && self.priority.is_none()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Unicode-aware case-insensitive equality.
pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
