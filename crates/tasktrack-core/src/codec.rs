//! Line codec for the data file.
//!
//! Every record is one line:
//!
//! ```text
//! Task:<name>,<description>,<category>,<deadline>,<priority>,<isComplete>
//! Goal:<name>,<isComplete>[,<taskPositions>]
//! ```
//!
//! Field values escape `\`, `,`, CR and LF with a backslash. Values without
//! those characters encode exactly as the plain comma-joined format, so
//! files written before escaping existed still decode. In such files a
//! value that happens to contain `\n`, `\r`, `\\` or `\,` is read as the
//! escape.
//!
//! `taskPositions` is a `;`-separated list of zero-based indexes into the
//! task lines of the same file and is omitted when a goal has no linked
//! tasks.

use chrono::NaiveDate;
use thiserror::Error;

use crate::goal::{Goal, GoalId};
use crate::priority::Priority;
use crate::task::{parse_deadline, Task, TaskId, DEADLINE_FORMAT};

pub const TASK_TAG: &str = "Task:";
pub const GOAL_TAG: &str = "Goal:";

const TASK_FIELDS: usize = 6;
const GOAL_FIELDS: usize = 2;
const LINK_SEPARATOR: char = ';';

/// Errors raised while decoding a single line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Expected a line starting with '{expected}'")]
    WrongTag { expected: &'static str },

    #[error("Expected at least {expected} fields, found {found}")]
    MissingFields { expected: usize, found: usize },

    #[error("Invalid deadline '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid priority '{0}': expected High, Medium or Low")]
    InvalidPriority(String),

    #[error("Invalid task position '{0}' in goal links")]
    InvalidLink(String),
}

/// A goal line decoded on its own.
///
/// Links are still raw positions because resolving them needs the task
/// section of the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedGoal {
    pub goal: Goal,
    pub task_positions: Vec<usize>,
}

/// Encodes a task as one line. The id is not written.
pub fn encode_task(task: &Task) -> String {
    let deadline = task.deadline.format(DEADLINE_FORMAT).to_string();
    let fields = [
        escape(&task.name),
        escape(&task.description),
        escape(&task.category),
        deadline,
        task.priority.display_name().to_string(),
        task.is_complete.to_string(),
    ];
    format!("{}{}", TASK_TAG, fields.join(","))
}

/// Decodes a task line, giving it `id`. Fields beyond the sixth are ignored.
pub fn decode_task(line: &str, id: TaskId) -> Result<Task, FormatError> {
    let body = line
        .strip_prefix(TASK_TAG)
        .ok_or(FormatError::WrongTag { expected: TASK_TAG })?;
    let fields = split_fields(body);
    if fields.len() < TASK_FIELDS {
        return Err(FormatError::MissingFields {
            expected: TASK_FIELDS,
            found: fields.len(),
        });
    }

    let mut fields = fields.into_iter();
    let mut next = || fields.next().unwrap_or_default();

    let name = next();
    let description = next();
    let category = next();
    let deadline = decode_deadline(&next())?;
    let priority_raw = next();
    let priority = priority_raw
        .parse::<Priority>()
        .map_err(|_| FormatError::InvalidPriority(priority_raw))?;
    let is_complete = parse_bool(&next());

    Ok(Task {
        id,
        name,
        description,
        category,
        deadline,
        priority,
        is_complete,
    })
}

/// Encodes a goal as one line.
///
/// `task_order` is the order tasks are written in; links are stored as
/// positions within it. Links to ids missing from `task_order` are dropped.
pub fn encode_goal(goal: &Goal, task_order: &[TaskId]) -> String {
    let mut line = format!("{}{},{}", GOAL_TAG, escape(&goal.name), goal.is_complete);

    let positions: Vec<String> = goal
        .task_ids
        .iter()
        .filter_map(|id| task_order.iter().position(|t| t == id))
        .map(|p| p.to_string())
        .collect();
    if !positions.is_empty() {
        line.push(',');
        line.push_str(&positions.join(&LINK_SEPARATOR.to_string()));
    }

    line
}

/// Decodes a goal line, giving it `id`. The returned goal has no task ids yet.
pub fn decode_goal(line: &str, id: GoalId) -> Result<DecodedGoal, FormatError> {
    let body = line
        .strip_prefix(GOAL_TAG)
        .ok_or(FormatError::WrongTag { expected: GOAL_TAG })?;
    let fields = split_fields(body);
    if fields.len() < GOAL_FIELDS {
        return Err(FormatError::MissingFields {
            expected: GOAL_FIELDS,
            found: fields.len(),
        });
    }

    let mut goal = Goal::new(id, fields[0].clone());
    goal.is_complete = parse_bool(&fields[1]);

    let task_positions = match fields.get(2).map(|s| s.trim()) {
        Some(links) if !links.is_empty() => links
            .split(LINK_SEPARATOR)
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .map_err(|_| FormatError::InvalidLink(p.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?,
        _ => Vec::new(),
    };

    Ok(DecodedGoal {
        goal,
        task_positions,
    })
}

/// Reads a stored deadline.
///
/// Older files may hold a well-formed date whose day runs past the end of
/// its month, such as `2023-02-29`. Those are clamped to the month's last
/// day rather than rejected.
fn decode_deadline(raw: &str) -> Result<NaiveDate, FormatError> {
    parse_deadline(raw)
        .ok()
        .or_else(|| clamp_day_overflow(raw.trim()))
        .ok_or_else(|| FormatError::InvalidDate(raw.to_string()))
}

fn clamp_day_overflow(s: &str) -> Option<NaiveDate> {
    let mut parts = s.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || ![year, month, day].iter().all(|p| is_digits(p)) {
        return None;
    }
    let (year, month, day) = (
        year.parse::<i32>().ok()?,
        month.parse::<u32>().ok()?,
        day.parse::<u32>().ok()?,
    );
    if !(1..=31).contains(&day) {
        return None;
    }
    (day.min(28)..=day)
        .rev()
        .find_map(|d| NaiveDate::from_ymd_opt(year, month, d))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Only a case-insensitive `true` is true.
fn parse_bool(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case("true")
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Splits on unescaped commas and unescapes each field.
///
/// Unknown escapes and a trailing lone backslash are kept literally, which
/// keeps older unescaped files readable.
fn split_fields(body: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('\\') => current.push('\\'),
                Some(',') => current.push(','),
                Some('n') => current.push('\n'),
                Some('r') => current.push('\r'),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            ',' => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}
