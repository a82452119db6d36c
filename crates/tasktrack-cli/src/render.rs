//! Plain-text and JSON rendering of store contents.

use std::io::{self, Write};

use serde::Serialize;
use tasktrack_core::{Goal, Stats, Storage, Task, TaskStore, DEADLINE_FORMAT};

/// Numbered table of tasks.
pub fn task_table<'a, W: Write>(
    out: &mut W,
    tasks: impl IntoIterator<Item = &'a Task>,
) -> io::Result<()> {
    writeln!(
        out,
        "{:<4}{:<20}{:<15}{:<15}{:<10}{:<10}",
        "No", "Name", "Category", "Deadline", "Priority", "Completed"
    )?;
    writeln!(out, "{}", "-".repeat(74))?;
    for (index, task) in tasks.into_iter().enumerate() {
        writeln!(
            out,
            "{:<4}{:<20}{:<15}{:<15}{:<10}{:<10}",
            index + 1,
            task.name,
            task.category,
            task.deadline.format(DEADLINE_FORMAT).to_string(),
            task.priority,
            if task.is_complete { "Yes" } else { "No" }
        )?;
    }
    Ok(())
}

/// Numbered list of task names, shown before asking for one.
pub fn task_names<W: Write>(out: &mut W, tasks: &[Task]) -> io::Result<()> {
    writeln!(out, "\nAll Task Names:")?;
    for (index, task) in tasks.iter().enumerate() {
        writeln!(out, "{}. {}", index + 1, task.name)?;
    }
    Ok(())
}

pub fn goal_names<W: Write>(out: &mut W, goals: &[Goal]) -> io::Result<()> {
    writeln!(out, "\nAll Goal Names:")?;
    for (index, goal) in goals.iter().enumerate() {
        writeln!(out, "{}. {}", index + 1, goal.name)?;
    }
    Ok(())
}

/// Goals with their linked tasks indented underneath.
pub fn goal_list<S: Storage, W: Write>(out: &mut W, store: &TaskStore<S>) -> io::Result<()> {
    writeln!(out, "All Goals:")?;
    for goal in store.goals() {
        writeln!(out, "- {}{}", goal.name, complete_marker(goal.is_complete))?;
        for task in store.goal_tasks(goal) {
            writeln!(out, "    * {}{}", task.name, complete_marker(task.is_complete))?;
        }
    }
    Ok(())
}

pub fn stats<W: Write>(out: &mut W, stats: &Stats) -> io::Result<()> {
    writeln!(out, "Task Statistics:")?;
    writeln!(out, "Total Tasks: {}", stats.total_tasks)?;
    writeln!(out, "Completed Tasks: {}", stats.completed_tasks)?;
    writeln!(out, "Pending Tasks: {}", stats.pending_tasks())?;
    writeln!(out, "\nGoal Statistics:")?;
    writeln!(out, "Total Goals: {}", stats.total_goals)?;
    writeln!(out, "Completed Goals: {}", stats.completed_goals)?;
    writeln!(out, "Pending Goals: {}", stats.pending_goals())?;
    Ok(())
}

fn complete_marker(is_complete: bool) -> &'static str {
    if is_complete {
        " (Complete)"
    } else {
        ""
    }
}

/// JSON shape for `goal list --json`: links shown by task name.
#[derive(Serialize)]
struct GoalView<'a> {
    name: &'a str,
    is_complete: bool,
    tasks: Vec<&'a str>,
}

pub fn tasks_json<'a, W: Write>(
    out: &mut W,
    tasks: impl IntoIterator<Item = &'a Task>,
) -> serde_json::Result<()> {
    let tasks: Vec<&Task> = tasks.into_iter().collect();
    serde_json::to_writer_pretty(&mut *out, &tasks)?;
    writeln!(out).map_err(serde_json::Error::io)
}

pub fn goals_json<S: Storage, W: Write>(
    out: &mut W,
    store: &TaskStore<S>,
) -> serde_json::Result<()> {
    let goals: Vec<GoalView> = store
        .goals()
        .iter()
        .map(|goal| GoalView {
            name: &goal.name,
            is_complete: goal.is_complete,
            tasks: store
                .goal_tasks(goal)
                .into_iter()
                .map(|t| t.name.as_str())
                .collect(),
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &goals)?;
    writeln!(out).map_err(serde_json::Error::io)
}
