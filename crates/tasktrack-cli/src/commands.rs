//! One-shot subcommand handlers.

use std::io::Write;

use color_eyre::Result;
use tasktrack_core::{NewTask, Storage, StoreError, TaskEdit, TaskStore};

use crate::cli::{GoalCommand, TaskCommand};
use crate::render;

/// Prints `result` with `on_ok`, or prints a lookup miss and carries on.
/// Other errors are returned.
fn report<T, W: Write>(
    out: &mut W,
    result: Result<T, StoreError>,
    on_ok: impl FnOnce(&mut W, T) -> std::io::Result<()>,
) -> Result<()> {
    match result {
        Ok(value) => on_ok(out, value)?,
        Err(e) if e.is_not_found() => writeln!(out, "{}", e)?,
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

pub fn run_task<S: Storage, W: Write>(
    store: &mut TaskStore<S>,
    command: TaskCommand,
    out: &mut W,
) -> Result<()> {
    match command {
        TaskCommand::Add {
            name,
            category,
            deadline,
            priority,
            description,
        } => {
            let fields =
                NewTask::new(name, category, deadline, priority).with_description(description);
            let task = store.add_task(fields)?;
            writeln!(out, "Task \"{}\" has been added.", task.name)?;
        }
        TaskCommand::List { json } => {
            if json {
                render::tasks_json(out, store.tasks())?;
            } else {
                render::task_table(out, store.tasks())?;
            }
        }
        TaskCommand::Done { name } => {
            report(out, store.mark_complete(&name), |out, task| {
                writeln!(out, "Task \"{}\" has been marked as complete.", task.name)
            })?;
        }
        TaskCommand::Remove { name } => {
            report(out, store.remove_task(&name), |out, task| {
                writeln!(out, "Task \"{}\" has been removed.", task.name)
            })?;
        }
        TaskCommand::Edit {
            name,
            new_name,
            description,
            category,
            deadline,
            priority,
        } => {
            let edit = TaskEdit {
                name: new_name,
                description,
                category,
                deadline,
                priority,
            };
            if edit.is_empty() {
                writeln!(out, "Nothing to change.")?;
                return Ok(());
            }
            report(out, store.edit_task(&name, edit), |out, task| {
                writeln!(out, "Task \"{}\" has been updated.", task.name)
            })?;
        }
        TaskCommand::Search { name } => {
            let matches = store.find_tasks_by_name(&name);
            if matches.is_empty() {
                writeln!(out, "Task not found.")?;
            }
            for task in matches {
                writeln!(out, "Task found: {}", task)?;
            }
        }
        TaskCommand::Filter { category, json } => {
            let tasks = store.filter_by_category(&category);
            if json {
                render::tasks_json(out, tasks)?;
            } else if tasks.is_empty() {
                writeln!(out, "No tasks found in category \"{}\".", category)?;
            } else {
                render::task_table(out, tasks)?;
            }
        }
        TaskCommand::Sort { key } => {
            store.sort_by(key.into())?;
            render::task_table(out, store.tasks())?;
        }
    }
    Ok(())
}

pub fn run_goal<S: Storage, W: Write>(
    store: &mut TaskStore<S>,
    command: GoalCommand,
    out: &mut W,
) -> Result<()> {
    match command {
        GoalCommand::Add { name } => {
            let goal = store.add_goal(name)?;
            writeln!(out, "Goal \"{}\" has been added.", goal.name)?;
        }
        GoalCommand::List { json } => {
            if json {
                render::goals_json(out, store)?;
            } else {
                render::goal_list(out, store)?;
            }
        }
        GoalCommand::Link { goal, task } => {
            report(out, store.add_task_to_goal(&goal, &task), |out, goal| {
                writeln!(out, "Task \"{}\" has been added to goal \"{}\".", task, goal.name)
            })?;
        }
        GoalCommand::Done { name } => {
            report(out, store.mark_goal_complete(&name), |out, goal| {
                writeln!(out, "Goal \"{}\" has been marked as complete.", goal.name)
            })?;
        }
        GoalCommand::Remove { name } => {
            report(out, store.remove_goal(&name), |out, goal| {
                writeln!(out, "Goal \"{}\" has been removed.", goal.name)
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SortField;
    use chrono::NaiveDate;
    use tasktrack_core::{FileStorage, Priority};
    use tempfile::TempDir;

    fn create_test_store() -> (TaskStore<FileStorage>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("data.txt"));
        (TaskStore::open(storage).unwrap(), temp_dir)
    }

    fn add(store: &mut TaskStore<FileStorage>, name: &str, category: &str, day: u32) {
        let mut out = Vec::new();
        run_task(
            store,
            TaskCommand::Add {
                name: name.to_string(),
                category: category.to_string(),
                deadline: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
                priority: Priority::Low,
                description: String::new(),
            },
            &mut out,
        )
        .unwrap();
    }

    fn output_of(
        store: &mut TaskStore<FileStorage>,
        command: TaskCommand,
    ) -> String {
        let mut out = Vec::new();
        run_task(store, command, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_not_found_is_reported_not_returned() {
        let (mut store, _temp) = create_test_store();

        let text = output_of(&mut store, TaskCommand::Done { name: "ghost".to_string() });
        assert_eq!(text, "Task not found: ghost\n");

        let mut out = Vec::new();
        run_goal(
            &mut store,
            GoalCommand::Remove { name: "ghost".to_string() },
            &mut out,
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Goal not found: ghost\n");
    }

    #[test]
    fn test_sort_then_filter_json() {
        let (mut store, _temp) = create_test_store();
        add(&mut store, "Write report", "Work", 30);
        add(&mut store, "Clean house", "Personal", 10);

        output_of(&mut store, TaskCommand::Sort { key: SortField::Deadline });
        assert_eq!(store.tasks()[0].name, "Clean house");

        let text = output_of(
            &mut store,
            TaskCommand::Filter {
                category: "WORK".to_string(),
                json: true,
            },
        );
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let tasks = value.as_array().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0]["name"], "Write report");
        assert_eq!(tasks[0]["deadline"], "2024-04-30");
        assert_eq!(tasks[0]["priority"], "Low");
    }

    #[test]
    fn test_goal_json_lists_task_names() {
        let (mut store, _temp) = create_test_store();
        add(&mut store, "Run", "Health", 1);
        let mut out = Vec::new();
        run_goal(&mut store, GoalCommand::Add { name: "Fit".to_string() }, &mut out).unwrap();
        run_goal(
            &mut store,
            GoalCommand::Link {
                goal: "fit".to_string(),
                task: "run".to_string(),
            },
            &mut out,
        )
        .unwrap();

        let mut out = Vec::new();
        run_goal(&mut store, GoalCommand::List { json: true }, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["name"], "Fit");
        assert_eq!(value[0]["tasks"][0], "Run");
    }
}
