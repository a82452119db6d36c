//! Interactive numbered menus.
//!
//! Input is read line by line; malformed numbers, dates and priorities are
//! re-prompted. Closing the input (EOF) leaves the menu like choosing Exit.

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;
use tasktrack_core::{
    parse_deadline, NewTask, Priority, SortKey, Storage, StoreError, TaskEdit, TaskStore,
};

use crate::render;

const INVALID_OPTION: &str = "Invalid option. Please try again.";
const INVALID_PRIORITY: &str = "Invalid priority. Please enter 'High', 'Medium', or 'Low'.";
const INVALID_DATE: &str = "Invalid date format. Please enter the date in YYYY-MM-DD format.";

pub struct Menu<'a, S: Storage, R: BufRead, W: Write> {
    store: &'a mut TaskStore<S>,
    input: R,
    out: W,
}

impl<'a, S: Storage, R: BufRead, W: Write> Menu<'a, S, R, W> {
    pub fn new(store: &'a mut TaskStore<S>, input: R, out: W) -> Self {
        Self { store, input, out }
    }

    /// Runs the main menu until the user exits or input ends.
    pub fn run(mut self) -> io::Result<()> {
        match self.main_menu() {
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                writeln!(self.out)?;
                Ok(())
            }
            other => other,
        }
    }

    fn main_menu(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.out, "\nMain Menu:")?;
            writeln!(self.out, "1. Task Management")?;
            writeln!(self.out, "2. Goal Management")?;
            writeln!(self.out, "3. View Task Statistics")?;
            writeln!(self.out, "4. Exit")?;

            match self.read_choice("Please select an option (1-4): ")? {
                1 => self.task_menu()?,
                2 => self.goal_menu()?,
                3 => render::stats(&mut self.out, &self.store.stats())?,
                4 => {
                    writeln!(self.out, "Goodbye!")?;
                    return Ok(());
                }
                _ => writeln!(self.out, "{}", INVALID_OPTION)?,
            }
        }
    }

    fn task_menu(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.out, "\nTask Management Menu:")?;
            for (n, label) in [
                "Add a Task",
                "View All Tasks",
                "Mark Task as Complete",
                "Remove a Task",
                "Edit a Task",
                "Search by Name",
                "Filter by Category",
                "Sort by Name",
                "Sort by Deadline",
                "Sort by Priority",
                "Return to Main Menu",
            ]
            .iter()
            .enumerate()
            {
                writeln!(self.out, "{}. {}", n + 1, label)?;
            }

            match self.read_choice("Please select an option (1-11): ")? {
                1 => self.add_task()?,
                2 => self.view_tasks()?,
                3 => self.mark_task_complete()?,
                4 => self.remove_task()?,
                5 => self.edit_task()?,
                6 => self.search_tasks()?,
                7 => self.filter_by_category()?,
                8 => self.sort_tasks(SortKey::Name, "name")?,
                9 => self.sort_tasks(SortKey::Deadline, "deadline")?,
                10 => self.sort_tasks(SortKey::Priority, "priority")?,
                11 => return Ok(()),
                _ => writeln!(self.out, "{}", INVALID_OPTION)?,
            }
        }
    }

    fn goal_menu(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.out, "\nGoal Management Menu:")?;
            writeln!(self.out, "1. Add a Goal")?;
            writeln!(self.out, "2. View All Goals")?;
            writeln!(self.out, "3. Add Task to Goal")?;
            writeln!(self.out, "4. Mark Goal as Complete")?;
            writeln!(self.out, "5. Remove a Goal")?;
            writeln!(self.out, "6. Return to Main Menu")?;

            match self.read_choice("Please select an option (1-6): ")? {
                1 => self.add_goal()?,
                2 => render::goal_list(&mut self.out, &*self.store)?,
                3 => self.add_task_to_goal()?,
                4 => self.mark_goal_complete()?,
                5 => self.remove_goal()?,
                6 => return Ok(()),
                _ => writeln!(self.out, "{}", INVALID_OPTION)?,
            }
        }
    }

    // ------------------------------------------------------------------
    // Task actions
    // ------------------------------------------------------------------

    fn add_task(&mut self) -> io::Result<()> {
        loop {
            let name = self.read_required("Enter Task Name: ", "Name cannot be empty.", |s| {
                Some(s.to_string())
            })?;
            let description = self.read_line("Enter Task Description (optional): ")?;
            let category =
                self.read_line("Enter Task Category (e.g., Work, Personal, School): ")?;
            let priority = self.read_required(
                "Enter Task Priority (High, Medium, Low): ",
                INVALID_PRIORITY,
                parse_priority,
            )?;
            let deadline = self.read_required(
                "Enter Task Deadline (YYYY-MM-DD): ",
                INVALID_DATE,
                parse_date,
            )?;

            let fields =
                NewTask::new(name, category, deadline, priority).with_description(description);
            let result = self.store.add_task(fields);
            self.report(result, |task| {
                format!("Task \"{}\" has been added successfully!", task.name)
            })?;

            let again = self.read_line("Do you want to add another task? (y/n): ")?;
            if !again.eq_ignore_ascii_case("y") {
                return Ok(());
            }
        }
    }

    fn view_tasks(&mut self) -> io::Result<()> {
        writeln!(self.out, "All Tasks:")?;
        render::task_table(&mut self.out, self.store.tasks())
    }

    fn mark_task_complete(&mut self) -> io::Result<()> {
        render::task_names(&mut self.out, self.store.tasks())?;
        let name = self.read_line("Enter the name of the task to mark as complete: ")?;
        let result = self.store.mark_complete(&name);
        self.report(result, |task| {
            format!("Task \"{}\" has been marked as complete!", task.name)
        })
    }

    fn remove_task(&mut self) -> io::Result<()> {
        render::task_names(&mut self.out, self.store.tasks())?;
        let name = self.read_line("Enter the name of the task to remove: ")?;
        let result = self.store.remove_task(&name);
        self.report(result, |task| {
            format!("Task \"{}\" has been removed successfully!", task.name)
        })
    }

    fn edit_task(&mut self) -> io::Result<()> {
        render::task_names(&mut self.out, self.store.tasks())?;
        let name = self.read_line("Enter the name of the task you want to edit: ")?;
        let id = match self.store.resolve_task(&name) {
            Ok(id) => id,
            Err(e) => return writeln!(self.out, "{}", e),
        };

        let edit = TaskEdit {
            name: Some(self.read_line("Enter new task name (leave blank to keep current): ")?),
            description: Some(
                self.read_line("Enter new description (leave blank to keep current): ")?,
            ),
            category: Some(
                self.read_line("Enter new task category (leave blank to keep current): ")?,
            ),
            deadline: self.read_optional(
                "Enter new deadline (YYYY-MM-DD, leave blank to keep current): ",
                INVALID_DATE,
                parse_date,
            )?,
            priority: self.read_optional(
                "Enter new priority (High, Medium, Low, leave blank to keep current): ",
                INVALID_PRIORITY,
                parse_priority,
            )?,
        };

        let result = self.store.edit_task_by_id(id, edit);
        self.report(result, |task| {
            format!("Task \"{}\" has been updated successfully!", task.name)
        })
    }

    fn search_tasks(&mut self) -> io::Result<()> {
        let name = self.read_line("Enter the name of the task to search for: ")?;
        let matches = self.store.find_tasks_by_name(&name);
        if matches.is_empty() {
            return writeln!(self.out, "Task not found.");
        }
        for task in matches {
            writeln!(self.out, "Task found: {}", task)?;
        }
        Ok(())
    }

    fn filter_by_category(&mut self) -> io::Result<()> {
        let category = self.read_line("Enter the category to filter by: ")?;
        let tasks = self.store.filter_by_category(&category);
        if tasks.is_empty() {
            return writeln!(self.out, "No tasks found in this category.");
        }
        writeln!(self.out, "Tasks in category \"{}\":", category)?;
        render::task_table(&mut self.out, tasks)
    }

    fn sort_tasks(&mut self, key: SortKey, label: &str) -> io::Result<()> {
        let result = self.store.sort_by(key);
        self.report(result, |_| format!("Tasks sorted by {}:", label))?;
        render::task_table(&mut self.out, self.store.tasks())
    }

    // ------------------------------------------------------------------
    // Goal actions
    // ------------------------------------------------------------------

    fn add_goal(&mut self) -> io::Result<()> {
        let name = self.read_required("Enter Goal Name: ", "Name cannot be empty.", |s| {
            Some(s.to_string())
        })?;
        let result = self.store.add_goal(name);
        self.report(result, |goal| {
            format!("Goal \"{}\" has been added successfully!", goal.name)
        })
    }

    fn add_task_to_goal(&mut self) -> io::Result<()> {
        render::goal_names(&mut self.out, self.store.goals())?;
        let goal_name = self.read_line("Enter the name of the goal to add a task to: ")?;
        let goal_id = match self.store.resolve_goal(&goal_name) {
            Ok(id) => id,
            Err(e) => return writeln!(self.out, "{}", e),
        };

        render::task_names(&mut self.out, self.store.tasks())?;
        let task_name = self.read_line("Enter the name of the task to add to this goal: ")?;
        let task_id = match self.store.resolve_task(&task_name) {
            Ok(id) => id,
            Err(e) => return writeln!(self.out, "{}", e),
        };

        let result = self.store.add_task_to_goal_by_id(goal_id, task_id);
        self.report(result, |goal| {
            format!(
                "Task \"{}\" has been added to goal \"{}\".",
                task_name, goal.name
            )
        })
    }

    fn mark_goal_complete(&mut self) -> io::Result<()> {
        render::goal_names(&mut self.out, self.store.goals())?;
        let name = self.read_line("Enter the name of the goal to mark as complete: ")?;
        let result = self.store.mark_goal_complete(&name);
        self.report(result, |goal| {
            format!("Goal \"{}\" has been marked as complete!", goal.name)
        })
    }

    fn remove_goal(&mut self) -> io::Result<()> {
        render::goal_names(&mut self.out, self.store.goals())?;
        let name = self.read_line("Enter the name of the goal to remove: ")?;
        let result = self.store.remove_goal(&name);
        self.report(result, |goal| {
            format!("Goal \"{}\" has been removed successfully!", goal.name)
        })
    }

    // ------------------------------------------------------------------
    // Input helpers
    // ------------------------------------------------------------------

    /// Prints a store result. Storage failures are shown and the menu
    /// carries on; the change is still held in memory.
    fn report<T>(
        &mut self,
        result: Result<T, StoreError>,
        on_ok: impl FnOnce(T) -> String,
    ) -> io::Result<()> {
        match result {
            Ok(value) => writeln!(self.out, "{}", on_ok(value)),
            Err(e) if e.is_not_found() => writeln!(self.out, "{}", e),
            Err(e) => {
                tracing::error!("{}", e);
                writeln!(self.out, "Error saving data: {}", e)
            }
        }
    }

    /// Reads one trimmed line. EOF is reported as `UnexpectedEof`.
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    fn read_choice(&mut self, prompt: &str) -> io::Result<u32> {
        loop {
            match self.read_line(prompt)?.parse() {
                Ok(n) => return Ok(n),
                Err(_) => writeln!(self.out, "Invalid input. Please enter a number.")?,
            }
        }
    }

    /// Blank input yields `None`; anything else must parse.
    fn read_optional<T>(
        &mut self,
        prompt: &str,
        invalid: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> io::Result<Option<T>> {
        loop {
            let line = self.read_line(prompt)?;
            if line.is_empty() {
                return Ok(None);
            }
            match parse(&line) {
                Some(value) => return Ok(Some(value)),
                None => writeln!(self.out, "{}", invalid)?,
            }
        }
    }

    fn read_required<T>(
        &mut self,
        prompt: &str,
        invalid: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> io::Result<T> {
        loop {
            if let Some(value) = self.read_optional(prompt, invalid, &parse)? {
                return Ok(value);
            }
            writeln!(self.out, "{}", invalid)?;
        }
    }
}

fn parse_priority(s: &str) -> Option<Priority> {
    s.parse().ok()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    parse_deadline(s).ok()
}
