use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tasktrack_core::{parse_deadline, Priority, SortKey};

#[derive(Parser)]
#[command(name = "tasktrack")]
#[command(about = "Personal task and goal tracker", long_about = None)]
pub struct Cli {
    /// Data file to use instead of the configured one
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// Config file to load instead of searching the default locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Runs the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommand),
    /// Manage goals
    #[command(subcommand)]
    Goal(GoalCommand),
    /// Show task and goal counts
    Stats,
    /// Start the interactive menu
    Menu,
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Add a task
    Add {
        #[arg(long, value_parser = non_empty_name)]
        name: String,
        #[arg(long)]
        category: String,
        /// Deadline as YYYY-MM-DD
        #[arg(long, value_parser = parse_deadline)]
        deadline: NaiveDate,
        /// High, Medium or Low
        #[arg(long)]
        priority: Priority,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List all tasks
    List {
        #[arg(long)]
        json: bool,
    },
    /// Mark a task as complete
    Done { name: String },
    /// Remove a task
    Remove { name: String },
    /// Change some fields of a task; omitted fields keep their value
    Edit {
        /// Current name of the task
        name: String,
        #[arg(long)]
        new_name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_parser = parse_deadline)]
        deadline: Option<NaiveDate>,
        #[arg(long)]
        priority: Option<Priority>,
    },
    /// Show tasks with the given name
    Search { name: String },
    /// List tasks in a category
    Filter {
        category: String,
        #[arg(long)]
        json: bool,
    },
    /// Reorder the task list
    Sort {
        #[arg(value_enum)]
        key: SortField,
    },
}

#[derive(Subcommand)]
pub enum GoalCommand {
    /// Add a goal
    Add {
        #[arg(value_parser = non_empty_name)]
        name: String,
    },
    /// List goals with their tasks
    List {
        #[arg(long)]
        json: bool,
    },
    /// Attach an existing task to a goal
    Link { goal: String, task: String },
    /// Mark a goal as complete
    Done { name: String },
    /// Remove a goal; its tasks are kept
    Remove { name: String },
}

/// Names are trimmed, and a blank name is rejected as in the menu.
fn non_empty_name(s: &str) -> Result<String, String> {
    let name = s.trim();
    if name.is_empty() {
        return Err("name cannot be empty".to_string());
    }
    Ok(name.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortField {
    Name,
    Deadline,
    Priority,
}

impl From<SortField> for SortKey {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Name => SortKey::Name,
            SortField::Deadline => SortKey::Deadline,
            SortField::Priority => SortKey::Priority,
        }
    }
}
