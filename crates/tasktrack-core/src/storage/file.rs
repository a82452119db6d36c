use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::codec::{decode_goal, decode_task, encode_goal, encode_task, GOAL_TAG, TASK_TAG};
use crate::config::StorageConfig;
use crate::goal::{Goal, GoalId};
use crate::task::{Task, TaskId};

use super::error::StorageError;
use super::{Snapshot, Storage};

/// Line-oriented text file storage.
///
/// ```text
/// .tasktrack/
///   taskmanager_data.txt       # one Task: or Goal: line per record
///   taskmanager_data.txt.tmp   # only present while a save is in flight
/// ```
///
/// Saves go to the `.tmp` sibling first and are renamed over the data file,
/// so an interrupted save leaves the previous contents in place.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Creates a FileStorage backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a FileStorage at the configured data path.
    pub fn with_config(config: &StorageConfig) -> Self {
        Self::new(config.data_path())
    }

    /// Returns the path of the data file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Ensures the data file's directory exists.
    fn ensure_parent_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
            }
        }
        Ok(())
    }

    fn write_atomically(&self, content: &str) -> Result<(), StorageError> {
        let tmp_path = self.temp_path();

        let written = File::create(&tmp_path).and_then(|mut file| {
            file.write_all(content.as_bytes())?;
            file.sync_all()
        });
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(StorageError::io(&tmp_path, e));
        }

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            StorageError::io(&self.path, e)
        })
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Result<Snapshot, StorageError> {
        if !self.path.exists() {
            tracing::debug!("No data file at {:?}, starting empty", self.path);
            return Ok(Snapshot::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| StorageError::io(&self.path, e))?;
        let snapshot = decode_snapshot(&content);

        tracing::info!(
            tasks = snapshot.tasks.len(),
            goals = snapshot.goals.len(),
            "Loaded data from {:?}",
            self.path
        );
        Ok(snapshot)
    }

    fn save(&self, tasks: &[Task], goals: &[Goal]) -> Result<(), StorageError> {
        self.ensure_parent_dir()?;

        let task_order: Vec<TaskId> = tasks.iter().map(|t| t.id).collect();
        let mut content = String::new();
        for task in tasks {
            content.push_str(&encode_task(task));
            content.push('\n');
        }
        for goal in goals {
            content.push_str(&encode_goal(goal, &task_order));
            content.push('\n');
        }

        self.write_atomically(&content)?;

        tracing::info!(
            tasks = tasks.len(),
            goals = goals.len(),
            "Saved data to {:?}",
            self.path
        );
        Ok(())
    }
}

/// Decodes a whole data file.
///
/// Lines that fail to decode are logged and skipped. Blank lines and lines
/// with an unknown tag are ignored. Ids are assigned from 1 in file order.
fn decode_snapshot(content: &str) -> Snapshot {
    let mut tasks = Vec::new();
    // One slot per task line, malformed ones included, so goal link
    // positions still line up when a task is skipped.
    let mut task_slots: Vec<Option<TaskId>> = Vec::new();
    let mut decoded_goals = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;

        if line.starts_with(TASK_TAG) {
            let id = TaskId(tasks.len() as u64 + 1);
            match decode_task(line, id) {
                Ok(task) => {
                    tasks.push(task);
                    task_slots.push(Some(id));
                }
                Err(e) => {
                    tracing::warn!(line = line_no, "Skipping malformed task line: {}", e);
                    task_slots.push(None);
                }
            }
        } else if line.starts_with(GOAL_TAG) {
            let id = GoalId(decoded_goals.len() as u64 + 1);
            match decode_goal(line, id) {
                Ok(decoded) => decoded_goals.push((line_no, decoded)),
                Err(e) => tracing::warn!(line = line_no, "Skipping malformed goal line: {}", e),
            }
        } else if !line.trim().is_empty() {
            tracing::warn!(line = line_no, "Skipping line with unknown record tag");
        }
    }

    let goals = decoded_goals
        .into_iter()
        .map(|(line_no, decoded)| {
            let mut goal = decoded.goal;
            for position in decoded.task_positions {
                match task_slots.get(position).copied().flatten() {
                    Some(task_id) => goal.add_task(task_id),
                    None => tracing::warn!(
                        line = line_no,
                        position,
                        "Dropping link from goal '{}' to a missing task",
                        goal.name
                    ),
                }
            }
            goal
        })
        .collect();

    Snapshot { tasks, goals }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_snapshot_skips_bad_lines() {
        let content = "\
Task:Write report,,Work,2024-05-01,High,false
Task:broken line
Task:Clean house,,Personal,2024-04-10,Low,true

Note:something else
Goal:Ship it,false,0;1;2
Goal:
";
        let snapshot = decode_snapshot(content);

        assert_eq!(snapshot.tasks.len(), 2);
        assert_eq!(snapshot.tasks[0].id, TaskId(1));
        assert_eq!(snapshot.tasks[1].id, TaskId(2));
        assert_eq!(snapshot.tasks[1].name, "Clean house");

        assert_eq!(snapshot.goals.len(), 1);
        // Position 1 is the broken task line; 2 is "Clean house".
        assert_eq!(snapshot.goals[0].task_ids, vec![TaskId(1), TaskId(2)]);
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("data.txt");
        // A non-empty directory at the data path makes the rename fail.
        fs::create_dir_all(path.join("occupied")).unwrap();
        let storage = FileStorage::new(&path);

        assert!(storage.save(&[], &[]).is_err());
        assert!(!storage.temp_path().exists());
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let storage = FileStorage::new("/data/tasks.txt");
        assert_eq!(storage.temp_path(), PathBuf::from("/data/tasks.txt.tmp"));
    }
}
