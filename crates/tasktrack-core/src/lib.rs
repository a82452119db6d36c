pub mod codec;
pub mod config;
pub mod goal;
pub mod priority;
pub mod storage;
pub mod store;
pub mod task;

pub use codec::{DecodedGoal, FormatError};
pub use config::{Config, ConfigError, LogConfig, StorageConfig};
pub use goal::{Goal, GoalId};
pub use priority::{ParsePriorityError, Priority};
pub use storage::{FileStorage, Snapshot, Storage, StorageError};
pub use store::{SortKey, Stats, StoreError, TaskStore};
pub use task::{parse_deadline, NewTask, Task, TaskEdit, TaskId, DEADLINE_FORMAT};
