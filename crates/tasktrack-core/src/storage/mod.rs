mod error;
mod file;

pub use error::StorageError;
pub use file::FileStorage;

use crate::goal::Goal;
use crate::task::Task;

/// Everything a storage backend hands back on load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub goals: Vec<Goal>,
}

/// Trait for task storage backends.
///
/// Backends persist the whole state at once: `save` replaces whatever was
/// stored before.
pub trait Storage {
    /// Loads all tasks and goals. An empty store is not an error.
    fn load(&self) -> Result<Snapshot, StorageError>;

    /// Replaces the stored state with `tasks` then `goals`, in order.
    fn save(&self, tasks: &[Task], goals: &[Goal]) -> Result<(), StorageError>;
}
