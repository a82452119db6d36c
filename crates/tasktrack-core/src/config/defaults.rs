//! Default values for tasktrack configuration.

// ============================================================================
// Storage Defaults
// ============================================================================

/// Directory holding the data file, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = ".tasktrack";

/// Name of the line-oriented data file.
pub const DEFAULT_DATA_FILE: &str = "taskmanager_data.txt";

// ============================================================================
// Config File Locations
// ============================================================================

/// Project-local config file name.
pub const LOCAL_CONFIG_FILE: &str = "tasktrack.toml";

/// Directory under the user config dir (`~/.config` on Linux).
pub const USER_CONFIG_DIR: &str = "tasktrack";

/// File name inside [`USER_CONFIG_DIR`].
pub const USER_CONFIG_FILE: &str = "config.toml";

// ============================================================================
// Logging Defaults
// ============================================================================

/// Default tracing filter directive.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

// ============================================================================
// Environment Variables
// ============================================================================

pub const ENV_DATA_DIR: &str = "TASKTRACK_DATA_DIR";
pub const ENV_DATA_FILE: &str = "TASKTRACK_DATA_FILE";
pub const ENV_LOG_LEVEL: &str = "TASKTRACK_LOG";
