use std::path::PathBuf;

use tasktrack_core::config::{DEFAULT_DATA_DIR, DEFAULT_DATA_FILE, DEFAULT_LOG_LEVEL};
use tasktrack_core::Config;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.storage.data_dir, DEFAULT_DATA_DIR);
    assert_eq!(config.storage.data_file, DEFAULT_DATA_FILE);
    assert_eq!(config.log.level, DEFAULT_LOG_LEVEL);
}

#[test]
fn test_config_from_toml() {
    let toml_str = r#"
[storage]
data_dir = "/var/lib/tasktrack"

[log]
level = "debug"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.storage.data_dir, "/var/lib/tasktrack");
    assert_eq!(config.storage.data_file, DEFAULT_DATA_FILE);
    assert_eq!(config.log.level, "debug");
    assert_eq!(
        config.storage.data_path(),
        PathBuf::from("/var/lib/tasktrack").join(DEFAULT_DATA_FILE)
    );
}

#[test]
fn test_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tasktrack.toml");
    std::fs::write(&path, "[storage]\ndata_file = \"mine.txt\"\n").unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.storage.data_file, "mine.txt");
}

#[test]
fn test_from_file_rejects_bad_input() {
    let temp_dir = TempDir::new().unwrap();

    let broken = temp_dir.path().join("broken.toml");
    std::fs::write(&broken, "[storage\n").unwrap();
    assert!(Config::from_file(&broken).is_err());

    let empty_name = temp_dir.path().join("empty.toml");
    std::fs::write(&empty_name, "[storage]\ndata_file = \"\"\n").unwrap();
    assert!(Config::from_file(&empty_name).is_err());

    assert!(Config::from_file(temp_dir.path().join("missing.toml")).is_err());
}
