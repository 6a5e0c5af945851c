use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FinanceError, Result};

pub const DB_FILE: &str = "gofinances.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
        }
    }
}

impl Settings {
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(DB_FILE)
    }
}

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn settings_path() -> PathBuf {
    home().join(".config/gofinances/settings.json")
}

fn default_data_dir() -> PathBuf {
    home().join("Documents/gofinances")
}

pub fn load_settings() -> Settings {
    read_settings(&settings_path())
}

/// Settings stored at `path`, or the defaults when the file is missing or unreadable.
pub fn read_settings(path: &Path) -> Settings {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_default()
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    write_settings(&settings_path(), settings)
}

pub fn write_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| FinanceError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

/// Database path: the explicit override if given, else the one under the configured data dir.
pub fn resolve_db_path(db_override: Option<&str>) -> PathBuf {
    match db_override {
        Some(path) => PathBuf::from(expand_home(path)),
        None => load_settings().db_path(),
    }
}

pub fn expand_home(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            data_dir: "/tmp/finances".to_string(),
        };
        write_settings(&path, &settings).unwrap();
        let loaded = read_settings(&path);
        assert_eq!(loaded.data_dir, "/tmp/finances");
        assert_eq!(loaded.db_path(), PathBuf::from("/tmp/finances").join(DB_FILE));
    }

    #[test]
    fn test_read_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let s = read_settings(&dir.path().join("missing.json"));
        assert_eq!(s.data_dir, Settings::default().data_dir);
        assert!(!s.data_dir.is_empty());
    }

    #[test]
    fn test_read_returns_defaults_when_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(read_settings(&path).data_dir, Settings::default().data_dir);
    }

    #[test]
    fn test_write_creates_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("nested").join("settings.json");
        write_settings(&path, &Settings::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_db_override_wins() {
        assert_eq!(resolve_db_path(Some("/tmp/x.db")), PathBuf::from("/tmp/x.db"));
    }
}
