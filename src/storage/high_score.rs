//! High-score record on disk
//!
//! A single small JSON file, read once when a session is created and written
//! whenever a finished game beats the record. Every failure here is
//! survivable: the session falls back to an in-memory score of zero.

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// On-disk shape of the save file
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct SaveData {
    high_score: u32,
}

/// Where the high score lives; a disabled store keeps it in memory only
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: Option<PathBuf>,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A store that never touches the filesystem
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Read the saved high score; a missing file means no record yet
    pub fn load(&self) -> Result<u32> {
        let path = match &self.path {
            Some(path) => path,
            None => return Ok(0),
        };
        if !path.exists() {
            return Ok(0);
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read save file {}", path.display()))?;
        let data: SaveData = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse save file {}", path.display()))?;

        Ok(data.high_score)
    }

    /// Write the high score, creating parent directories if needed
    pub fn save(&self, high_score: u32) -> Result<()> {
        let path = match &self.path {
            Some(path) => path,
            None => return Ok(()),
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            }
        }

        let json = serde_json::to_string_pretty(&SaveData { high_score })
            .context("Failed to serialize save data")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write save file {}", path.display()))?;

        debug!("saved high score {high_score}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = HighScoreStore::new(dir.path().join("save.json"));

        store.save(120).unwrap();
        assert_eq!(store.load().unwrap(), 120);

        store.save(250).unwrap();
        assert_eq!(store.load().unwrap(), 250);
    }

    #[test]
    fn test_missing_file_loads_zero() {
        let dir = TempDir::new().unwrap();
        let store = HighScoreStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("save.json");
        fs::write(&path, "not json").unwrap();

        let store = HighScoreStore::new(path);
        assert!(store.load().is_err());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = HighScoreStore::new(dir.path().join("nested/dir/save.json"));

        store.save(42).unwrap();
        assert_eq!(store.load().unwrap(), 42);
    }

    #[test]
    fn test_disabled_store_is_inert() {
        let store = HighScoreStore::disabled();
        assert_eq!(store.load().unwrap(), 0);
        assert!(store.save(99).is_ok());
    }
}
