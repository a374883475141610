use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DATA_DIR: &str = "data_dir";
pub const STORAGE_URL: &str = "storage.url";
pub const STORAGE_KEY: &str = "storage.key";
pub const HISTORY_LIMIT: &str = "history.limit";

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Flat string map persisted as TOML. Unknown keys are kept as-is.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    pub map: BTreeMap<String, String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join("fitgirl").join("config.toml"))
            .context("Could not determine config directory")
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = toml::to_string(self)?;
        fs::write(path, content).with_context(|| format!("Failed to save config to {}", path.display()))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match self.map.get(DATA_DIR) {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => dirs::data_dir()
                .map(|d| d.join("fitgirl"))
                .context("Could not determine data directory"),
        }
    }

    /// Environment wins over the file.
    pub fn storage_url(&self) -> Option<String> {
        std::env::var("FITGIRL_STORAGE_URL")
            .ok()
            .or_else(|| self.map.get(STORAGE_URL).cloned())
    }

    pub fn storage_key(&self) -> Option<String> {
        std::env::var("FITGIRL_STORAGE_KEY")
            .ok()
            .or_else(|| self.map.get(STORAGE_KEY).cloned())
    }

    pub fn history_limit(&self) -> usize {
        self.map
            .get(HISTORY_LIMIT)
            .and_then(|v| v.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(&dir.path().join("nope.toml")).unwrap();
        assert!(cfg.map.is_empty());
        assert_eq!(cfg.history_limit(), DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn dotted_keys_survive_a_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let mut cfg = Config::default();
        cfg.map.insert(HISTORY_LIMIT.into(), "3".into());
        cfg.map.insert(DATA_DIR.into(), "/tmp/fg".into());
        cfg.save(&path).unwrap();

        let back = Config::load(&path).unwrap();
        assert_eq!(back.history_limit(), 3);
        assert_eq!(back.data_dir().unwrap(), PathBuf::from("/tmp/fg"));
    }

    #[test]
    fn bad_history_limit_falls_back() {
        let mut cfg = Config::default();
        cfg.map.insert(HISTORY_LIMIT.into(), "zero".into());
        assert_eq!(cfg.history_limit(), DEFAULT_HISTORY_LIMIT);
        cfg.map.insert(HISTORY_LIMIT.into(), "0".into());
        assert_eq!(cfg.history_limit(), DEFAULT_HISTORY_LIMIT);
    }
}
