use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::errors::Error;

/// Engine configuration, persisted as TOML under the data directory.
///
/// Everything has a sensible default so embedders can run without a config
/// file at all; `load()` never fails on a missing file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Minimum size in MB for the large-file analyzer
    #[serde(default = "default_large_file_mb")]
    pub large_file_threshold_mb: u64,

    /// Days without use before an application counts as idle
    #[serde(default = "default_idle_app_days")]
    pub idle_app_days: u32,

    /// Days without modification before a build artifact counts as stale
    #[serde(default = "default_artifact_stale_days")]
    pub artifact_stale_days: u32,

    /// Home-relative roots the build-artifact analyzer walks
    #[serde(default = "default_project_roots")]
    pub project_roots: Vec<String>,
}

fn default_large_file_mb() -> u64 {
    100
}
fn default_idle_app_days() -> u32 {
    90
}
fn default_artifact_stale_days() -> u32 {
    30
}
fn default_project_roots() -> Vec<String> {
    vec!["Developer".into(), "Projects".into(), "Code".into()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            large_file_threshold_mb: default_large_file_mb(),
            idle_app_days: default_idle_app_days(),
            artifact_stale_days: default_artifact_stale_days(),
            project_roots: default_project_roots(),
        }
    }
}

impl Config {
    /// The declutter data directory (~/.declutter)
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".declutter")
    }

    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    pub fn whitelist_path() -> PathBuf {
        Self::data_dir().join("whitelist.json")
    }

    pub fn history_path() -> PathBuf {
        Self::data_dir().join("history.json")
    }

    /// Load config from disk, falling back to defaults when absent
    pub fn load() -> Result<Self, Error> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self, Error> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        toml::from_str(&contents).map_err(|e| Error::store(path, e))
    }

    pub fn save(&self) -> Result<(), Error> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), Error> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }
        let contents = toml::to_string_pretty(self).map_err(|e| Error::store(path, e))?;
        std::fs::write(path, contents).map_err(|e| Error::io(path, e))
    }

    pub fn large_file_threshold_bytes(&self) -> u64 {
        self.large_file_threshold_mb * 1024 * 1024
    }
}
