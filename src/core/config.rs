//! Configuration management with layered hierarchy

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::core::Project;

/// Status given to new donations when neither the caller nor config names one
pub const DEFAULT_STATUS: &str = "pending";

/// Ledger configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database file; relative paths resolve against the project root
    pub database: Option<PathBuf>,

    /// Log filter directive
    pub log: Option<String>,

    /// Status for new donations
    pub default_status: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order.
    /// Unusable files are logged and skipped.
    pub fn load(project: Option<&Project>) -> Self {
        let (config, skipped) = Self::load_collecting(project);
        skipped.iter().for_each(SkippedConfig::report);
        config
    }

    /// Like [`Config::load`], but hands skipped files back to the caller
    /// instead of logging them. Used before the subscriber is installed.
    pub fn load_collecting(project: Option<&Project>) -> (Self, Vec<SkippedConfig>) {
        let mut config = Config::default();
        let mut skipped = Vec::new();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/relief/config.yaml)
        // 3. Project config (.relief/config.yaml)
        let files = Self::global_config_path()
            .into_iter()
            .chain(project.map(Project::config_path));
        for path in files {
            match Self::read_file(&path) {
                Ok(Some(layer)) => config.merge(layer),
                Ok(None) => {}
                Err(problem) => skipped.push(problem),
            }
        }

        // 4. Environment variables
        config.merge(Self::from_env());

        (config, skipped)
    }

    /// Parse a config file; a missing file is `Ok(None)`
    pub fn read_file(path: &Path) -> Result<Option<Self>, SkippedConfig> {
        if !path.exists() {
            return Ok(None);
        }
        let skipped = |reason: String| SkippedConfig {
            path: path.to_path_buf(),
            reason,
        };
        let contents = std::fs::read_to_string(path).map_err(|e| skipped(e.to_string()))?;
        let blank = contents
            .lines()
            .all(|l| l.trim().is_empty() || l.trim_start().starts_with('#'));
        if blank {
            return Ok(Some(Config::default()));
        }
        serde_yml::from_str::<Config>(&contents)
            .map(Some)
            .map_err(|e| skipped(e.to_string()))
    }

    fn from_env() -> Self {
        Config {
            database: std::env::var_os("RELIEF_DB").map(PathBuf::from),
            log: std::env::var("RELIEF_LOG").ok(),
            default_status: std::env::var("RELIEF_DEFAULT_STATUS").ok(),
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "relief")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.database.is_some() {
            self.database = other.database;
        }
        if other.log.is_some() {
            self.log = other.log;
        }
        if other.default_status.is_some() {
            self.default_status = other.default_status;
        }
    }

    /// Status for a new donation
    pub fn default_status(&self) -> &str {
        self.default_status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_STATUS)
    }

    /// Database file for `project`
    pub fn database_path(&self, project: &Project) -> PathBuf {
        match &self.database {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => project.root().join(path),
            None => project.database_path(),
        }
    }
}

/// A config file that exists but could not be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ignoring config {}: {reason}", path.display())]
pub struct SkippedConfig {
    pub path: PathBuf,
    pub reason: String,
}

impl SkippedConfig {
    pub fn report(&self) {
        warn!(path = %self.path.display(), reason = %self.reason, "ignoring malformed config");
    }
}
