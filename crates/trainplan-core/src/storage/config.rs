//! TOML-based application configuration.
//!
//! Stores the plan document location and cache tuning:
//! - `[plan] path` -- the training-plan markdown document
//! - `[cache] path` -- optional cache file override
//! - `[cache] max_age_days` -- staleness threshold
//!
//! Configuration is stored at `~/.config/trainplan/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::cache::DEFAULT_MAX_AGE_DAYS;
use crate::error::ConfigError;

/// Plan source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    #[serde(default = "default_plan_path")]
    pub path: PathBuf,
}

/// Cache tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache file override. Defaults to `metadata.json` under the data dir.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_max_age_days")]
    pub max_age_days: i64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/trainplan/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub plan: PlanConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

// Default functions
fn default_plan_path() -> PathBuf {
    PathBuf::from("training-plan.md")
}
fn default_max_age_days() -> i64 {
    DEFAULT_MAX_AGE_DAYS
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            path: default_plan_path(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_age_days: DEFAULT_MAX_AGE_DAYS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plan: PlanConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    /// Location of the config file itself.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Resolved cache file location.
    pub fn cache_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.cache.path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("metadata.json")),
        }
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "plan.path" => Some(self.plan.path.display().to_string()),
            "cache.path" => self.cache.path.as_ref().map(|p| p.display().to_string()),
            "cache.max_age_days" => Some(self.cache.max_age_days.to_string()),
            _ => None,
        }
    }

    /// Set a config value by key and persist. Unknown keys are rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "plan.path" => self.plan.path = PathBuf::from(value),
            "cache.path" => self.cache.path = Some(PathBuf::from(value)),
            "cache.max_age_days" => {
                self.cache.max_age_days = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("expected a whole number of days, got {value:?}"),
                })?;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        self.save()
    }
}
