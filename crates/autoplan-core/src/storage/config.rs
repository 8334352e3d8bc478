//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Working hours and scheduling days used by the planner
//! - The minimum split size for segmented items
//! - Quick-add defaults
//!
//! Configuration is stored at `<data dir>/config.toml`.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};
use crate::planner::{PlannerConfig, WorkHoursConfig, DEFAULT_MIN_SPLIT_MINUTES};

/// Planning configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// HH:MM
    #[serde(default = "default_work_start")]
    pub work_start: String,
    /// HH:MM
    #[serde(default = "default_work_end")]
    pub work_end: String,
    #[serde(default = "default_scheduling_days")]
    pub scheduling_days: Vec<String>,
    #[serde(default = "default_min_split_minutes")]
    pub min_split_minutes: u32,
}

/// Quick-add configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    #[serde(default = "default_effort_minutes")]
    pub default_effort_minutes: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data dir>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub planning: PlanningConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
}

// Default functions
fn default_work_start() -> String {
    "09:00".into()
}
fn default_work_end() -> String {
    "17:00".into()
}
fn default_scheduling_days() -> Vec<String> {
    ["mon", "tue", "wed", "thu", "fri"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_min_split_minutes() -> u32 {
    DEFAULT_MIN_SPLIT_MINUTES
}
fn default_effort_minutes() -> u32 {
    30
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            work_start: default_work_start(),
            work_end: default_work_end(),
            scheduling_days: default_scheduling_days(),
            min_split_minutes: default_min_split_minutes(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            default_effort_minutes: default_effort_minutes(),
        }
    }
}

fn parse_time(key: &str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|e| ConfigError::InvalidValue {
        key: key.into(),
        message: format!("expected HH:MM, got '{value}' ({e})"),
    })
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    // Lists accept JSON or a comma-separated string.
                    serde_json::Value::Array(_) => match serde_json::from_str(value) {
                        Ok(v @ serde_json::Value::Array(_)) => v,
                        _ => serde_json::Value::Array(
                            value
                                .split(',')
                                .map(str::trim)
                                .filter(|s| !s.is_empty())
                                .map(|s| serde_json::Value::String(s.to_string()))
                                .collect(),
                        ),
                    },
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                CoreError::from(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Every settable key with its current value, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (key, child) in map {
                        let path = if prefix.is_empty() {
                            key.clone()
                        } else {
                            format!("{prefix}.{key}")
                        };
                        walk(&path, child, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out.sort();
        out
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not validate.
    /// `self` is left unchanged on error.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let candidate: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        candidate.work_hours()?;
        *self = candidate;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Working hours for the planner.
    ///
    /// End before start is passed through; the planner treats it as a day
    /// without work.
    pub fn work_hours(&self) -> Result<WorkHoursConfig, ConfigError> {
        let start = parse_time("planning.work_start", &self.planning.work_start)?;
        let end = parse_time("planning.work_end", &self.planning.work_end)?;

        let days = self
            .planning
            .scheduling_days
            .iter()
            .map(|d| {
                d.parse::<Weekday>().map_err(|_| ConfigError::InvalidValue {
                    key: "planning.scheduling_days".into(),
                    message: format!("unknown weekday '{d}'"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WorkHoursConfig::new(start, end, days))
    }

    pub fn planner(&self) -> PlannerConfig {
        PlannerConfig {
            min_split_minutes: self.planning.min_split_minutes,
        }
    }
}
