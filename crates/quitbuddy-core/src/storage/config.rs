//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Breathing exercise pacing
//! - Distraction game tuning
//! - Profile defaults and display currency
//! - Reminder toggles
//!
//! Configuration is stored at `~/.config/quitbuddy/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, CoreError};
use crate::profile::DEFAULT_CIGARETTES_PER_PACK;

/// Breathing exercise pacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreathingConfig {
    #[serde(default = "default_inhale_secs")]
    pub inhale_secs: u32,
    #[serde(default = "default_hold_secs")]
    pub hold_secs: u32,
    #[serde(default = "default_exhale_secs")]
    pub exhale_secs: u32,
    /// Full inhale-hold-exhale cycles before the exercise ends.
    #[serde(default = "default_cycles")]
    pub cycles: u32,
}

/// Bubble-popping distraction game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistractionConfig {
    #[serde(default = "default_game_secs")]
    pub duration_secs: u32,
    #[serde(default = "default_spawn_interval_ms")]
    pub spawn_interval_ms: u32,
    /// Chance of a bubble appearing on each spawn tick.
    #[serde(default = "default_spawn_probability")]
    pub spawn_probability: f64,
    #[serde(default = "default_motion_interval_ms")]
    pub motion_interval_ms: u32,
    /// Upward drift per motion tick, in percent of screen height.
    #[serde(default = "default_rise_per_tick")]
    pub rise_per_tick: f64,
}

/// Profile defaults and display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_pack_size")]
    pub default_cigarettes_per_pack: u32,
    #[serde(default = "default_currency")]
    pub currency_symbol: String,
}

/// Reminder preferences. Delivery lives outside the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub daily_checkin: bool,
    #[serde(default = "default_true")]
    pub craving_reminder: bool,
    #[serde(default = "default_true")]
    pub weekly_summary: bool,
    #[serde(default = "default_true")]
    pub milestones: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/quitbuddy/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub breathing: BreathingConfig,
    #[serde(default)]
    pub distraction: DistractionConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

// Default functions
fn default_inhale_secs() -> u32 {
    4
}
fn default_hold_secs() -> u32 {
    4
}
fn default_exhale_secs() -> u32 {
    6
}
fn default_cycles() -> u32 {
    5
}
fn default_game_secs() -> u32 {
    60
}
fn default_spawn_interval_ms() -> u32 {
    1000
}
fn default_spawn_probability() -> f64 {
    0.5
}
fn default_motion_interval_ms() -> u32 {
    50
}
fn default_rise_per_tick() -> f64 {
    3.0
}
fn default_pack_size() -> u32 {
    DEFAULT_CIGARETTES_PER_PACK
}
fn default_currency() -> String {
    "$".into()
}
fn default_true() -> bool {
    true
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            inhale_secs: default_inhale_secs(),
            hold_secs: default_hold_secs(),
            exhale_secs: default_exhale_secs(),
            cycles: default_cycles(),
        }
    }
}

impl Default for DistractionConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_game_secs(),
            spawn_interval_ms: default_spawn_interval_ms(),
            spawn_probability: default_spawn_probability(),
            motion_interval_ms: default_motion_interval_ms(),
            rise_per_tick: default_rise_per_tick(),
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            default_cigarettes_per_pack: default_pack_size(),
            currency_symbol: default_currency(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            daily_checkin: true,
            craving_reminder: true,
            weekly_summary: true,
            milestones: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            breathing: BreathingConfig::default(),
            distraction: DistractionConfig::default(),
            profile: ProfileConfig::default(),
            notifications: NotificationsConfig::default(),
        }
    }
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
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location inside the data directory.
    pub fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, writing defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
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

    /// Set a config value in memory by dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// as the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }
}
