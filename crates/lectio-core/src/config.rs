//! TOML-based application configuration.
//!
//! Stored at `~/.config/lectio[-dev]/config.toml`; set `LECTIO_ENV=dev`
//! to use the development data directory. The day-boundary offset here
//! is the single time-zone policy the whole engine uses (unlocks and
//! streaks alike).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::clock::DayBoundary;
use crate::error::ConfigError;

/// Returns `~/.config/lectio[-dev]/` based on LECTIO_ENV.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("LECTIO_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("lectio-dev")
    } else {
        base_dir.join("lectio")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

/// Day-boundary configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TimeConfig {
    /// Fixed offset from UTC, in minutes, applied before taking a
    /// timestamp's calendar date. 0 means midnight-UTC boundaries.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

/// Local-user configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    /// User id the CLI acts as when `--user` is not given.
    #[serde(default = "default_user")]
    pub default_user: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            default_user: default_user(),
        }
    }
}

fn default_user() -> String {
    "local".to_string()
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/lectio/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub time: TimeConfig,
    #[serde(default)]
    pub user: UserConfig,
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file
    /// does not exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path,
            message: e.to_string(),
        })
    }

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

    /// The day-boundary policy this configuration selects.
    pub fn day_boundary(&self) -> DayBoundary {
        DayBoundary::with_offset_minutes(self.time.utc_offset_minutes)
    }

    /// Read a value by dotted key.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        match key {
            "time.utc_offset_minutes" => Ok(self.time.utc_offset_minutes.to_string()),
            "user.default_user" => Ok(self.user.default_user.clone()),
            other => Err(ConfigError::UnknownKey(other.to_string())),
        }
    }

    /// Set a value by dotted key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "time.utc_offset_minutes" => {
                self.time.utc_offset_minutes =
                    value.parse().map_err(|_| ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: format!("'{value}' is not a number of minutes"),
                    })?;
            }
            "user.default_user" => {
                if value.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: "user id cannot be empty".to_string(),
                    });
                }
                self.user.default_user = value.to_string();
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_utc_and_local_user() {
        let config = Config::default();
        assert_eq!(config.time.utc_offset_minutes, 0);
        assert_eq!(config.user.default_user, "local");
        assert_eq!(config.day_boundary(), DayBoundary::utc());
    }

    #[test]
    fn get_set_round_trip() {
        let mut config = Config::default();
        config.set("time.utc_offset_minutes", "-180").unwrap();
        assert_eq!(config.get("time.utc_offset_minutes").unwrap(), "-180");
        config.set("user.default_user", "ana").unwrap();
        assert_eq!(config.get("user.default_user").unwrap(), "ana");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("ui.dark_mode", "true"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            config.get("nope"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn invalid_offset_is_rejected() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("time.utc_offset_minutes", "abc"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn toml_round_trip() {
        let mut config = Config::default();
        config.time.utc_offset_minutes = 120;
        config.user.default_user = "bruno".to_string();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.time.utc_offset_minutes, 120);
        assert_eq!(back.user.default_user, "bruno");
    }
}
