//! Configuration module
//!
//! Reads a TOML file (default `~/.config/courseflow/config.toml`) and falls
//! back to defaults when it is missing or unreadable.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub events: EventsConfig,
    pub logging: LoggingConfig,
    pub seed: SeedConfig,
}

/// Sizing of the asynchronous event bus
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Number of long-lived worker tasks draining the queue
    pub workers: usize,
    /// Bounded queue capacity; a full queue blocks publishers
    pub queue_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 256,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Development data seeded at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub enabled: bool,
    pub admin_email: String,
    pub admin_password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            admin_email: "admin@courseflow.local".to_string(),
            admin_password: "admin".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("courseflow")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_keep_defaults_for_the_rest() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [events]
            workers = 2

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.events.workers, 2);
        assert_eq!(cfg.events.queue_capacity, 256);
        assert_eq!(cfg.logging.level, "debug");
        assert!(cfg.seed.enabled);
    }

    #[test]
    fn empty_input_is_all_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.events.workers, 4);
        assert_eq!(cfg.seed.admin_email, "admin@courseflow.local");
    }
}
