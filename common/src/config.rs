// Configuration management with layered configuration (file, env)

use crate::schedule::window::SchedulingWindow;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure containing all configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub window: SchedulingWindow,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Endpoint of the directory servlet, e.g. `http://host/api/horarios`
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    #[serde(default)]
    pub json_logs: bool,
}

impl Settings {
    /// Load configuration with layered precedence: defaults → file → env
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let defaults = Config::try_from(&Settings::default())?;

        let builder = Config::builder()
            // Start with built-in defaults
            .add_source(defaults)
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Add local configuration (not committed to git)
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), String> {
        if self.directory.base_url.is_empty() {
            return Err("Directory base_url cannot be empty".to_string());
        }
        if self.directory.timeout_seconds == 0 {
            return Err("Directory timeout_seconds must be greater than 0".to_string());
        }

        let window = &self.window;
        if window.day_start >= window.day_end {
            return Err("Window day_start must be before day_end".to_string());
        }
        if window.lunch_start >= window.lunch_end {
            return Err("Window lunch_start must be before lunch_end".to_string());
        }
        if window.lunch_start < window.day_start || window.lunch_end > window.day_end {
            return Err("Lunch break must lie inside the operating window".to_string());
        }

        if self.observability.log_level.is_empty() {
            return Err("Log level cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            directory: DirectoryConfig {
                base_url: "http://localhost:8080/sistema-horarios-web/api/horarios".to_string(),
                timeout_seconds: 30,
            },
            window: SchedulingWindow::default(),
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                json_logs: false,
            },
        }
    }
}
