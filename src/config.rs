//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::auth::AuthMode;
use crate::render::ChartOptions;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Biofeedback API connection
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Entry form gate
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub mode: AuthMode,

    /// Literal for `password` mode; empty disables the form
    #[serde(default)]
    pub password: String,

    /// Account name for `token` mode
    #[serde(default)]
    pub username: String,
}

/// Chart rendering
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_y_min")]
    pub y_min: f64,

    #[serde(default = "default_y_max")]
    pub y_max: f64,

    /// Terminal columns for sparklines and bars
    #[serde(default = "default_chart_width")]
    pub chart_width: usize,
}

fn default_y_min() -> f64 {
    0.0
}

fn default_y_max() -> f64 {
    5.0
}

fn default_chart_width() -> usize {
    40
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            y_min: default_y_min(),
            y_max: default_y_max(),
            chart_width: default_chart_width(),
        }
    }
}

impl DisplayConfig {
    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            y_min: self.y_min,
            y_max: self.y_max,
            width: self.chart_width,
        }
    }
}

/// Transcript ingest and sample generation
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Metric labels as they appear in transcripts ("Sleep Quality")
    #[serde(default = "default_metric_labels")]
    pub metrics: Vec<String>,

    /// Leading characters of the transcript kept as the summary
    #[serde(default = "default_summary_chars")]
    pub summary_chars: usize,
}

/// Labels the backend stores as columns
pub fn default_metric_labels() -> Vec<String> {
    [
        "Mood",
        "Gym Performance",
        "Soreness",
        "Sleep Quality",
        "Energy Levels",
        "Sex Drive",
        "Hunger Levels",
        "Cravings",
        "Digestion",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_summary_chars() -> usize {
    500
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            metrics: default_metric_labels(),
            summary_chars: default_summary_chars(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment.
    ///
    /// The first config file found must load; a broken file is an error
    /// rather than a silent fall back to defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_first(&Self::search_paths())
    }

    fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|p| p.exists()) {
            Some(path) => {
                let config = Self::load_with_env(path)?;
                tracing::info!(path = %path.display(), "Loaded config");
                Ok(config)
            }
            None => {
                tracing::debug!("Using default config with environment overrides");
                Ok(Self::from_env())
            }
        }
    }

    /// Where `load_default` looks, in order
    pub fn search_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("biofeedback").join("config.toml")),
            Some(PathBuf::from("./biofeedback.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("BIOFEEDBACK_API_URL") {
            self.api.base_url = url;
        }

        if let Some(mode) = var("BIOFEEDBACK_AUTH_MODE") {
            match mode.parse() {
                Ok(m) => self.auth.mode = m,
                Err(e) => tracing::warn!("Ignoring BIOFEEDBACK_AUTH_MODE: {}", e),
            }
        }
        if let Some(password) = var("BIOFEEDBACK_PASSWORD") {
            self.auth.password = password;
        }
        if let Some(username) = var("BIOFEEDBACK_USERNAME") {
            self.auth.username = username;
        }

        if let Some(level) = var("BIOFEEDBACK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("BIOFEEDBACK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Biofeedback Tracker Configuration
#
# Environment variables override these settings:
# - BIOFEEDBACK_API_URL
# - BIOFEEDBACK_AUTH_MODE
# - BIOFEEDBACK_PASSWORD
# - BIOFEEDBACK_USERNAME
# - BIOFEEDBACK_LOG_LEVEL
# - BIOFEEDBACK_LOG_FORMAT

[api]
# Biofeedback API base URL
base_url = "http://localhost:8000"

# Request timeout in seconds
request_timeout_secs = 30

[auth]
# Gate in front of submissions: password (compare locally) or token (POST /token)
mode = "password"

# Password for the entry form. Leave empty to keep the form locked.
password = ""

# Account name for token mode
username = ""

[display]
# Value axis
y_min = 0.0
y_max = 5.0

# Terminal columns for sparklines and bars
chart_width = 40

[ingest]
# Labels read from "Label: N" transcript lines
metrics = [
    "Mood",
    "Gym Performance",
    "Soreness",
    "Sleep Quality",
    "Energy Levels",
    "Sex Drive",
    "Hunger Levels",
    "Cravings",
    "Digestion",
]

# Characters of the transcript kept as the entry summary
summary_chars = 500

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
