#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for bankers
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/bankers/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

use bankers_errors::{ConfigError, Error};
use bankers_types::{ColorChoice, OutputFormat, RoundPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub safety: SafetyConfig,

    #[serde(default)]
    pub player: PlayerConfig,

    #[serde(default)]
    pub paths: PathConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    #[serde(default = "default_color_choice")]
    pub color: ColorChoice,
}

/// Safety engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyConfig {
    #[serde(default)]
    pub round_policy: RoundPolicy,
}

/// Step-by-step playback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,
    /// When false, playback renders every step without pausing
    #[serde(default = "default_animate")]
    pub animate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    pub datasets_file: Option<PathBuf>,
    pub logs_dir: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color_choice(),
        }
    }
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            round_policy: RoundPolicy::OnePerRound,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: default_step_delay_ms(),
            animate: default_animate(),
        }
    }
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Tty
}

fn default_color_choice() -> ColorChoice {
    ColorChoice::Auto
}

fn default_step_delay_ms() -> u64 {
    1000
}

fn default_animate() -> bool {
    true
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("bankers").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if fs::try_exists(&config_path).await.unwrap_or(false) {
            Self::load_from_file(&config_path).await
        } else {
            debug!(path = %config_path.display(), "no configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        if let Ok(output) = std::env::var("BANKERS_OUTPUT") {
            self.general.default_output = match output.as_str() {
                "plain" => OutputFormat::Plain,
                "tty" => OutputFormat::Tty,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "BANKERS_OUTPUT".to_string(),
                        value: output,
                    }
                    .into())
                }
            };
        }

        if let Ok(color) = std::env::var("BANKERS_COLOR") {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "BANKERS_COLOR".to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        if let Ok(policy) = std::env::var("BANKERS_ROUND_POLICY") {
            self.safety.round_policy = policy.parse().map_err(|_| ConfigError::InvalidValue {
                field: "BANKERS_ROUND_POLICY".to_string(),
                value: policy,
            })?;
        }

        if let Ok(delay) = std::env::var("BANKERS_STEP_DELAY_MS") {
            self.player.step_delay_ms = delay.parse().map_err(|_| ConfigError::InvalidValue {
                field: "BANKERS_STEP_DELAY_MS".to_string(),
                value: delay,
            })?;
        }

        if let Ok(datasets) = std::env::var("BANKERS_DATASETS") {
            if datasets.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "BANKERS_DATASETS".to_string(),
                    value: datasets,
                }
                .into());
            }
            self.paths.datasets_file = Some(PathBuf::from(datasets));
        }

        Ok(())
    }

    /// Path of the named-dataset file (with default)
    #[must_use]
    pub fn datasets_path(&self) -> PathBuf {
        self.paths
            .datasets_file
            .clone()
            .unwrap_or_else(|| data_dir().join("banker_data.json"))
    }

    /// Directory for debug log files (with default)
    #[must_use]
    pub fn logs_dir(&self) -> PathBuf {
        self.paths
            .logs_dir
            .clone()
            .unwrap_or_else(|| data_dir().join("logs"))
    }
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir().map_or_else(|| PathBuf::from(".bankers"), |dir| dir.join("bankers"))
}
