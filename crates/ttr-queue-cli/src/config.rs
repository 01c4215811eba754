//! Configuration loading for the `ttr-queue` command.
//!
//! Sources are applied in order, later sources overriding earlier ones:
//!  1. `./config/ttr-queue.{toml,yaml,json}` (optional)
//!  2. The file given with `--config` or `TTR_QUEUE_CONFIG` (required when given)
//!  3. Environment variables prefixed `TTR_QUEUE__`, with `__` between keys,
//!     e.g. `TTR_QUEUE__QUEUE__QUEUE_NAME=jobs` sets `queue.queue_name`
//!
//! Everything except the queue name carries a serde default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use ttr_queue::{ProviderConfig, QueueConfig, QueueError, DEFAULT_TTR_SECONDS, MAX_WAIT_SECONDS};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Optional configuration file looked up relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config/ttr-queue";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "TTR_QUEUE";

const REDACTED: &str = "<redacted>";

// ============================================================================
// Configuration Types
// ============================================================================

/// CLI configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Queue to work on and how to reach it
    pub queue: QueueConfig,

    #[serde(default)]
    pub worker: WorkerSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.queue.validate()?;

        if self.worker.wait_seconds > MAX_WAIT_SECONDS {
            return Err(ConfigError::Invalid {
                key: "worker.wait_seconds".to_string(),
                message: format!(
                    "must be 0-{} seconds, got {}",
                    MAX_WAIT_SECONDS, self.worker.wait_seconds
                ),
            });
        }

        Ok(())
    }

    /// Copy of the configuration safe to print
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if let ProviderConfig::AwsSqs(aws) = &mut config.queue.provider {
            for secret in [&mut aws.secret_access_key, &mut aws.session_token] {
                if secret.is_some() {
                    *secret = Some(REDACTED.to_string());
                }
            }
        }
        config
    }
}

/// Defaults for worker and producer commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSettings {
    /// Long-poll wait per receive when `--timeout` is not given
    #[serde(default = "default_wait_seconds")]
    pub wait_seconds: u32,

    /// TTR for pushed jobs when `--ttr` is not given
    #[serde(default = "default_ttr_seconds")]
    pub default_ttr_seconds: u32,
}

fn default_wait_seconds() -> u32 {
    MAX_WAIT_SECONDS
}

fn default_ttr_seconds() -> u32 {
    DEFAULT_TTR_SECONDS
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            wait_seconds: default_wait_seconds(),
            default_ttr_seconds: default_ttr_seconds(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    #[default]
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "json")]
    Json,
}

/// Output format for `config --show`
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

// ============================================================================
// Errors
// ============================================================================

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] config::ConfigError),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },

    #[error("Queue configuration error: {0}")]
    Queue(#[from] QueueError),

    #[error("Failed to render configuration: {message}")]
    Render { message: String },
}

// ============================================================================
// Loading
// ============================================================================

/// Load and validate configuration from files and the process environment
pub fn load_configuration(config_path: Option<&Path>) -> Result<CliConfig, ConfigError> {
    load_configuration_with_env(
        config_path,
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    )
}

fn load_configuration_with_env(
    config_path: Option<&Path>,
    environment: config::Environment,
) -> Result<CliConfig, ConfigError> {
    let mut builder = config::Config::builder()
        .add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false));

    if let Some(path) = config_path {
        if !path.is_file() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let config: CliConfig = builder
        .add_source(environment)
        .build()?
        .try_deserialize()?;

    config.validate()?;
    Ok(config)
}

/// Render the configuration, with secrets redacted
pub fn render_configuration(config: &CliConfig, format: ConfigFormat) -> Result<String, ConfigError> {
    let config = config.redacted();
    let rendered = match format {
        ConfigFormat::Yaml => serde_yaml::to_string(&config).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::to_string_pretty(&config).map_err(|e| e.to_string()),
        ConfigFormat::Toml => toml::to_string_pretty(&config).map_err(|e| e.to_string()),
    };
    rendered.map_err(|message| ConfigError::Render { message })
}
