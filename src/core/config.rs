use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the parking service, e.g. `https://host/apiparkeo`
    pub base_url: String,
    /// Id of the singleton configuration record
    #[serde(default = "default_config_id")]
    pub config_id: u32,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_occupancy_interval_ms")]
    pub occupancy_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Username granted root capabilities after login
    #[serde(default = "default_root_username")]
    pub root_username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_console")]
    pub console: bool,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            occupancy_interval_ms: default_occupancy_interval_ms(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            root_username: default_root_username(),
        }
    }
}

// Default value functions
fn default_num_threads() -> usize {
    num_cpus::get()
}

fn default_config_id() -> u32 {
    1
}

fn default_request_timeout() -> u64 {
    30
}

fn default_occupancy_interval_ms() -> u64 {
    5000
}

fn default_root_username() -> String {
    "adminRoot".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_console() -> bool {
    false
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    pub fn occupancy_interval(&self) -> Duration {
        Duration::from_millis(self.polling.occupancy_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.request_timeout)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("Server port must be greater than 0");
        }

        if self.server.num_threads == 0 {
            bail!("num_threads must be greater than 0");
        }

        if self.backend.base_url.trim().is_empty() {
            bail!("base_url must not be empty");
        }

        if !self.backend.base_url.starts_with("http://")
            && !self.backend.base_url.starts_with("https://")
        {
            bail!(
                "base_url '{}' must start with http:// or https://",
                self.backend.base_url
            );
        }

        if self.backend.request_timeout == 0 {
            bail!("request_timeout must be greater than 0");
        }

        if self.polling.occupancy_interval_ms == 0 {
            bail!("occupancy_interval_ms must be greater than 0");
        }

        if self.admin.root_username.is_empty() {
            bail!("root_username must not be empty");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            );
        }

        let valid_formats = ["json", "console"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: json, console",
                self.logging.format
            );
        }

        Ok(())
    }
}
