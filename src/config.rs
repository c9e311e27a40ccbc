//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::dataset::{DatasetSource, LoadOptions};
use crate::prepare::{FocusRegion, RegionFilter, SectorAllowList};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub regions: RegionsConfig,

    #[serde(default)]
    pub views: ViewsConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dataset source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// File read when no upload is active
    #[serde(default = "default_dataset_path")]
    pub default_path: PathBuf,

    /// Worksheet to read; the first sheet when unset
    #[serde(default)]
    pub sheet: Option<String>,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("Education Dataset (1).xlsx")
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024 // 50 MB
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            default_path: default_dataset_path(),
            sheet: None,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl DatasetConfig {
    pub fn default_source(&self) -> DatasetSource {
        DatasetSource::path(self.default_path.clone())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            sheet: self.sheet.clone(),
        }
    }
}

/// Focus regions for the regional and sector views
#[derive(Debug, Clone, Deserialize)]
pub struct RegionsConfig {
    #[serde(default = "default_focus_regions")]
    pub focus: Vec<FocusRegion>,
}

fn default_focus_regions() -> Vec<FocusRegion> {
    RegionFilter::high_growth().regions().to_vec()
}

impl Default for RegionsConfig {
    fn default() -> Self {
        Self {
            focus: default_focus_regions(),
        }
    }
}

impl RegionsConfig {
    pub fn filter(&self) -> RegionFilter {
        RegionFilter::new(self.focus.iter().cloned())
    }
}

/// View parameters
#[derive(Debug, Clone, Deserialize)]
pub struct ViewsConfig {
    /// Sectors shown in the sector comparison, in legend order
    #[serde(default = "default_sectors")]
    pub sectors: Vec<String>,
}

fn default_sectors() -> Vec<String> {
    SectorAllowList::default().sectors().to_vec()
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            sectors: default_sectors(),
        }
    }
}

impl ViewsConfig {
    pub fn sector_allow_list(&self) -> SectorAllowList {
        SectorAllowList::new(self.sectors.iter().cloned())
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
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
    "info".to_string()
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

/// Source of environment values, swappable in tests
type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
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

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("enrollview").join("config.toml")),
            Some(PathBuf::from("/etc/enrollview/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(&process_env);
    }

    fn apply_overrides(&mut self, env: EnvLookup<'_>) {
        if let Some(path) = env("ENROLLVIEW_DATASET_PATH") {
            self.dataset.default_path = PathBuf::from(path);
        }

        if let Some(host) = env("ENROLLVIEW_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = env("ENROLLVIEW_API_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!("Ignoring invalid ENROLLVIEW_API_PORT {:?}", port),
            }
        }

        if let Some(level) = env("ENROLLVIEW_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = env("ENROLLVIEW_LOG_FORMAT") {
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
    r#"# Enrollview Configuration
#
# Environment variables override these settings:
# - ENROLLVIEW_DATASET_PATH
# - ENROLLVIEW_API_HOST
# - ENROLLVIEW_API_PORT
# - ENROLLVIEW_LOG_LEVEL
# - ENROLLVIEW_LOG_FORMAT

[dataset]
# Spreadsheet read when no file has been uploaded
default_path = "Education Dataset (1).xlsx"

# Worksheet to read (defaults to the first sheet)
# sheet = "Sheet1"

# Largest accepted upload (bytes)
max_upload_bytes = 52428800

[regions]
# Regions shown in the regional trend and sector comparison views.
# `name` must match the Region column exactly; `label` is the short name.
[[regions.focus]]
name = "NCR - National Capital Region"
label = "NCR"

[[regions.focus]]
name = "Region IV-A - CALABARZON"
label = "CALABARZON"

[[regions.focus]]
name = "Region III - Central Luzon"
label = "Central Luzon"

[[regions.focus]]
name = "Region XI - Davao Region"
label = "Davao"

[[regions.focus]]
name = "Region X - Northern Mindanao"
label = "Northern Mindanao"

[views]
# Sectors compared in the sector view, in legend order
sectors = ["PUBLIC", "PRIVATE"]

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8501

# Allowed CORS origins (empty allows any)
cors_origins = []

# Request timeout in seconds
request_timeout_secs = 30

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
