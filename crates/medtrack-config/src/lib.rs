//! Configuration management for medtrack
//!
//! This module handles loading, validation, and management of
//! medtrack configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigErrorCode, ConfigErrorDetails, ConfigResult};

// ==================== Configuration Types ====================

/// Backing store for the file gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the JSON document holding transactions and personnel
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./data/store.json")
}

/// Initial sort settings of the two views
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewsConfig {
    /// Transaction dashboard order
    #[serde(default)]
    pub transaction_sort: SortOrder,
    /// Personnel register order
    #[serde(default)]
    pub personnel_sort: SortMode,
}

/// Mutation pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationsConfig {
    /// What the personnel view does when a submit fails
    #[serde(default)]
    pub on_gateway_failure: GatewayFailurePolicy,
    /// Re-fetch the personnel list after a successful submit
    #[serde(default = "default_true")]
    pub refetch_after_mutation: bool,
}

impl Default for MutationsConfig {
    fn default() -> Self {
        Self {
            on_gateway_failure: GatewayFailurePolicy::default(),
            refetch_after_mutation: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Toast notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// How long a notification stays visible
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
        }
    }
}

fn default_duration_ms() -> u64 {
    3000
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Transaction sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest first
    Latest,
    /// Oldest first
    Oldest,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Latest
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latest" | "newest" => Ok(SortOrder::Latest),
            "oldest" => Ok(SortOrder::Oldest),
            _ => Err(format!("Invalid sort order: {}", s)),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Latest => write!(f, "latest"),
            SortOrder::Oldest => write!(f, "oldest"),
        }
    }
}

/// Personnel sort mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Name, A-Z
    AlphaAsc,
    /// Name, Z-A
    AlphaDesc,
    /// Hospital, A-Z
    HospitalAsc,
    /// Hospital, Z-A
    HospitalDesc,
}

impl SortMode {
    /// Menu label for the mode
    pub fn label(&self) -> &'static str {
        match self {
            SortMode::AlphaAsc => "Personnel (A-Z)",
            SortMode::AlphaDesc => "Personnel (Z-A)",
            SortMode::HospitalAsc => "Hospital (A-Z)",
            SortMode::HospitalDesc => "Hospital (Z-A)",
        }
    }
}

impl Default for SortMode {
    fn default() -> Self {
        SortMode::AlphaAsc
    }
}

impl std::str::FromStr for SortMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "alpha-asc" | "alphabetical" => Ok(SortMode::AlphaAsc),
            "alpha-desc" | "alphabetical-reverse" => Ok(SortMode::AlphaDesc),
            "hospital-asc" | "hospital" => Ok(SortMode::HospitalAsc),
            "hospital-desc" | "hospital-reverse" => Ok(SortMode::HospitalDesc),
            _ => Err(format!("Invalid sort mode: {}", s)),
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortMode::AlphaAsc => write!(f, "alpha-asc"),
            SortMode::AlphaDesc => write!(f, "alpha-desc"),
            SortMode::HospitalAsc => write!(f, "hospital-asc"),
            SortMode::HospitalDesc => write!(f, "hospital-desc"),
        }
    }
}

/// Reaction of the personnel view to a failed submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayFailurePolicy {
    /// Log the failure, notify success anyway and clear local state
    Clear,
    /// Surface the error, notify a warning and keep the staged edit
    Retain,
}

impl Default for GatewayFailurePolicy {
    fn default() -> Self {
        GatewayFailurePolicy::Clear
    }
}

impl std::str::FromStr for GatewayFailurePolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clear" => Ok(GatewayFailurePolicy::Clear),
            "retain" => Ok(GatewayFailurePolicy::Retain),
            _ => Err(format!("Invalid gateway failure policy: {}", s)),
        }
    }
}

impl std::fmt::Display for GatewayFailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayFailurePolicy::Clear => write!(f, "clear"),
            GatewayFailurePolicy::Retain => write!(f, "retain"),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backing store settings
    #[serde(default)]
    pub store: StoreConfig,
    /// View defaults
    #[serde(default)]
    pub views: ViewsConfig,
    /// Mutation pipeline settings
    #[serde(default)]
    pub mutations: MutationsConfig,
    /// Notification settings
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError(e),
        })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.notifications.duration_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "notifications.duration_ms".to_string(),
                reason: "Duration must be greater than 0".to_string(),
            });
        }

        if self.store.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store.path".to_string(),
                reason: "Store path must not be empty".to_string(),
            });
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" | "off" => {}
            other => {
                return Err(ConfigError::InvalidValue {
                    field: "logging.level".to_string(),
                    reason: format!("Unknown log level '{}'", other),
                })
            }
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}
