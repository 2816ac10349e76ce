//! Configuration module for the album exporter
//!
//! Supports loading configuration from a TOML file.
//! Configuration is stored in a standard location:
//! - Windows: %APPDATA%\lychee_exporter\config.toml
//! - Linux: ~/.config/lychee_exporter/config.toml
//! - macOS: ~/Library/Application Support/lychee_exporter/config.toml
//!
//! The raw [`Config`] may be incomplete. [`Config::validate`] checks it once
//! and produces [`ExportSettings`], which is all the export itself sees.

use crate::transfer::{TransferMethod, DEFAULT_RSYNC_ARGS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Application name used for config directory
const APP_NAME: &str = "lychee_exporter";

/// Default config file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Config file looked up in the current directory first
const LOCAL_CONFIG_FILE_NAME: &str = "lychee_export.toml";

/// Get the standard configuration directory for the application.
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME))
}

/// Get the standard configuration file path.
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Ensure the configuration directory exists.
pub fn ensure_config_dir() -> Result<PathBuf, ConfigError> {
    let config_dir = get_config_dir().ok_or(ConfigError::ConfigDirNotFound)?;

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)
            .map_err(|e| ConfigError::WriteError(config_dir.clone(), e.to_string()))?;
    }

    Ok(config_dir)
}

/// Initialize the configuration file if it doesn't exist.
///
/// Returns the path to the config file.
pub fn init_config() -> Result<PathBuf, ConfigError> {
    let config_dir = ensure_config_dir()?;
    let config_path = config_dir.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        fs::write(&config_path, Config::generate_default_config())
            .map_err(|e| ConfigError::WriteError(config_path.clone(), e.to_string()))?;
    }

    Ok(config_path)
}

/// Action to take when a photo has no original size variant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MissingVariantPolicy {
    /// Stop the whole export
    #[default]
    Abort,
    /// Count the photo as failed and continue
    Skip,
}

impl std::str::FromStr for MissingVariantPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(MissingVariantPolicy::Abort),
            "skip" => Ok(MissingVariantPolicy::Skip),
            other => Err(format!("unknown missing-variant policy '{}'", other)),
        }
    }
}

impl fmt::Display for MissingVariantPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingVariantPolicy::Abort => write!(f, "abort"),
            MissingVariantPolicy::Skip => write!(f, "skip"),
        }
    }
}

/// Supported database drivers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreDriver {
    #[default]
    Mysql,
    Sqlite,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database connection settings
    pub store: StoreConfig,

    /// Source and destination directories
    pub paths: PathsConfig,

    /// Export behaviour
    pub export: ExportConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Database connection settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Full connection URL; overrides the individual fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Database driver
    pub driver: StoreDriver,

    /// Server host (mysql)
    pub host: String,

    /// Server port (mysql)
    pub port: u16,

    /// Database name (mysql) or file path (sqlite)
    pub database: String,

    /// User name (mysql)
    pub username: String,

    /// Password (mysql)
    pub password: String,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url.as_deref().map(redact_url))
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "****" })
            .finish()
    }
}

/// Source and destination directories
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Lychee uploads directory
    pub uploads_root: PathBuf,

    /// Export destination
    pub export_root: PathBuf,
}

/// Export behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Policy for photos without an original file
    pub on_missing_variant: MissingVariantPolicy,

    /// How files are copied
    pub transfer_method: TransferMethod,

    /// rsync executable
    pub rsync_program: PathBuf,

    /// Arguments placed before source and destination
    pub rsync_args: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log to file
    pub log_to_file: bool,

    /// Log file path
    pub log_file: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            driver: StoreDriver::Mysql,
            host: "localhost".to_string(),
            port: 3306,
            database: "lychee".to_string(),
            username: String::new(),
            password: String::new(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            on_missing_variant: MissingVariantPolicy::Abort,
            transfer_method: TransferMethod::Rsync,
            rsync_program: PathBuf::from("rsync"),
            rsync_args: DEFAULT_RSYNC_ARGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: false,
            log_file: PathBuf::from("lychee_export.log"),
        }
    }
}

impl StoreConfig {
    fn explicit_url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    /// Required connection fields that are still empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        if self.explicit_url().is_some() {
            return Vec::new();
        }

        let mut missing = Vec::new();
        if self.database.trim().is_empty() {
            missing.push("store.database");
        }
        if self.driver == StoreDriver::Mysql {
            if self.host.trim().is_empty() {
                missing.push("store.host");
            }
            if self.username.trim().is_empty() {
                missing.push("store.username");
            }
        }
        missing
    }

    /// Build the connection URL handed to the store adapter
    ///
    /// SQLite files are opened read-only.
    pub fn connection_url(&self) -> Result<String, ConfigError> {
        if let Some(url) = self.explicit_url() {
            return Ok(url.to_string());
        }

        if let Some(field) = self.missing_fields().into_iter().next() {
            return Err(ConfigError::MissingField(field));
        }

        match self.driver {
            StoreDriver::Mysql => {
                let mut url = Url::parse(&format!("mysql://{}:{}", self.host.trim(), self.port))
                    .map_err(|e| {
                        ConfigError::Invalid(format!("store host '{}': {}", self.host, e))
                    })?;
                url.set_username(&self.username)
                    .map_err(|_| ConfigError::Invalid("store username cannot be set".to_string()))?;
                if !self.password.is_empty() {
                    url.set_password(Some(&self.password))
                        .map_err(|_| {
                            ConfigError::Invalid("store password cannot be set".to_string())
                        })?;
                }
                url.set_path(self.database.trim());
                Ok(url.to_string())
            }
            StoreDriver::Sqlite => Ok(format!("sqlite://{}?mode=ro", self.database.trim())),
        }
    }
}

/// Hide the password part of a connection URL
pub fn redact_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) if parsed.password().is_some() => {
            if parsed.set_password(Some("****")).is_ok() {
                parsed.to_string()
            } else {
                "<redacted>".to_string()
            }
        }
        Ok(_) => url.to_string(),
        Err(_) => "<unparseable url>".to_string(),
    }
}

/// Fully checked settings for one export run
#[derive(Clone)]
pub struct ExportSettings {
    pub store_url: String,
    pub uploads_root: PathBuf,
    pub export_root: PathBuf,
    pub on_missing_variant: MissingVariantPolicy,
    pub transfer_method: TransferMethod,
    pub rsync_program: PathBuf,
    pub rsync_args: Vec<String>,
}

impl fmt::Debug for ExportSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportSettings")
            .field("store_url", &redact_url(&self.store_url))
            .field("uploads_root", &self.uploads_root)
            .field("export_root", &self.export_root)
            .field("on_missing_variant", &self.on_missing_variant)
            .field("transfer_method", &self.transfer_method)
            .field("rsync_program", &self.rsync_program)
            .field("rsync_args", &self.rsync_args)
            .finish()
    }
}

impl Config {
    /// Required settings that are still empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = self.store.missing_fields();
        if self.paths.uploads_root.as_os_str().is_empty() {
            missing.push("paths.uploads_root");
        }
        if self.paths.export_root.as_os_str().is_empty() {
            missing.push("paths.export_root");
        }
        missing
    }

    /// Check if initial setup is required
    pub fn needs_setup(&self) -> bool {
        !self.missing_fields().is_empty()
    }

    /// Check every setting and prepare the export root
    ///
    /// The uploads root must be an existing directory. The export root is
    /// created when missing.
    pub fn validate(&self) -> Result<ExportSettings, ConfigError> {
        if let Some(field) = self.missing_fields().into_iter().next() {
            return Err(ConfigError::MissingField(field));
        }

        let store_url = self.store.connection_url()?;

        let uploads_root = &self.paths.uploads_root;
        if !uploads_root.is_dir() {
            return Err(ConfigError::InvalidPath(
                uploads_root.clone(),
                "uploads directory does not exist".to_string(),
            ));
        }

        let export_root = &self.paths.export_root;
        if export_root.exists() {
            if !export_root.is_dir() {
                return Err(ConfigError::InvalidPath(
                    export_root.clone(),
                    "export root exists and is not a directory".to_string(),
                ));
            }
        } else {
            fs::create_dir_all(export_root)
                .map_err(|e| ConfigError::WriteError(export_root.clone(), e.to_string()))?;
        }

        if self.export.transfer_method == TransferMethod::Rsync
            && self.export.rsync_program.as_os_str().is_empty()
        {
            return Err(ConfigError::MissingField("export.rsync_program"));
        }

        Ok(ExportSettings {
            store_url,
            uploads_root: uploads_root.clone(),
            export_root: export_root.clone(),
            on_missing_variant: self.export.on_missing_variant,
            transfer_method: self.export.transfer_method,
            rsync_program: self.export.rsync_program.clone(),
            rsync_args: self.export.rsync_args.clone(),
        })
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;

        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./lychee_export.toml (current directory)
    /// 2. Standard config location
    ///
    /// If no config file is found, returns default configuration.
    pub fn load_default() -> Result<Self, ConfigError> {
        let local = PathBuf::from(".").join(LOCAL_CONFIG_FILE_NAME);
        if local.exists() {
            return Self::load(&local);
        }

        if let Some(config_path) = get_config_path() {
            if config_path.exists() {
                return Self::load(&config_path);
            }
        }

        Ok(Self::default())
    }

    /// Get the path where the config file is (or would be) located.
    pub fn get_active_config_path() -> PathBuf {
        let local = PathBuf::from(".").join(LOCAL_CONFIG_FILE_NAME);
        if local.exists() {
            return local;
        }

        get_config_path().unwrap_or(local)
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::WriteError(parent.to_path_buf(), e.to_string()))?;
            }
        }

        fs::write(path.as_ref(), content)
            .map_err(|e| ConfigError::WriteError(path.as_ref().to_path_buf(), e.to_string()))?;

        Ok(())
    }

    /// Generate a default config file with comments
    pub fn generate_default_config() -> String {
        include_str!("../../config.example.toml").to_string()
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file was not found at the specified path
    FileNotFound(PathBuf),
    /// Failed to read the configuration file
    ReadError(PathBuf, String),
    /// Failed to parse the configuration file (invalid TOML)
    ParseError(PathBuf, String),
    /// Failed to serialize configuration to TOML
    SerializeError(String),
    /// Failed to write configuration file or create a directory
    WriteError(PathBuf, String),
    /// Could not determine config directory
    ConfigDirNotFound,
    /// A required setting is empty
    MissingField(&'static str),
    /// A configured path is unusable
    InvalidPath(PathBuf, String),
    /// A setting has an unusable value
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            ConfigError::ReadError(path, err) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), err)
            }
            ConfigError::ParseError(path, err) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), err)
            }
            ConfigError::SerializeError(err) => {
                write!(f, "Failed to serialize config: {}", err)
            }
            ConfigError::WriteError(path, err) => {
                write!(f, "Failed to write '{}': {}", path.display(), err)
            }
            ConfigError::ConfigDirNotFound => {
                write!(f, "Could not determine configuration directory")
            }
            ConfigError::MissingField(field) => {
                write!(f, "Missing required setting '{}'", field)
            }
            ConfigError::InvalidPath(path, reason) => {
                write!(f, "Invalid path '{}': {}", path.display(), reason)
            }
            ConfigError::Invalid(reason) => write!(f, "Invalid configuration: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {}
