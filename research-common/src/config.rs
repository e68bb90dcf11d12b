//! Configuration loading and path resolution
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is not fatal: the caller logs a warning and the
//! compiled defaults apply. A malformed file is a configuration error.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_PATH: &str = "database/research_data.db";
pub const DEFAULT_EXPORTS_PATH: &str = "exports";
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const ENV_ROOT_FOLDER: &str = "RESEARCH_ROOT_FOLDER";
pub const ENV_DATABASE: &str = "RESEARCH_DATABASE";
pub const ENV_EXPORTS: &str = "RESEARCH_EXPORTS";
pub const ENV_HOST: &str = "RESEARCH_HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_CONFIG: &str = "RESEARCH_CONFIG";
pub const ENV_LOG_LEVEL: &str = "RESEARCH_LOG_LEVEL";

/// Contents of the optional TOML config file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub exports_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl TomlConfig {
    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load a config file. Returns `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content)
                .map(Some)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

/// Values supplied from the command line or the environment
///
/// Every field is optional; `None` means "not given at this layer".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub root_folder: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub exports_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    /// Read overrides from `RESEARCH_*` and `PORT` environment variables
    pub fn from_env() -> Result<Self> {
        let port = match env_var(ENV_PORT) {
            Some(raw) => Some(raw.trim().parse::<u16>().map_err(|_| {
                Error::Config(format!("{} must be a port number, got '{}'", ENV_PORT, raw))
            })?),
            None => None,
        };

        Ok(Self {
            root_folder: env_var(ENV_ROOT_FOLDER).map(PathBuf::from),
            database_path: env_var(ENV_DATABASE).map(PathBuf::from),
            exports_path: env_var(ENV_EXPORTS).map(PathBuf::from),
            host: env_var(ENV_HOST),
            port,
            config_file: env_var(ENV_CONFIG).map(PathBuf::from),
            log_level: env_var(ENV_LOG_LEVEL),
        })
    }

    /// Fill unset fields from a lower-priority layer
    pub fn or(self, lower: ConfigOverrides) -> Self {
        Self {
            root_folder: self.root_folder.or(lower.root_folder),
            database_path: self.database_path.or(lower.database_path),
            exports_path: self.exports_path.or(lower.exports_path),
            host: self.host.or(lower.host),
            port: self.port.or(lower.port),
            config_file: self.config_file.or(lower.config_file),
            log_level: self.log_level.or(lower.log_level),
        }
    }

    /// Config file to read: explicit override, else the per-user default if it exists
    pub fn config_file_path(&self) -> Option<PathBuf> {
        self.config_file.clone().or_else(|| {
            default_config_file().filter(|path| path.exists())
        })
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub root_folder: PathBuf,
    pub database_path: PathBuf,
    pub exports_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::resolve(&ConfigOverrides::default(), None)
    }
}

impl ServiceConfig {
    /// Merge override layers over the file over compiled defaults
    ///
    /// Relative database and export paths are joined onto the root folder.
    pub fn resolve(overrides: &ConfigOverrides, file: Option<&TomlConfig>) -> Self {
        let file = file.cloned().unwrap_or_default();

        let root_folder = overrides
            .root_folder
            .clone()
            .or(file.root_folder)
            .unwrap_or_else(|| PathBuf::from("."));

        let database_path = overrides
            .database_path
            .clone()
            .or(file.database_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        let exports_path = overrides
            .exports_path
            .clone()
            .or(file.exports_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORTS_PATH));

        Self {
            database_path: root_folder.join(database_path),
            exports_path: root_folder.join(exports_path),
            root_folder,
            host: overrides
                .host
                .clone()
                .or(file.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.or(file.port).unwrap_or(DEFAULT_PORT),
        }
    }

    /// `host:port` string for binding the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Per-user config file location, e.g. `~/.config/research-api/config.toml`
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("research-api").join("config.toml"))
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
