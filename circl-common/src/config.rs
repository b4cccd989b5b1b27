//! Bootstrap configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line arguments / environment variables (parsed by the binaries)
//! 2. TOML config file
//! 3. Compiled defaults
//!
//! Relative data, image and catalog paths are resolved against `base_dir`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::{Error, Result};

/// Default config file name looked up inside `base_dir`
pub const DEFAULT_CONFIG_FILE: &str = "circl.toml";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DATA_DIR: &str = "circl/data";
const DEFAULT_IMAGES_DIR: &str = "generated_images";
const DEFAULT_CATALOG_FILE: &str = "conditions.json";

/// Bootstrap configuration as written in the TOML file
///
/// Every field is optional; absent fields fall back to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,

    /// Directory holding the front-end static assets
    #[serde(default)]
    pub base_dir: Option<PathBuf>,

    /// Directory holding feed-config.json, stimuli.json and fillers.json
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Root folder with one subdirectory per condition
    #[serde(default)]
    pub images_dir: Option<PathBuf>,

    /// Output path of the generated catalog
    #[serde(default)]
    pub catalog_file: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
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

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub base_dir: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub images_dir: Option<PathBuf>,
    pub catalog_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved configuration handed to every component at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_dir: PathBuf,
    pub data_dir: PathBuf,
    pub images_dir: PathBuf,
    pub catalog_file: PathBuf,
    pub log_level: String,
}

impl ServerConfig {
    /// Compiled defaults rooted at `base_dir`
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: base_dir.join(DEFAULT_DATA_DIR),
            images_dir: base_dir.join(DEFAULT_IMAGES_DIR),
            catalog_file: base_dir.join(DEFAULT_CATALOG_FILE),
            base_dir,
            log_level: default_log_level(),
        }
    }

    /// Merge overrides, TOML and defaults
    pub fn resolve(overrides: ConfigOverrides, toml: Option<TomlConfig>) -> Self {
        let toml = toml.unwrap_or_default();

        let base_dir = overrides
            .base_dir
            .or(toml.base_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        let anchor = |path: Option<PathBuf>, fallback: &str| -> PathBuf {
            let path = path.unwrap_or_else(|| PathBuf::from(fallback));
            if path.is_absolute() {
                path
            } else {
                base_dir.join(path)
            }
        };

        let data_dir = anchor(overrides.data_dir.or(toml.data_dir), DEFAULT_DATA_DIR);
        let images_dir = anchor(overrides.images_dir.or(toml.images_dir), DEFAULT_IMAGES_DIR);
        let catalog_file = anchor(
            overrides.catalog_file.or(toml.catalog_file),
            DEFAULT_CATALOG_FILE,
        );

        Self {
            host: overrides
                .host
                .or(toml.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.or(toml.port).unwrap_or(DEFAULT_PORT),
            data_dir,
            images_dir,
            catalog_file,
            base_dir,
            log_level: overrides.log_level.unwrap_or(toml.logging.level),
        }
    }

    /// `host:port` string for binding the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load a TOML config file
///
/// A missing file is not an error (returns `Ok(None)`); an unreadable or
/// malformed file is.
pub fn load_toml_config(path: &Path) -> Result<Option<TomlConfig>> {
    if !path.exists() {
        info!("No config file at {}, using defaults", path.display());
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;

    let config: TomlConfig = toml::from_str(&content).map_err(|e| {
        warn!("Config file {} is malformed", path.display());
        Error::Config(format!("Parse {} failed: {}", path.display(), e))
    })?;

    info!("Loaded config from {}", path.display());
    Ok(Some(config))
}
