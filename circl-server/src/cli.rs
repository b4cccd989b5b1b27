//! Command-line arguments for the circl binaries
//!
//! Both binaries resolve settings the same way: command line, then the
//! `CIRCL_*` environment variables, then the TOML file, then defaults. An
//! explicitly named config file must exist; the implicit one is optional.

use std::path::{Path, PathBuf};

use anyhow::Result;
use circl_common::config::{load_toml_config, ConfigOverrides, ServerConfig, DEFAULT_CONFIG_FILE};
use clap::Parser;

/// Command-line arguments for circl-server
#[derive(Parser, Debug)]
#[command(name = "circl-server")]
#[command(about = "Data-management API and static host for the Circl feed simulator")]
#[command(version)]
pub struct ServerArgs {
    /// TOML config file (default: <base-dir>/circl.toml)
    #[arg(short, long, env = "CIRCL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "CIRCL_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "CIRCL_PORT")]
    pub port: Option<u16>,

    /// Directory holding the front-end static assets
    #[arg(short, long, env = "CIRCL_BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    /// Directory holding feed-config.json, stimuli.json and fillers.json
    #[arg(long, env = "CIRCL_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Root folder with one subdirectory per condition
    #[arg(long, env = "CIRCL_IMAGES_DIR")]
    pub images_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CIRCL_LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl ServerArgs {
    pub fn resolve(self) -> Result<ServerConfig> {
        let config_path = config_path(self.config.as_deref(), self.base_dir.as_deref())?;
        let toml = load_toml_config(&config_path)?;

        Ok(ServerConfig::resolve(
            ConfigOverrides {
                host: self.host,
                port: self.port,
                base_dir: self.base_dir,
                data_dir: self.data_dir,
                images_dir: self.images_dir,
                catalog_file: None,
                log_level: self.log_level,
            },
            toml,
        ))
    }
}

/// Catalog generator arguments
#[derive(Parser, Debug)]
#[command(name = "generate-conditions")]
#[command(about = "Build conditions.json from the generated images folder")]
#[command(version)]
pub struct GenerateArgs {
    /// Root folder with one subdirectory per condition
    #[arg(short, long, env = "CIRCL_IMAGES_DIR")]
    pub images_dir: Option<PathBuf>,

    /// Catalog output path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TOML config file supplying defaults for the paths above (default: circl.toml)
    #[arg(short, long, env = "CIRCL_CONFIG")]
    pub config: Option<PathBuf>,
}

impl GenerateArgs {
    /// Relative paths resolve against the configured base_dir, "." by default
    pub fn resolve(self) -> Result<ServerConfig> {
        let config_path = config_path(self.config.as_deref(), None)?;
        let toml = load_toml_config(&config_path)?;

        Ok(ServerConfig::resolve(
            ConfigOverrides {
                images_dir: self.images_dir,
                catalog_file: self.output,
                ..Default::default()
            },
            toml,
        ))
    }
}

/// Config file to load
///
/// An explicit path must exist. Otherwise `circl.toml` inside `base_dir`
/// (or the working directory) is used when present.
pub fn config_path(explicit: Option<&Path>, base_dir: Option<&Path>) -> Result<PathBuf> {
    match (explicit, base_dir) {
        (Some(path), _) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Ok(path.to_path_buf())
        }
        (None, Some(base)) => Ok(base.join(DEFAULT_CONFIG_FILE)),
        (None, None) => Ok(PathBuf::from(DEFAULT_CONFIG_FILE)),
    }
}
