use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Name of the configuration file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration for the TeamFlow board service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// URL for the database connection
    pub database_url: String,
    /// Address the HTTP server binds to
    pub host: String,
    /// Port the HTTP server listens on
    pub port: u16,
    /// Re-attempts of a write transaction that keeps hitting a locked database
    pub max_retries: u32,
    /// Directory for JSON log files; stdout only when unset
    pub log_dir: Option<PathBuf>,
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub max_retries: Option<u32>,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    /// Base URL the CLI talks to; ignored by the server
    #[serde(default)]
    pub server_url: Option<String>,
}

/// Command line arguments for the server
#[derive(Parser, Debug, Default)]
#[clap(name = "teamflow", about = "Kanban board service")]
pub struct CliArgs {
    /// Database URL
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Address to bind
    #[clap(long, env = "TEAMFLOW_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[clap(long, env = "TEAMFLOW_PORT")]
    pub port: Option<u16>,

    /// Retries for write transactions blocked by concurrent writers
    #[clap(long, env = "TEAMFLOW_MAX_RETRIES")]
    pub max_retries: Option<u32>,

    /// Directory for rolling JSON log files
    #[clap(long, env = "TEAMFLOW_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Debug mode
    #[clap(long, env = "TEAMFLOW_DEBUG", default_value_t = false)]
    pub debug: bool,
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            host: update.host.unwrap_or(self.host),
            port: update.port.unwrap_or(self.port),
            max_retries: update.max_retries.unwrap_or(self.max_retries),
            log_dir: update.log_dir.or(self.log_dir),
        }
    }

    /// The `host:port` pair the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Returns the base (default) configuration
///
/// The database lives next to the config file when a config directory is
/// known, and in the working directory otherwise.
pub fn base_config(config_dir: Option<PathBuf>) -> Config {
    let database_url = config_dir.map_or("teamflow.db".to_string(), |path| {
        path.join("teamflow.db").to_string_lossy().to_string()
    });

    Config {
        database_url,
        host: "127.0.0.1".to_string(),
        port: 3000,
        max_retries: 5,
        log_dir: None,
    }
}

/// Loads configuration from a TOML file
///
/// A missing path or a missing file yields an empty update.
pub fn config_from_file(config_path: Option<&Path>) -> anyhow::Result<ConfigUpdate> {
    let Some(config_path) = config_path else {
        return Ok(ConfigUpdate::default());
    };

    if !config_path.exists() {
        info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(ConfigUpdate::default());
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file {:?}", config_path))?;
    let update = toml::from_str::<ConfigUpdate>(&content)
        .with_context(|| format!("Failed to parse config file {:?}", config_path))?;
    info!("Loaded configuration from {:?}", config_path);
    Ok(update)
}

/// Loads configuration from command line arguments
pub fn config_from_args(args: CliArgs) -> ConfigUpdate {
    ConfigUpdate {
        database_url: args.database_url,
        host: args.host,
        port: args.port,
        max_retries: args.max_retries,
        log_dir: args.log_dir,
        server_url: None,
    }
}

/// Returns the platform config directory, if it exists
pub fn get_config_dir_path() -> Option<PathBuf> {
    let Some(proj_dirs) = ProjectDirs::from("com", "teamflow", "teamflow") else {
        warn!("Could not determine XDG config directory, skipping config file");
        return None;
    };

    let path = proj_dirs.config_dir().to_path_buf();
    if path.exists() {
        Some(path)
    } else {
        info!("Config path not found at {:?}, using defaults", path);
        None
    }
}

/// Merges defaults, the config file found in `config_dir` and the arguments,
/// in order of increasing precedence
///
/// A config file that cannot be read or parsed is logged and ignored.
pub fn resolve_config(config_dir: Option<PathBuf>, args: CliArgs) -> Config {
    let config_file = config_dir.as_ref().map(|dir| dir.join(CONFIG_FILE_NAME));
    let file_update = config_from_file(config_file.as_deref()).unwrap_or_else(|err| {
        warn!("{:#}", err);
        ConfigUpdate::default()
    });

    base_config(config_dir)
        .apply_update(file_update)
        .apply_update(config_from_args(args))
}

/// Gets the complete configuration by combining defaults with
/// values from config file, environment variables, and command line arguments
/// in order of increasing precedence
pub fn get_config(args: CliArgs) -> Config {
    let config = resolve_config(get_config_dir_path(), args);

    info!(
        "Final configuration: database_url={}, bind={}, max_retries={}, log_dir={:?}",
        config.database_url,
        config.bind_address(),
        config.max_retries,
        config.log_dir
    );

    config
}

#[cfg(test)]
mod tests;
