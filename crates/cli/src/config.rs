//! # CLI Configuration
//!
//! Settings for the `kyb` command-line tool, resolved from three layers (later
//! layers win):
//! 1. Built-in defaults.
//! 2. An optional `kyb.yml` in the working directory, or the file named by
//!    `--config` / `KYB_CONFIG`. `${VAR}` references in the file are replaced
//!    with environment values before parsing.
//! 3. `KYB_`-prefixed environment variables, e.g. `KYB_API_BASE_URL`.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use tracing::info;

pub const DEFAULT_CONFIG_FILE: &str = "kyb.yml";

#[derive(Debug)]
pub enum ConfigError {
    /// An error from the underlying `config` crate.
    General(String),
    /// An explicitly requested config file does not exist.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CliConfig {
    /// Base URL of the KYB backend. Loaded from `KYB_API_BASE_URL`.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Per-request timeout. Report generation runs the whole extraction
    /// pipeline, so keep this generous.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Where tracing output goes; the terminal is reserved for results.
    #[serde(default = "default_log_file")]
    pub log_file: String,
    /// The OS keyring service the access token is stored under.
    #[serde(default = "default_keyring_service")]
    pub keyring_service: String,
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_log_file() -> String {
    "kyb-cli.log".to_string()
}

fn default_keyring_service() -> String {
    "kyb-cli".to_string()
}

// Reads a file and expands `${VAR}` references from the environment.
// Returns Ok(None) if the file does not exist.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded = re.replace_all(&content, |caps: &regex::Captures| {
        env::var(&caps["var"]).unwrap_or_default()
    });

    Ok(Some(expanded.into_owned()))
}

/// Loads the CLI configuration.
///
/// A missing `kyb.yml` is fine and leaves the defaults in place, but a path
/// passed explicitly through `config_path_override` must exist.
pub fn get_config(config_path_override: Option<&str>) -> Result<CliConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder();

    let file_content = match config_path_override {
        Some(path) => {
            let content = read_and_substitute(path)?.ok_or_else(|| {
                ConfigError::NotFound(format!("Config file not found at '{path}'."))
            })?;
            info!("Loading configuration from '{path}'.");
            Some(content)
        }
        None => {
            let content = read_and_substitute(DEFAULT_CONFIG_FILE)?;
            if content.is_some() {
                info!("Loading configuration from '{DEFAULT_CONFIG_FILE}'.");
            }
            content
        }
    };
    if let Some(content) = file_content {
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    }

    let settings = builder
        .add_source(
            Environment::with_prefix("KYB")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
