//! evalloop configuration
//!
//! Settings are read from an optional user-level TOML file. Nothing is ever
//! written back.
//!
//! # Configuration hierarchy
//!
//! ```text
//! Priority (high -> low):
//! 1. CLI arguments
//! 2. User-level (~/.config/evalloop/config.toml, or --config FILE)
//! 3. Default values
//! ```
//!
//! # Example
//!
//! ```toml
//! [repl]
//! prompt = "$e [$i] "
//! stream_limit = 20
//! default_engine = "rpn"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::repl::commands::DEFAULT_COMMAND_PREFIX;
use crate::repl::printer::stream::DEFAULT_LIMIT;
use crate::repl::printer::DEFAULT_OUTPUT_PREFIX;
use crate::repl::prompt::DEFAULT_PROMPT;

/// User-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserConfig {
    /// Session settings
    #[serde(default)]
    pub repl: ReplSettings,
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplSettings {
    /// Prompt template
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Separator between the output counter and a result
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,
    /// Prefix marking a command line
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    /// Stream lines between pauses
    #[serde(default = "default_stream_limit")]
    pub stream_limit: usize,
    /// Number stream lines
    #[serde(default)]
    pub number_lines: bool,
    /// Engine used when none is given on the command line
    #[serde(default = "default_engine")]
    pub default_engine: String,
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

fn default_output_prefix() -> String {
    DEFAULT_OUTPUT_PREFIX.to_string()
}

fn default_command_prefix() -> String {
    DEFAULT_COMMAND_PREFIX.to_string()
}

fn default_stream_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_engine() -> String {
    "calc".to_string()
}

impl Default for ReplSettings {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            output_prefix: default_output_prefix(),
            command_prefix: default_command_prefix(),
            stream_limit: default_stream_limit(),
            number_lines: false,
            default_engine: default_engine(),
        }
    }
}

/// Get the user config directory
pub fn get_config_dir() -> Option<PathBuf> {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config).join("evalloop"));
    }

    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home).join(".config").join("evalloop"));
    }

    // Windows
    if let Ok(appdata) = std::env::var("APPDATA") {
        return Some(PathBuf::from(appdata).join("evalloop"));
    }

    None
}

/// Get the user config file path
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.toml"))
}

/// Load user-level configuration
///
/// Returns the defaults if there is no config directory or no file.
pub fn load_user_config() -> Result<UserConfig, ConfigError> {
    match get_config_path() {
        Some(path) if path.exists() => load_config_from(&path),
        _ => Ok(UserConfig::default()),
    }
}

/// Load configuration from an explicit file, which must exist
pub fn load_config_from(path: &Path) -> Result<UserConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Parse configuration text
pub fn parse_config(content: &str) -> Result<UserConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config parse error: {0}")]
    ParseError(#[from] toml::de::Error),
}
