//! Logger module for evalloop
//!
//! Simple `[LEVEL] message` logging to stderr, so log lines never mix with
//! the session transcript on stdout.
//!
//! # Usage
//!
//! ```rust,no_run
//! use evalloop::util::logger;
//!
//! logger::init_from_env(false);
//! tracing::warn!("Hello, {}", "world");
//! ```

use std::str::FromStr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

/// Environment variable overriding the log level
pub const LOG_ENV: &str = "EVALLOOP_LOG";

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// Pick the level: `EVALLOOP_LOG` wins, then `--verbose`, then WARN
pub fn resolve_level(
    env_value: Option<&str>,
    verbose: bool,
) -> LogLevel {
    if let Some(level) = env_value.and_then(|v| v.parse().ok()) {
        return level;
    }
    if verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    }
}

/// Initialize logger with custom level
pub fn init_with_level(level: LogLevel) {
    let filter = tracing_subscriber::filter::LevelFilter::from_level(level.into());

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_level(true)
        .with_ansi(false)
        .compact()
        .with_filter(filter);

    Registry::default().with(layer).init();
}

/// Initialize logger for CLI use
pub fn init_from_env(verbose: bool) {
    let env_value = std::env::var(LOG_ENV).ok();
    init_with_level(resolve_level(env_value.as_deref(), verbose));
}
