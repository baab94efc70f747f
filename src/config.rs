//! Settings for a [`LogSink`](crate::LogSink) read from the process environment.

use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::level::Level;

pub const ENV_LOG_PATH: &str = "PIXLOG_LOG_PATH";
pub const ENV_LOG_LEVEL: &str = "PIXLOG_LOG_LEVEL";
pub const ENV_LOG_STDOUT: &str = "PIXLOG_LOG_STDOUT";

/// Where records go and which of them are opened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogConfig {
    pub path: PathBuf,
    pub threshold: Level,
    pub echo_stdout: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("debug/pixlog.log"),
            threshold: Level::Info,
            echo_stdout: false,
        }
    }
}

impl LogConfig {
    /// Reads the configuration from the environment, falling back to
    /// [`Default`] for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(path) = lookup(ENV_LOG_PATH).filter(|p| !p.trim().is_empty()) {
            cfg.path = PathBuf::from(path);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            cfg.threshold = level.parse()?;
        }
        if let Some(flag) = lookup(ENV_LOG_STDOUT) {
            cfg.echo_stdout = parse_flag(ENV_LOG_STDOUT, &flag)?;
        }

        Ok(cfg)
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key,
            value: value.to_string(),
        }),
    }
}
