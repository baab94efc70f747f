use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Severity of a log record.
///
/// Ordered from least to most verbose: a record at level `L` is written when
/// `L <= threshold`. `Off` as a threshold silences everything, `All` lets
/// everything through.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    Off = 0,
    Fatal = 1,
    Error = 2,
    Warn = 3,
    #[default]
    Info = 4,
    Debug = 5,
    Trace = 6,
    All = 7,
}

impl Level {
    pub const ALL_LEVELS: [Level; 8] = [
        Level::Off,
        Level::Fatal,
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
        Level::Trace,
        Level::All,
    ];

    /// Three-letter tag written into the record header.
    pub const fn tag(self) -> &'static str {
        match self {
            Level::Off => "OFF",
            Level::Fatal => "FTL",
            Level::Error => "ERR",
            Level::Warn => "WRN",
            Level::Info => "INF",
            Level::Debug => "DBG",
            Level::Trace => "TRC",
            Level::All => "ALL",
        }
    }

    pub const fn from_u8(value: u8) -> Option<Level> {
        match value {
            0 => Some(Level::Off),
            1 => Some(Level::Fatal),
            2 => Some(Level::Error),
            3 => Some(Level::Warn),
            4 => Some(Level::Info),
            5 => Some(Level::Debug),
            6 => Some(Level::Trace),
            7 => Some(Level::All),
            _ => None,
        }
    }

    /// ANSI colour used for the standard-output echo of a record.
    pub(crate) const fn ansi_color(self) -> &'static str {
        match self {
            Level::Fatal | Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[32m",
            Level::Debug | Level::Trace => "\x1b[36m",
            Level::Off | Level::All => "",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Level {
    type Err = ConfigError;

    /// Accepts the level name (`warn`, `WARNING`), its tag (`WRN`) or its number (`3`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<u8>() {
            return Level::from_u8(n).ok_or_else(|| ConfigError::UnknownLevel(s.to_string()));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "off" => Ok(Level::Off),
            "fatal" | "ftl" => Ok(Level::Fatal),
            "error" | "err" => Ok(Level::Error),
            "warn" | "warning" | "wrn" => Ok(Level::Warn),
            "info" | "inf" => Ok(Level::Info),
            "debug" | "dbg" => Ok(Level::Debug),
            "trace" | "trc" => Ok(Level::Trace),
            "all" => Ok(Level::All),
            _ => Err(ConfigError::UnknownLevel(s.to_string())),
        }
    }
}

impl From<Level> for log::LevelFilter {
    fn from(level: Level) -> Self {
        match level {
            Level::Off => log::LevelFilter::Off,
            // `log` has no fatal level
            Level::Fatal | Level::Error => log::LevelFilter::Error,
            Level::Warn => log::LevelFilter::Warn,
            Level::Info => log::LevelFilter::Info,
            Level::Debug => log::LevelFilter::Debug,
            Level::Trace | Level::All => log::LevelFilter::Trace,
        }
    }
}

impl From<Level> for Option<tracing::Level> {
    fn from(level: Level) -> Self {
        match level {
            Level::Off => None,
            Level::Fatal | Level::Error => Some(tracing::Level::ERROR),
            Level::Warn => Some(tracing::Level::WARN),
            Level::Info => Some(tracing::Level::INFO),
            Level::Debug => Some(tracing::Level::DEBUG),
            Level::Trace | Level::All => Some(tracing::Level::TRACE),
        }
    }
}
