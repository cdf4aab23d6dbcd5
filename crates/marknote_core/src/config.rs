//! Runtime configuration resolved from environment variables.
//!
//! | Variable             | Default                            |
//! |----------------------|------------------------------------|
//! | `MARKNOTE_DB_PATH`   | `<tmp>/marknote.sqlite3`           |
//! | `MARKNOTE_LOG_LEVEL` | `debug` (debug) / `info` (release) |
//! | `MARKNOTE_LOG_DIR`   | `<tmp>/marknote-logs`              |
//!
//! Blank values count as unset.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "MARKNOTE_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "MARKNOTE_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "MARKNOTE_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "marknote.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "marknote-logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(value) => write!(
                f,
                "{LOG_LEVEL_ENV}: unsupported level `{value}`; expected trace|debug|info|warn|error"
            ),
            Self::RelativeLogDir(path) => write!(
                f,
                "{LOG_DIR_ENV} must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {}

/// Log verbosity accepted by `MARKNOTE_LOG_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Case-insensitive; `warning` is accepted for `warn`.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ConfigError::InvalidLogLevel(value.trim().to_string())),
        }
    }

    /// `Debug` for debug builds, `Info` for release builds.
    pub fn for_build() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Info
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Resolved process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: LogLevel,
    pub log_dir: PathBuf,
}

impl CoreConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let log_level = match read(LOG_LEVEL_ENV) {
            Some(raw) => LogLevel::parse(&raw)?,
            None => LogLevel::for_build(),
        };

        let log_dir = read(LOG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME));
        if !log_dir.is_absolute() {
            return Err(ConfigError::RelativeLogDir(log_dir));
        }

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, LogLevel, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn level_parsing_accepts_aliases_and_rejects_unknown() {
        assert_eq!(LogLevel::parse("INFO").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::parse(" warning ").unwrap(), LogLevel::Warn);
        assert_eq!(
            LogLevel::parse("verbose").unwrap_err(),
            ConfigError::InvalidLogLevel("verbose".to_string())
        );
    }

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let config = CoreConfig::from_lookup(lookup(&[(DB_PATH_ENV, "   ")])).unwrap();
        assert_eq!(
            config.db_path,
            std::env::temp_dir().join("marknote.sqlite3")
        );
        assert_eq!(config.log_level, LogLevel::for_build());
        assert!(config.log_dir.is_absolute());
    }

    #[test]
    fn explicit_values_are_normalized() {
        let log_dir = std::env::temp_dir().join("marknote-config-test");
        let log_dir_str = log_dir.to_str().unwrap().to_string();
        let config = CoreConfig::from_lookup(lookup(&[
            (DB_PATH_ENV, "/data/notes.sqlite3"),
            (LOG_LEVEL_ENV, " Warning "),
            (LOG_DIR_ENV, log_dir_str.as_str()),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/data/notes.sqlite3"));
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.log_dir, log_dir);
    }

    #[test]
    fn invalid_level_and_relative_dir_are_rejected() {
        let level_err = CoreConfig::from_lookup(lookup(&[(LOG_LEVEL_ENV, "verbose")])).unwrap_err();
        assert!(matches!(level_err, ConfigError::InvalidLogLevel(_)));

        let dir_err = CoreConfig::from_lookup(lookup(&[(LOG_DIR_ENV, "logs/dev")])).unwrap_err();
        assert_eq!(dir_err, ConfigError::RelativeLogDir(PathBuf::from("logs/dev")));
    }
}
