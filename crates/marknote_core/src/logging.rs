//! Process logging started from a resolved [`CoreConfig`].
//!
//! # Invariants
//! - Events are metadata-only `key=value` lines; note titles, markdown and
//!   tag labels are never logged.
//! - Starting again with the same level and directory is a no-op; any other
//!   restart is rejected.

use crate::config::{CoreConfig, LogLevel};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const LOG_FILE_BASENAME: &str = "marknote";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    level: LogLevel,
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

#[derive(Debug)]
pub enum LoggingError {
    CreateDir {
        log_dir: PathBuf,
        source: std::io::Error,
    },
    Start(flexi_logger::FlexiLoggerError),
    Conflict {
        active_level: LogLevel,
        active_dir: PathBuf,
    },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateDir { log_dir, source } => write!(
                f,
                "failed to create log directory `{}`: {source}",
                log_dir.display()
            ),
            Self::Start(err) => write!(f, "failed to start logger: {err}"),
            Self::Conflict {
                active_level,
                active_dir,
            } => write!(
                f,
                "logging already running at level `{}` in `{}`",
                active_level.as_str(),
                active_dir.display()
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Start(err) => Some(err),
            Self::Conflict { .. } => None,
        }
    }
}

/// Starts rolling file logs in `config.log_dir` at `config.log_level`.
pub fn init_logging(config: &CoreConfig) -> Result<(), LoggingError> {
    let active = ACTIVE.get_or_try_init(|| start(config))?;
    if active.level != config.log_level || active.log_dir != config.log_dir {
        return Err(LoggingError::Conflict {
            active_level: active.level,
            active_dir: active.log_dir.clone(),
        });
    }
    Ok(())
}

fn start(config: &CoreConfig) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&config.log_dir).map_err(|source| LoggingError::CreateDir {
        log_dir: config.log_dir.clone(),
        source,
    })?;

    let handle = Logger::try_with_str(config.log_level.as_str())
        .map_err(LoggingError::Start)?
        .log_to_file(
            FileSpec::default()
                .directory(config.log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(LoggingError::Start)?;

    info!(
        "event=logging_start module=core status=ok level={} version={}",
        config.log_level.as_str(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        level: config.log_level,
        log_dir: config.log_dir.clone(),
        _handle: handle,
    })
}

#[cfg(test)]
mod tests {
    use super::{init_logging, LoggingError};
    use crate::config::{CoreConfig, LogLevel};

    // One test owns the process-wide logger.
    #[test]
    fn init_is_idempotent_for_same_config_and_rejects_changes() {
        let root = tempfile::tempdir().unwrap();
        let config = CoreConfig {
            db_path: root.path().join("notes.sqlite3"),
            log_level: LogLevel::Info,
            log_dir: root.path().join("logs"),
        };

        init_logging(&config).unwrap();
        init_logging(&config.clone()).unwrap();
        assert!(config.log_dir.is_dir());

        let louder = CoreConfig {
            log_level: LogLevel::Debug,
            ..config.clone()
        };
        let err = init_logging(&louder).unwrap_err();
        assert!(matches!(
            err,
            LoggingError::Conflict { active_level: LogLevel::Info, .. }
        ));

        let moved = CoreConfig {
            log_dir: root.path().join("elsewhere"),
            ..config.clone()
        };
        match init_logging(&moved).unwrap_err() {
            LoggingError::Conflict { active_dir, .. } => assert_eq!(active_dir, config.log_dir),
            other => panic!("unexpected error: {other}"),
        }

        // A different db path alone is not a logging change.
        let other_db = CoreConfig {
            db_path: root.path().join("other.sqlite3"),
            ..config
        };
        init_logging(&other_db).unwrap();
    }
}
