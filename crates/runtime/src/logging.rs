use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::Path,
    sync::{Mutex, OnceLock},
};

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::config::{PROGRAM_LOG_LEVEL, log_file};

enum LogTarget {
    Stderr,
    File(Mutex<File>),
}

pub struct Logger {
    level: Level,
    target: LogTarget,
}

impl Logger {
    fn format(record: &Record<'_>) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        format!(
            "{} {} [{}] {}",
            timestamp,
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = Self::format(record);

        match &self.target {
            LogTarget::Stderr => eprintln!("{msg}"),
            LogTarget::File(file) => {
                if let Ok(mut f) = file.lock() {
                    let _ = writeln!(f, "{msg}");
                }
            }
        }
    }

    fn flush(&self) {
        if let LogTarget::File(file) = &self.target
            && let Ok(mut f) = file.lock()
        {
            let _ = f.flush();
        }
    }
}

fn get_level_from_env() -> Level {
    std::env::var(PROGRAM_LOG_LEVEL)
        .ok()
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .and_then(|filter| filter.to_level())
        .unwrap_or(Level::Warn)
}

fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn target_from_env() -> LogTarget {
    match log_file() {
        Some(path) => match open_log_file(&path) {
            Ok(f) => LogTarget::File(Mutex::new(f)),
            Err(e) => {
                eprintln!("cannot open log file {}: {e}; logging to stderr", path.display());
                LogTarget::Stderr
            }
        },
        None => LogTarget::Stderr,
    }
}

/// Install the process-wide logger. Repeated calls are no-ops.
pub fn init() -> Result<(), SetLoggerError> {
    _init(get_level_from_env())
}

pub fn _init(level: Level) -> Result<(), SetLoggerError> {
    static LOGGER: OnceLock<Logger> = OnceLock::new();

    // Only the first call installs; a later call with a different level
    // must not move max_level away from the installed logger's level.
    let init_call = LOGGER.get().is_none();

    let logger = LOGGER.get_or_init(|| Logger {
        level,
        target: target_from_env(),
    });

    if init_call {
        log::set_logger(logger)?;
        log::set_max_level(logger.level.to_level_filter());
    }

    Ok(())
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
