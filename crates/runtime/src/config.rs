use std::{path::PathBuf, thread, time::Duration};

pub const PROGRAM_NAME: &str = "statwire";
pub const PROGRAM_LOG_LEVEL: &str = "STATWIRE_LOG_LEVEL";
/// Append log lines to this file instead of stderr.
pub const PROGRAM_LOG_FILE: &str = "STATWIRE_LOG_FILE";
/// Overrides the ssh client binary.
pub const SSH_PROGRAM_ENV: &str = "STATWIRE_SSH";
/// ssh `ConnectTimeout`, in seconds.
pub const CONNECT_TIMEOUT_ENV: &str = "STATWIRE_CONNECT_TIMEOUT";

pub const DEFAULT_SSH_PROGRAM: &str = "ssh";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Shell used to run listing commands locally.
pub const LOCAL_SHELL: &str = "/bin/sh";

/// Number of records handed to consumers per channel message.
/// Larger batches reduce channel overhead but delay the first records.
pub const BATCH_SIZE: usize = 256;

fn non_empty_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

pub fn ssh_program() -> PathBuf {
    non_empty_env(SSH_PROGRAM_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SSH_PROGRAM))
}

pub fn connect_timeout() -> Duration {
    non_empty_env(CONNECT_TIMEOUT_ENV)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_CONNECT_TIMEOUT)
}

pub fn log_file() -> Option<PathBuf> {
    non_empty_env(PROGRAM_LOG_FILE).map(PathBuf::from)
}

/// Worker threads used when listing several roots at once.
pub fn default_threads() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
