mod config;
pub mod logging;

pub use config::{
    BATCH_SIZE, CONNECT_TIMEOUT_ENV, DEFAULT_SSH_PORT, LOCAL_SHELL, PROGRAM_LOG_FILE,
    PROGRAM_LOG_LEVEL, PROGRAM_NAME, SSH_PROGRAM_ENV, connect_timeout, default_threads,
    log_file, ssh_program,
};

pub use logging::init;
