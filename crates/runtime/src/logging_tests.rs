use super::*;
use log::{Level, Metadata, Record};
use serial_test::serial;

#[test]
#[serial]
fn get_level_from_env_parses_cases() {
    let cases: &[(Option<&str>, Level)] = &[
        (None, Level::Warn),
        (Some("debug"), Level::Debug),
        (Some("DEBUG"), Level::Debug),
        (Some("info"), Level::Info),
        (Some("warn"), Level::Warn),
        (Some("error"), Level::Error),
        (Some("trace"), Level::Trace),
        (Some("garbage"), Level::Warn),
        (Some("off"), Level::Warn),
    ];

    for (value, expected) in cases {
        match value {
            Some(v) => unsafe { std::env::set_var(PROGRAM_LOG_LEVEL, v) },
            None => unsafe { std::env::remove_var(PROGRAM_LOG_LEVEL) },
        }

        let lvl = get_level_from_env();
        assert_eq!(
            lvl, *expected,
            "env {:?} should yield level {:?}, got {:?}",
            value, expected, lvl
        );
    }

    unsafe { std::env::remove_var(PROGRAM_LOG_LEVEL) };
}

#[test]
fn enabled_respects_level_threshold() {
    let levels = [
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
        Level::Trace,
    ];

    for logger_level in levels {
        let logger = Logger {
            level: logger_level,
            target: LogTarget::Stderr,
        };

        for record_level in levels {
            let meta = Metadata::builder()
                .level(record_level)
                .target("statwire_protocol::decoder")
                .build();

            assert_eq!(
                logger.enabled(&meta),
                record_level <= logger_level,
                "logger level {:?}, record level {:?}",
                logger_level,
                record_level
            );
        }
    }
}

#[test]
fn file_logger_writes_enabled_records_only() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("statwire.log");

    let logger = Logger {
        level: Level::Info,
        target: LogTarget::File(Mutex::new(open_log_file(&path).expect("open log"))),
    };

    let cases = [
        (Level::Debug, "hidden"),
        (Level::Info, "stream opened"),
        (Level::Error, "remote traversal failed"),
    ];
    for (lvl, msg) in &cases {
        let args = format_args!("{msg}");
        let record = Record::builder()
            .level(*lvl)
            .target("listing")
            .args(args)
            .build();
        logger.log(&record);
    }
    logger.flush();

    let text = std::fs::read_to_string(&path).expect("read log");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2, "log contents: {text:?}");
    assert!(lines[0].ends_with("INFO [listing] stream opened"));
    assert!(lines[1].ends_with("ERROR [listing] remote traversal failed"));
    assert!(!text.contains("hidden"));
}

#[test]
fn open_log_file_appends() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("append.log");
    std::fs::write(&path, "existing\n").expect("seed log");

    {
        let mut f = open_log_file(&path).expect("open log");
        writeln!(f, "next").expect("write");
    }

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing\nnext\n");
}

#[test]
fn stderr_logger_does_not_panic() {
    let logger = Logger {
        level: Level::Info,
        target: LogTarget::Stderr,
    };

    let args = format_args!("listing /data");
    let record = Record::builder()
        .level(Level::Info)
        .target("t")
        .args(args)
        .build();
    logger.log(&record);
    logger.flush();
}
