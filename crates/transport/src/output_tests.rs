use super::*;
use crate::{LocalShell, RemoteShell};
use std::time::{Duration, Instant};

#[test]
fn local_shell_streams_stdout() {
    let mut out = LocalShell::new()
        .exec("printf 'one\\ntwo\\n'")
        .expect("spawn sh");

    let lines: Vec<String> = (&mut out).lines().map(|l| l.expect("read line")).collect();
    assert_eq!(lines, ["one", "two"]);
    assert!(out.wait().expect("wait").success());
}

#[test]
fn wait_reports_exit_status() {
    let mut out = LocalShell::new().exec("exit 3").expect("spawn sh");
    let mut buf = String::new();
    out.read_to_string(&mut buf).expect("read");
    assert!(buf.is_empty());

    let status = out.wait().expect("wait");
    assert_eq!(status.code(), Some(3));
    assert!(out.wait().is_err(), "second wait should fail");
}

#[test]
fn stderr_does_not_reach_stdout() {
    let mut out = LocalShell::new()
        .exec("echo visible; echo hidden >&2")
        .expect("spawn sh");

    let mut buf = String::new();
    out.read_to_string(&mut buf).expect("read");
    assert_eq!(buf, "visible\n");
    out.wait().expect("wait");
}

#[test]
fn drop_kills_unfinished_command() {
    let mut out = LocalShell::new()
        .exec("echo started; exec sleep 30")
        .expect("spawn sh");

    let mut first = String::new();
    out.read_line(&mut first).expect("read first line");
    assert_eq!(first, "started\n");

    let start = Instant::now();
    drop(out);
    assert!(
        start.elapsed() < Duration::from_secs(10),
        "dropping the output should not wait for the command to finish"
    );
}

#[test]
fn spawn_failure_names_program() {
    let err = LocalShell::with_shell("/nonexistent/statwire-sh")
        .exec("true")
        .err()
        .expect("spawn should fail");
    assert!(format!("{err:#}").contains("statwire-sh"));
}

#[test]
fn label_is_kept() {
    let mut out = LocalShell::new().exec("true").expect("spawn sh");
    assert_eq!(out.label(), "localhost");
    out.wait().expect("wait");
}
