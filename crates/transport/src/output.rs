use std::{
    io::{self, BufRead, BufReader, Read},
    process::{Child, ChildStderr, ChildStdout, Command, ExitStatus, Stdio},
    thread::{self, JoinHandle},
};

use anyhow::{Context, Result, anyhow};
use log::{debug, warn};

/// Standard output of a command running on a shell.
///
/// Owns the child process. Dropping a `RemoteOutput` before the command
/// finished kills and reaps the child, so abandoning a listing releases the
/// connection.
pub struct RemoteOutput {
    label: String,
    stdout: BufReader<ChildStdout>,
    child: Option<Child>,
    stderr_drain: Option<JoinHandle<()>>,
}

impl RemoteOutput {
    /// Spawn `cmd` with stdout piped for reading. Stderr is forwarded to
    /// the log, one `warn!` per line.
    pub fn spawn(mut cmd: Command, label: impl Into<String>) -> Result<Self> {
        let label = label.into();

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!("[shell] {label}: spawning {:?}", cmd.get_program());

        let mut child = cmd
            .spawn()
            .with_context(|| format!("Failed to spawn {:?} for {label}", cmd.get_program()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("stdout of {label} was not captured"))?;

        let stderr_drain = child
            .stderr
            .take()
            .map(|stderr| spawn_stderr_drain(stderr, label.clone()));

        Ok(Self {
            label,
            stdout: BufReader::new(stdout),
            child: Some(child),
            stderr_drain,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Wait for the command to exit. Call after the stdout side has been
    /// consumed; waiting earlier can block on a full pipe.
    pub fn wait(&mut self) -> io::Result<ExitStatus> {
        let status = match self.child.as_mut() {
            Some(child) => child.wait()?,
            None => {
                return Err(io::Error::other(format!(
                    "{} has already been waited for",
                    self.label
                )));
            }
        };

        self.child = None;
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }

        debug!("[shell] {}: exited with {status}", self.label);
        Ok(status)
    }
}

fn spawn_stderr_drain(stderr: ChildStderr, label: String) -> JoinHandle<()> {
    thread::spawn(move || {
        for line in BufReader::new(stderr).lines() {
            match line {
                Ok(line) if line.trim().is_empty() => {}
                Ok(line) => warn!("[shell] {label}: {line}"),
                Err(_) => break,
            }
        }
    })
}

impl Read for RemoteOutput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stdout.read(buf)
    }
}

impl BufRead for RemoteOutput {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.stdout.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.stdout.consume(amt)
    }
}

impl Drop for RemoteOutput {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Ok(None) = child.try_wait() {
                debug!("[shell] {}: killing unfinished command", self.label);
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
