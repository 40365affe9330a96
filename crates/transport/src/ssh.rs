use std::{ffi::OsString, path::PathBuf, process::Command, time::Duration};

use anyhow::{Result, anyhow, bail};
use statwire_runtime::{DEFAULT_SSH_PORT, connect_timeout, ssh_program};

use crate::{RemoteShell, output::RemoteOutput};

/// Runs commands on a remote host through the system `ssh` client.
///
/// Authentication is left to ssh (agent, keys, `~/.ssh/config`); the client
/// runs with `BatchMode=yes` so it never blocks on a password prompt.
#[derive(Debug, Clone)]
pub struct SshShell {
    destination: String,
    port: Option<u16>,
    identity: Option<PathBuf>,
    program: PathBuf,
    connect_timeout: Duration,
    options: Vec<String>,
}

impl SshShell {
    /// `destination` is `host` or `user@host`.
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            port: None,
            identity: None,
            program: ssh_program(),
            connect_timeout: connect_timeout(),
            options: Vec::new(),
        }
    }

    /// Parse `[user@]host[:port]`. An IPv6 host with a port is written in
    /// brackets, `[user@][::1]:2222`; a bare IPv6 address takes no port.
    pub fn parse(target: &str) -> Result<Self> {
        let target = target.trim();
        if target.is_empty() {
            bail!("empty ssh destination");
        }

        let (destination, port) = if target.contains('[') {
            split_bracketed(target)?
        } else {
            match target.rsplit_once(':') {
                Some((host, port)) if !host.is_empty() && !host.contains(':') => {
                    (host.to_owned(), Some(parse_port(port, target)?))
                }
                _ => (target.to_owned(), None),
            }
        };

        if destination.is_empty() || destination.ends_with('@') {
            bail!("missing host in ssh destination: {target}");
        }

        let mut shell = Self::new(destination);
        shell.port = port;
        Ok(shell)
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_identity(mut self, identity: impl Into<PathBuf>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Extra `-o key=value` option passed to ssh.
    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_SSH_PORT)
    }

    /// Arguments passed to the ssh binary for `command`.
    pub fn args(&self, command: &str) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-o".into(),
            "BatchMode=yes".into(),
            "-o".into(),
            format!("ConnectTimeout={}", self.connect_timeout.as_secs().max(1)).into(),
        ];

        for option in &self.options {
            args.push("-o".into());
            args.push(option.into());
        }

        if let Some(port) = self.port {
            args.push("-p".into());
            args.push(port.to_string().into());
        }

        if let Some(identity) = &self.identity {
            args.push("-i".into());
            args.push(identity.clone().into_os_string());
        }

        args.push("--".into());
        args.push(self.destination.clone().into());
        args.push(command.into());
        args
    }
}

fn parse_port(port: &str, target: &str) -> Result<u16> {
    port.parse()
        .map_err(|_| anyhow!("invalid port in ssh destination: {target}"))
}

/// Split `[user@][host]` or `[user@][host]:port`. The brackets are dropped,
/// ssh takes a bare IPv6 address as the host.
fn split_bracketed(target: &str) -> Result<(String, Option<u16>)> {
    let (user, rest) = match target.split_once('[') {
        Some((user, rest)) if user.is_empty() || user.ends_with('@') => (user, rest),
        _ => bail!("unexpected '[' in ssh destination: {target}"),
    };
    let Some((host, tail)) = rest.split_once(']') else {
        bail!("unclosed '[' in ssh destination: {target}");
    };
    if host.is_empty() {
        bail!("missing host in ssh destination: {target}");
    }

    let port = match tail {
        "" => None,
        _ => match tail.strip_prefix(':') {
            Some(port) => Some(parse_port(port, target)?),
            None => bail!("unexpected text after ']' in ssh destination: {target}"),
        },
    };

    Ok((format!("{user}{host}"), port))
}

impl RemoteShell for SshShell {
    fn label(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{port}", self.destination),
            None => self.destination.clone(),
        }
    }

    fn exec(&self, command: &str) -> Result<RemoteOutput> {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args(command));
        RemoteOutput::spawn(cmd, self.label())
    }
}

#[cfg(test)]
#[path = "ssh_tests.rs"]
mod tests;
