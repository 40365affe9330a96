use std::{path::PathBuf, process::Command};

use anyhow::Result;
use statwire_runtime::LOCAL_SHELL;

use crate::{RemoteShell, output::RemoteOutput};

/// Runs commands with the local POSIX shell (`sh -c`).
#[derive(Debug, Clone)]
pub struct LocalShell {
    shell: PathBuf,
}

impl LocalShell {
    pub fn new() -> Self {
        Self {
            shell: PathBuf::from(LOCAL_SHELL),
        }
    }

    pub fn with_shell(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    fn command(&self, command: &str) -> Command {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c").arg(command);
        cmd
    }
}

impl Default for LocalShell {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteShell for LocalShell {
    fn label(&self) -> String {
        "localhost".to_owned()
    }

    fn exec(&self, command: &str) -> Result<RemoteOutput> {
        RemoteOutput::spawn(self.command(command), self.label())
    }
}
