//! Shells that can run a listing command and hand back its standard output.

mod local;
mod output;
mod ssh;

use anyhow::Result;

pub use local::LocalShell;
pub use output::RemoteOutput;
pub use ssh::SshShell;

/// Something that executes an arbitrary command string on a (possibly
/// remote) host and streams its standard output back.
pub trait RemoteShell: Send + Sync {
    /// Human readable name of the host, used in logs and errors.
    fn label(&self) -> String;

    fn exec(&self, command: &str) -> Result<RemoteOutput>;
}

impl<T: RemoteShell + ?Sized> RemoteShell for &T {
    fn label(&self) -> String {
        (**self).label()
    }

    fn exec(&self, command: &str) -> Result<RemoteOutput> {
        (**self).exec(command)
    }
}

impl<T: RemoteShell + ?Sized> RemoteShell for Box<T> {
    fn label(&self) -> String {
        (**self).label()
    }

    fn exec(&self, command: &str) -> Result<RemoteOutput> {
        (**self).exec(command)
    }
}
