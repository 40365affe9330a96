pub mod command;
pub mod decode;
pub mod list;

use std::{
    io::{Stderr, Stdout},
    path::PathBuf,
};

use anyhow::{Error, Result};
use clap::{Args, Subcommand};
use statwire_lister::is_remote_traversal;
use statwire_protocol::ListingError;
use statwire_transport::{LocalShell, RemoteShell, SshShell};

pub use command::CommandArgs;
pub use decode::DecodeArgs;
pub use list::ListArgs;

use crate::printer::{
    ColorChoice, HumanPrinter, JsonPrinter, OutputFormat, PrinterConfig, RecordPrinter,
};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every entry below one or more roots.
    ///
    /// Example:
    ///   statwire list /srv/data
    ///   statwire --host deploy@build01 list --json /srv/a /srv/b
    List(ListArgs),

    /// Print the shell command that lists ROOT, without running it.
    Command(CommandArgs),

    /// Decode captured listing output from a file or stdin.
    ///
    /// Example:
    ///   ssh build01 "$(statwire command /srv)" > out.txt; statwire decode /srv out.txt
    Decode(DecodeArgs),
}

/// Where listing commands run.
#[derive(Debug, Args)]
pub struct ConnectionOptions {
    /// Remote host as `[user@]host[:port]`; lists locally when omitted
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// SSH port, overriding any port given with --host
    #[arg(long, short = 'p', global = true)]
    pub port: Option<u16>,

    /// SSH identity file
    #[arg(long, short = 'i', global = true, value_name = "FILE")]
    pub identity: Option<PathBuf>,
}

impl ConnectionOptions {
    pub fn shell(&self) -> Result<Box<dyn RemoteShell>> {
        let Some(target) = self.host.as_deref() else {
            return Ok(Box::new(LocalShell::new()));
        };

        let mut ssh = SshShell::parse(target)?;
        if let Some(port) = self.port {
            ssh = ssh.with_port(port);
        }
        if let Some(identity) = &self.identity {
            ssh = ssh.with_identity(identity);
        }
        Ok(Box::new(ssh))
    }
}

#[derive(Debug, Args)]
pub struct OutputOptions {
    /// Output records as NDJSON (one JSON object per line)
    #[arg(long)]
    pub json: bool,

    /// When to use colors: auto, always, never
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: String,

    /// Suppress the per-root summary
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl OutputOptions {
    /// Create a printer based on the output options.
    pub fn make_printer(&self) -> Box<dyn RecordPrinter> {
        let format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        };

        let color = match self.color.as_str() {
            "always" => ColorChoice::Always,
            "never" => ColorChoice::Never,
            _ => ColorChoice::Auto,
        };

        let cfg = PrinterConfig {
            format,
            color,
            show_summary: !self.quiet,
        };

        match cfg.format {
            OutputFormat::Human => Box::new(HumanPrinter::<Stdout, Stderr>::stdout(cfg)),
            OutputFormat::Json => Box::new(JsonPrinter::<Stdout, Stderr>::stdout(cfg)),
        }
    }
}

/// 1 when the remote side reported a failed traversal, 2 for anything else.
pub fn failure_code(err: &Error) -> u8 {
    if is_remote_traversal(err) { 1 } else { 2 }
}

/// Same mapping for a bare decoder error.
pub fn listing_failure_code(err: &ListingError) -> u8 {
    match err {
        ListingError::RemoteTraversal => 1,
        _ => 2,
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
