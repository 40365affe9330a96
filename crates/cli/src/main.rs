use std::process::ExitCode;

use clap::Parser;

mod commands;
mod printer;

use commands::{Command, ConnectionOptions};
use statwire_runtime::{PROGRAM_NAME, logging};

#[derive(Debug, Parser)]
#[command(
    name = PROGRAM_NAME,
    version,
    about = "List file metadata on remote hosts over a plain shell",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionOptions,

    #[command(subcommand)]
    pub command: Command,
}

fn main() -> ExitCode {
    logging::init().ok();

    let cli = Cli::parse();
    match cli.command {
        Command::List(args) => commands::list::run(args, &cli.connection),
        Command::Command(args) => commands::command::run(args),
        Command::Decode(args) => commands::decode::run(args),
    }
}
