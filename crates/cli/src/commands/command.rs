use std::process::ExitCode;

use clap::Args;
use statwire_protocol::ListingRequest;

#[derive(Debug, Args)]
pub struct CommandArgs {
    /// Root directory the command lists
    pub root: String,
}

pub fn run(args: CommandArgs) -> ExitCode {
    println!("{}", ListingRequest::new(args.root).command());
    ExitCode::SUCCESS
}
