use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Args;
use log::error;
use statwire_protocol::{Listing, ListingError};

use super::{OutputOptions, listing_failure_code};
use crate::printer::{ListingContext, RecordPrinter};

#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Root the captured listing was produced for
    pub root: String,

    /// File holding the captured output; stdin when omitted or `-`
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputOptions,
}

pub fn run(args: DecodeArgs) -> ExitCode {
    match execute(args) {
        Ok(code) => code,
        Err(e) => {
            error!("[error] {e:#}");
            eprintln!("[decode] {e:#}");
            ExitCode::from(2)
        }
    }
}

fn execute(args: DecodeArgs) -> Result<ExitCode> {
    let reader = open_input(args.file.as_deref())?;
    let mut printer = args.output.make_printer();

    match decode_into(reader, &args.root, printer.as_mut())? {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            error!("[error] {e}");
            eprintln!("[decode] {}", describe(&e));
            Ok(ExitCode::from(listing_failure_code(&e)))
        }
    }
}

fn open_input(file: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match file {
        None => Ok(Box::new(io::stdin().lock())),
        Some(p) if p.as_os_str() == "-" => Ok(Box::new(io::stdin().lock())),
        Some(p) => {
            let f = File::open(p).with_context(|| format!("Failed to open {}", p.display()))?;
            Ok(Box::new(BufReader::new(f)))
        }
    }
}

/// Decode `reader` and print each record. The outer result is a printing
/// failure, the inner one the listing's own outcome.
pub(crate) fn decode_into<R: BufRead>(
    reader: R,
    root: &str,
    printer: &mut dyn RecordPrinter,
) -> io::Result<Result<(), ListingError>> {
    let mut listing = Listing::new(reader, root);
    let mut directories = 0;
    let mut symlinks = 0;

    for item in listing.by_ref() {
        let record = match item {
            Ok(record) => record,
            Err(e) => return Ok(Err(e)),
        };
        directories += usize::from(record.is_directory);
        symlinks += usize::from(record.is_symbolic_link);
        printer.print_record(root, &record)?;
    }

    printer.finish(&ListingContext {
        root,
        host: None,
        records: listing.records(),
        directories,
        symlinks,
        elapsed: None,
    })?;
    Ok(Ok(()))
}

fn describe(err: &ListingError) -> String {
    let mut msg = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}

#[cfg(test)]
#[path = "decode_tests.rs"]
mod tests;
