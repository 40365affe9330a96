use std::{process::ExitCode, thread};

use anyhow::{Result, anyhow};
use clap::Args;
use crossbeam::channel;
use log::{debug, error};
use statwire_lister::{Batch, Summary, list_parallel};
use statwire_runtime::default_threads;

use super::{ConnectionOptions, OutputOptions, failure_code};
use crate::printer::{ListingContext, RecordPrinter};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Directories to list; each is created if missing
    #[arg(required = true, value_name = "ROOT")]
    pub roots: Vec<String>,

    /// Leave symbolic links out of the output
    #[arg(long)]
    pub skip_symlinks: bool,

    /// Number of roots listed at once
    #[arg(long, short = 'j')]
    pub threads: Option<usize>,

    #[command(flatten)]
    pub output: OutputOptions,
}

pub fn run(args: ListArgs, conn: &ConnectionOptions) -> ExitCode {
    match execute(args, conn) {
        Ok(code) => code,
        Err(e) => {
            error!("[error] {e:#}");
            eprintln!("[list] {e:#}");
            ExitCode::from(failure_code(&e))
        }
    }
}

fn execute(args: ListArgs, conn: &ConnectionOptions) -> Result<ExitCode> {
    let shell = conn.shell()?;
    let mut printer = args.output.make_printer();
    let threads = args.threads.unwrap_or_else(default_threads);
    let roots = args.roots;

    let (tx, rx) = channel::bounded::<Batch>(threads.max(1) * 4);

    let (results, print_error) = thread::scope(|s| {
        let shell = shell.as_ref();
        let worker = s.spawn(move || list_parallel(shell, roots, tx, threads));

        let print_error = print_batches(rx, printer.as_mut(), args.skip_symlinks);

        let results = worker
            .join()
            .map_err(|_| anyhow!("listing thread panicked"));
        (results, print_error)
    });
    let results = results?;

    Ok(ExitCode::from(report(results, printer.as_mut(), print_error)?))
}

/// Print per-root summaries and every listing failure, returning the exit
/// code. After a print error the summaries are skipped, failures are not.
fn report(
    results: Vec<Result<Summary>>,
    printer: &mut dyn RecordPrinter,
    print_error: Option<std::io::Error>,
) -> Result<u8> {
    if let Some(e) = &print_error {
        // Usually a closed pipe; remaining listings were cancelled.
        debug!("[list] stopped printing: {e}");
    }

    let mut worst = 0u8;
    for result in results {
        match result {
            Ok(summary) => {
                if print_error.is_none() {
                    printer.finish(&context(&summary))?;
                }
            }
            Err(e) => {
                error!("[error] {e:#}");
                eprintln!("[list] {e:#}");
                worst = worst.max(failure_code(&e));
            }
        }
    }

    Ok(worst)
}

/// Print until the channel closes. On the first write error the receiver is
/// dropped, which cancels the remaining listings.
fn print_batches(
    rx: channel::Receiver<Batch>,
    printer: &mut dyn RecordPrinter,
    skip_symlinks: bool,
) -> Option<std::io::Error> {
    for batch in rx {
        for record in &batch.records {
            if skip_symlinks && record.is_symbolic_link {
                continue;
            }
            if let Err(e) = printer.print_record(&batch.root, record) {
                return Some(e);
            }
        }
    }
    None
}

fn context(summary: &Summary) -> ListingContext<'_> {
    ListingContext {
        root: &summary.root,
        host: Some(summary.host.as_str()),
        records: summary.records,
        directories: summary.directories,
        symlinks: summary.symlinks,
        elapsed: Some(summary.elapsed),
    }
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
