use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Error, Result, anyhow};
use crossbeam::channel::{self, Sender};
use log::{debug, info, warn};
use statwire_protocol::{FileRecord, ListingError, ListingRequest, Terminal};
use statwire_runtime::BATCH_SIZE;
use statwire_transport::RemoteShell;

/// Records decoded from one root, in arrival order.
#[derive(Debug)]
pub struct Batch {
    pub root: Arc<str>,
    pub records: Vec<FileRecord>,
}

/// Outcome of one finished listing.
#[derive(Debug, Clone)]
pub struct Summary {
    pub root: String,
    pub host: String,
    pub records: usize,
    pub directories: usize,
    pub symlinks: usize,
    pub elapsed: Duration,
    /// The consumer went away before the end sentinel; not an error.
    pub cancelled: bool,
}

impl Summary {
    fn new(root: &str, host: String) -> Self {
        Self {
            root: root.to_owned(),
            host,
            records: 0,
            directories: 0,
            symlinks: 0,
            elapsed: Duration::ZERO,
            cancelled: false,
        }
    }

    fn count(&mut self, record: &FileRecord) {
        self.records += 1;
        if record.is_directory {
            self.directories += 1;
        }
        if record.is_symbolic_link {
            self.symlinks += 1;
        }
    }
}

/// True when `err` (or anything it wraps) is the remote traversal failure.
pub fn is_remote_traversal(err: &Error) -> bool {
    matches!(
        err.downcast_ref::<ListingError>(),
        Some(ListingError::RemoteTraversal)
    )
}

/// List `root` on `shell` and stream the records in batches of
/// `BATCH_SIZE` to `tx` as they are decoded.
///
/// If the receiving side hangs up, reading stops, the command is killed and
/// the returned summary is marked `cancelled`.
pub fn stream_root<S>(shell: &S, root: &str, tx: &Sender<Batch>) -> Result<Summary>
where
    S: RemoteShell + ?Sized,
{
    let started = Instant::now();
    let host = shell.label();
    let request = ListingRequest::new(root);
    let root_name: Arc<str> = Arc::from(root);

    debug!("[lister] {host}: listing {root}");

    let output = shell
        .exec(&request.command())
        .with_context(|| format!("Failed to start listing of {root} on {host}"))?;

    let mut listing = request.decode(output);
    let mut summary = Summary::new(root, host);
    let mut batch = Vec::with_capacity(BATCH_SIZE);

    for item in listing.by_ref() {
        let record = item.map_err(|e| listing_error(e, &summary))?;
        summary.count(&record);
        batch.push(record);

        if batch.len() >= BATCH_SIZE {
            let records = std::mem::take(&mut batch);
            if tx
                .send(Batch {
                    root: Arc::clone(&root_name),
                    records,
                })
                .is_err()
            {
                summary.cancelled = true;
                break;
            }
        }
    }

    if !summary.cancelled
        && !batch.is_empty()
        && tx
            .send(Batch {
                root: Arc::clone(&root_name),
                records: batch,
            })
            .is_err()
    {
        summary.cancelled = true;
    }

    summary.elapsed = started.elapsed();

    if summary.cancelled {
        info!(
            "[lister] {}: listing of {} cancelled after {} records",
            summary.host, summary.root, summary.records
        );
        // Dropping the output kills the command.
        return Ok(summary);
    }

    if listing.terminal() == Some(Terminal::EndOfStream) {
        let mut output = listing.into_inner();
        match output.wait() {
            Ok(status) if !status.success() => warn!(
                "[lister] {}: listing of {} complete but command exited with {status}",
                summary.host, summary.root
            ),
            Ok(_) => {}
            Err(e) => warn!("[lister] {}: wait failed: {e}", summary.host),
        }
    }

    debug!(
        "[lister] {}: {} records under {} in {:?}",
        summary.host, summary.records, summary.root, summary.elapsed
    );
    Ok(summary)
}

fn listing_error(err: ListingError, summary: &Summary) -> Error {
    let context = match &err {
        ListingError::RemoteTraversal => format!(
            "Remote traversal of {} on {} failed after {} records",
            summary.root, summary.host, summary.records
        ),
        ListingError::StreamClosed => format!(
            "Connection to {} closed while listing {} ({} records received)",
            summary.host, summary.root, summary.records
        ),
        _ => format!(
            "Failed to decode listing of {} on {}",
            summary.root, summary.host
        ),
    };
    Error::new(err).context(context)
}

/// List `root` and collect every record.
pub fn list_root<S>(shell: &S, root: &str) -> Result<Vec<FileRecord>>
where
    S: RemoteShell + ?Sized,
{
    let (tx, rx) = channel::unbounded::<Batch>();
    stream_root(shell, root, &tx)?;
    drop(tx);

    Ok(rx.into_iter().flat_map(|b| b.records).collect())
}

/// List several independent roots concurrently.
///
/// Every root gets its own command, shell process and decoder; workers only
/// share the queue of roots still to list. Batches from different roots
/// interleave on `tx`. Returns one result per root, in input order.
///
/// Once one listing finds the receiver gone, the roots not yet started are
/// reported as cancelled without running anything on the shell.
pub fn list_parallel<S>(
    shell: &S,
    roots: Vec<String>,
    tx: Sender<Batch>,
    num_threads: usize,
) -> Vec<Result<Summary>>
where
    S: RemoteShell + ?Sized,
{
    let total = roots.len();
    let num_threads = num_threads.clamp(1, total.max(1));

    let (work_tx, work_rx) = channel::unbounded::<(usize, String)>();
    let (result_tx, result_rx) = channel::unbounded::<(usize, Result<Summary>)>();

    for job in roots.into_iter().enumerate() {
        let _ = work_tx.send(job);
    }
    drop(work_tx);

    let cancelled = AtomicBool::new(false);
    let host = shell.label();

    debug!("[lister] listing {total} roots with {num_threads} threads");

    thread::scope(|s| {
        for _ in 0..num_threads {
            let work_rx = work_rx.clone();
            let result_tx = result_tx.clone();
            let tx = tx.clone();
            let cancelled = &cancelled;
            let host = &host;

            s.spawn(move || {
                while let Ok((idx, root)) = work_rx.recv() {
                    let result = if cancelled.load(Ordering::Acquire) {
                        let mut summary = Summary::new(&root, host.clone());
                        summary.cancelled = true;
                        Ok(summary)
                    } else {
                        stream_root(shell, &root, &tx)
                    };
                    if matches!(&result, Ok(summary) if summary.cancelled) {
                        cancelled.store(true, Ordering::Release);
                    }
                    if result_tx.send((idx, result)).is_err() {
                        return;
                    }
                }
            });
        }
    });
    drop(result_tx);

    let mut results: Vec<Option<Result<Summary>>> = (0..total).map(|_| None).collect();
    for (idx, result) in result_rx {
        results[idx] = Some(result);
    }

    results
        .into_iter()
        .map(|r| r.unwrap_or_else(|| Err(anyhow!("listing worker exited without a result"))))
        .collect()
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
