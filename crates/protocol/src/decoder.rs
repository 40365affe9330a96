use std::io::{self, BufRead, Read};

use log::{debug, warn};

use crate::{
    error::{Field, ListingError},
    mode::{RawMode, parse_permissions},
    record::{FileRecord, ListingRequest},
    sentinel::{END_SENTINEL, ERROR_SENTINEL, FIELD_DELIMITER, MAX_LINE_LEN, PATH_DELIMITER},
};

/// How a listing stream ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Terminal {
    /// `END_SENTINEL` arrived: the traversal completed.
    EndOfStream,
    /// `ERROR_SENTINEL` arrived: the remote traversal failed.
    RemoteError,
    /// The stream ended (or broke off mid-line) without a sentinel.
    ClosedWithoutSentinel,
}

/// Decode one entry line.
///
/// Line format:
///   - `PATH///size,mtime,mode-hex,perm-octal,uid,gid`
///
/// Returns `Ok(None)` for the root entry itself, whose path is not longer
/// than `root`. The name is `PATH` with the first `root.len()` bytes cut off.
pub fn decode_line(line: &str, root: &str) -> Result<Option<FileRecord>, ListingError> {
    let mut parts = line.split(PATH_DELIMITER);
    let (Some(path), Some(meta), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ListingError::malformed(line));
    };

    if path.len() <= root.len() {
        return Ok(None);
    }

    let name = path
        .get(root.len()..)
        .ok_or_else(|| ListingError::malformed(line))?;

    let fields: Vec<&str> = meta.split(FIELD_DELIMITER).collect();
    let &[size, mtime, mode, perms, uid, gid] = fields.as_slice() else {
        return Err(ListingError::malformed(line));
    };

    let size = size
        .parse::<u64>()
        .map_err(|e| ListingError::field(Field::Size, line, e))?;
    let modified_at = mtime
        .parse::<i64>()
        .map_err(|e| ListingError::field(Field::ModifiedAt, line, e))?;
    let raw_mode =
        RawMode::from_hex(mode).map_err(|e| ListingError::field(Field::RawMode, line, e))?;
    let remote_mode =
        parse_permissions(perms).map_err(|e| ListingError::field(Field::Permissions, line, e))?;
    let remote_owner_id = uid
        .parse::<u32>()
        .map_err(|e| ListingError::field(Field::OwnerId, line, e))?;
    let remote_group_id = gid
        .parse::<u32>()
        .map_err(|e| ListingError::field(Field::GroupId, line, e))?;

    Ok(Some(FileRecord {
        name: name.to_owned(),
        size,
        modified_at,
        is_directory: raw_mode.is_directory(),
        is_symbolic_link: raw_mode.is_symbolic_link(),
        remote_mode,
        remote_owner_id,
        remote_group_id,
        raw_mode,
    }))
}

/// Lazy decoder over the output of a command built by `find_command`.
///
/// Lines are read and decoded strictly in arrival order. Iteration stops
/// after the end sentinel, or after yielding exactly one error. Dropping a
/// `Listing` early is not an error.
pub struct Listing<R> {
    reader: R,
    root: String,
    buf: Vec<u8>,
    terminal: Option<Terminal>,
    done: bool,
    records: usize,
}

impl<R: BufRead> Listing<R> {
    pub fn new(reader: R, root: impl Into<String>) -> Self {
        Self {
            reader,
            root: root.into(),
            buf: Vec::new(),
            terminal: None,
            done: false,
            records: 0,
        }
    }

    /// `None` while the stream is still being read, or after a decode or
    /// I/O error cut it short.
    pub fn terminal(&self) -> Option<Terminal> {
        self.terminal
    }

    /// Number of records yielded so far.
    pub fn records(&self) -> usize {
        self.records
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn finish(&mut self, terminal: Terminal) {
        self.done = true;
        self.terminal = Some(terminal);
        match terminal {
            Terminal::EndOfStream => {
                debug!("[listing] {}: {} records", self.root, self.records)
            }
            Terminal::RemoteError => warn!(
                "[listing] {}: remote traversal failed after {} records",
                self.root, self.records
            ),
            Terminal::ClosedWithoutSentinel => warn!(
                "[listing] {}: stream closed without sentinel after {} records",
                self.root, self.records
            ),
        }
    }

    fn fail(&mut self, err: ListingError) -> Option<Result<FileRecord, ListingError>> {
        self.done = true;
        debug!("[listing] {}: {err}", self.root);
        Some(Err(err))
    }

    /// Read the next raw line into `buf` without its line ending, reading at
    /// most `MAX_LINE_LEN` bytes before the newline.
    fn read_line(&mut self) -> io::Result<RawLine> {
        self.buf.clear();
        let cap = MAX_LINE_LEN as u64 + 1;
        let n = (&mut self.reader).take(cap).read_until(b'\n', &mut self.buf)?;
        if n == 0 {
            return Ok(RawLine::Eof);
        }

        if self.buf.last() != Some(&b'\n') {
            if self.buf.len() as u64 == cap {
                return Ok(RawLine::TooLong);
            }
            return Ok(RawLine::Unterminated);
        }

        self.buf.pop();
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }
        Ok(RawLine::Line)
    }
}

enum RawLine {
    Line,
    /// Bytes followed by EOF instead of a newline.
    Unterminated,
    TooLong,
    Eof,
}

impl<R: BufRead> Iterator for Listing<R> {
    type Item = Result<FileRecord, ListingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let terminated = match self.read_line() {
                Ok(RawLine::Line) => true,
                Ok(RawLine::Unterminated) => false,
                Ok(RawLine::TooLong) => {
                    let head = String::from_utf8_lossy(&self.buf[..80]);
                    return self.fail(ListingError::MalformedLine {
                        line: format!("{head}... (longer than {MAX_LINE_LEN} bytes)"),
                    });
                }
                Ok(RawLine::Eof) => {
                    self.finish(Terminal::ClosedWithoutSentinel);
                    return Some(Err(ListingError::StreamClosed));
                }
                Err(e) => return self.fail(ListingError::Io(e)),
            };

            let line = match std::str::from_utf8(&self.buf) {
                Ok(line) => line,
                Err(_) => {
                    let lossy = String::from_utf8_lossy(&self.buf).into_owned();
                    return self.fail(ListingError::MalformedLine { line: lossy });
                }
            };

            if line == END_SENTINEL {
                self.finish(Terminal::EndOfStream);
                return None;
            }
            if line == ERROR_SENTINEL {
                self.finish(Terminal::RemoteError);
                return Some(Err(ListingError::RemoteTraversal));
            }
            // Entry lines always end in a newline; a bare tail is a cut-off stream.
            if !terminated {
                self.finish(Terminal::ClosedWithoutSentinel);
                return Some(Err(ListingError::StreamClosed));
            }

            match decode_line(line, &self.root) {
                Ok(Some(record)) => {
                    self.records += 1;
                    return Some(Ok(record));
                }
                Ok(None) => continue,
                Err(e) => return self.fail(e),
            }
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for Listing<R> {}

impl ListingRequest {
    /// Decode the output of `self.command()`.
    pub fn decode<R: BufRead>(&self, reader: R) -> Listing<R> {
        Listing::new(reader, self.root())
    }
}

/// Decode a fully buffered listing output.
pub fn decode_listing(output: &str, root: &str) -> Result<Vec<FileRecord>, ListingError> {
    Listing::new(output.as_bytes(), root).collect()
}

#[cfg(test)]
#[path = "decoder_tests.rs"]
mod tests;
