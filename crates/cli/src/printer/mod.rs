use std::{
    io::{self, Write},
    time::Duration,
};

use chrono::{DateTime, Local};
use statwire_protocol::{FileKind, FileRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with optional colors.
    #[default]
    Human,
    /// NDJSON (newline-delimited JSON) for machine consumption.
    Json,
}

/// Color handling strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorChoice {
    /// Automatically detect TTY and enable colors if appropriate.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

/// Configuration for printing listings.
#[derive(Debug, Clone)]
pub struct PrinterConfig {
    pub format: OutputFormat,
    pub color: ColorChoice,
    /// Whether to print a summary line per root.
    pub show_summary: bool,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: ColorChoice::Auto,
            show_summary: true,
        }
    }
}

/// Totals for one listed root, printed after its records.
#[derive(Debug)]
pub struct ListingContext<'a> {
    pub root: &'a str,
    /// Host label, if the records came from a shell rather than a capture.
    pub host: Option<&'a str>,
    pub records: usize,
    pub directories: usize,
    pub symlinks: usize,
    pub elapsed: Option<Duration>,
}

/// Trait for printing decoded records.
pub trait RecordPrinter {
    /// Called for each record; `root` is the root it was listed under.
    fn print_record(&mut self, root: &str, record: &FileRecord) -> io::Result<()>;

    /// Called once per root after its last record.
    fn finish(&mut self, ctx: &ListingContext<'_>) -> io::Result<()>;
}

/// Single-character entry type, `ls -l` style.
fn kind_char(kind: FileKind) -> char {
    match kind {
        FileKind::Directory => 'd',
        FileKind::Symlink => 'l',
        FileKind::Regular => '-',
        FileKind::Other => '?',
    }
}

/// Local time for `secs` since the epoch, or the raw number if it is out of
/// range.
pub fn format_mtime(secs: i64) -> String {
    match DateTime::from_timestamp(secs, 0) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => secs.to_string(),
    }
}

/// Human-readable printer with optional color support.
pub struct HumanPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
    use_color: bool,
}

impl<W: Write, E: Write> HumanPrinter<W, E> {
    /// `ColorChoice::Auto` means no color here, since a generic writer can't
    /// be checked for a terminal.
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        let use_color = cfg.color == ColorChoice::Always;

        Self {
            out,
            err,
            cfg,
            use_color,
        }
    }

    /// Create a printer that writes to stdout and stderr with TTY detection.
    pub fn stdout(cfg: PrinterConfig) -> HumanPrinter<io::Stdout, io::Stderr> {
        use std::io::IsTerminal;

        let use_color = match cfg.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => io::stdout().is_terminal(),
        };

        HumanPrinter {
            out: io::stdout(),
            err: io::stderr(),
            cfg,
            use_color,
        }
    }

    #[inline]
    fn format_path(&self, path: &str, kind: FileKind) -> String {
        if !self.use_color {
            return path.to_owned();
        }
        match kind {
            FileKind::Directory => format!("\x1b[34m{path}\x1b[0m"),
            FileKind::Symlink => format!("\x1b[36m{path}\x1b[0m"),
            _ => path.to_owned(),
        }
    }
}

impl<W: Write, E: Write> RecordPrinter for HumanPrinter<W, E> {
    fn print_record(&mut self, root: &str, record: &FileRecord) -> io::Result<()> {
        let kind = record.kind();
        let path = self.format_path(&format!("{root}{}", record.name), kind);
        writeln!(
            self.out,
            "{}{:04o} {:>5}:{:<5} {:>12} {} {}",
            kind_char(kind),
            record.remote_mode,
            record.remote_owner_id,
            record.remote_group_id,
            record.size,
            format_mtime(record.modified_at),
            path,
        )
    }

    fn finish(&mut self, ctx: &ListingContext<'_>) -> io::Result<()> {
        if !self.cfg.show_summary {
            return Ok(());
        }

        let host = ctx.host.map(|h| format!(" on {h}")).unwrap_or_default();
        let timing = ctx
            .elapsed
            .map(|d| format!(" in {:.2}ms", d.as_secs_f64() * 1000.0))
            .unwrap_or_default();

        writeln!(
            self.err,
            "[list] {}{host}: {} entries ({} dirs, {} symlinks){timing}",
            ctx.root, ctx.records, ctx.directories, ctx.symlinks,
        )
    }
}

pub struct JsonPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
}

impl<W: Write, E: Write> JsonPrinter<W, E> {
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        Self { out, err, cfg }
    }

    /// Create a printer that writes to stdout and stderr.
    pub fn stdout(cfg: PrinterConfig) -> JsonPrinter<io::Stdout, io::Stderr> {
        JsonPrinter {
            out: io::stdout(),
            err: io::stderr(),
            cfg,
        }
    }
}

impl<W: Write, E: Write> RecordPrinter for JsonPrinter<W, E> {
    fn print_record(&mut self, root: &str, record: &FileRecord) -> io::Result<()> {
        let mut obj = serde_json::to_value(record).map_err(io::Error::other)?;
        if let Some(map) = obj.as_object_mut() {
            map.insert("root".to_owned(), root.into());
        }
        writeln!(self.out, "{obj}")
    }

    fn finish(&mut self, ctx: &ListingContext<'_>) -> io::Result<()> {
        if !self.cfg.show_summary {
            return Ok(());
        }

        let obj = serde_json::json!({
            "type": "summary",
            "root": ctx.root,
            "host": ctx.host,
            "records": ctx.records,
            "directories": ctx.directories,
            "symlinks": ctx.symlinks,
            "elapsed_ms": ctx.elapsed.map(|d| d.as_secs_f64() * 1000.0),
        });
        writeln!(self.err, "{obj}")
    }
}

#[cfg(test)]
#[path = "printer_tests.rs"]
mod tests;
