use super::*;
use statwire_protocol::RawMode;

fn record(name: &str, raw: u32, size: u64) -> FileRecord {
    let raw_mode = RawMode::new(raw);
    FileRecord {
        name: name.to_owned(),
        size,
        modified_at: 1_690_000_000,
        is_directory: raw_mode.is_directory(),
        is_symbolic_link: raw_mode.is_symbolic_link(),
        remote_mode: raw_mode.permissions(),
        remote_owner_id: 1000,
        remote_group_id: 50,
        raw_mode,
    }
}

fn cfg(format: OutputFormat, color: ColorChoice) -> PrinterConfig {
    PrinterConfig {
        format,
        color,
        show_summary: true,
    }
}

fn ctx<'a>(root: &'a str) -> ListingContext<'a> {
    ListingContext {
        root,
        host: Some("build01"),
        records: 3,
        directories: 1,
        symlinks: 1,
        elapsed: None,
    }
}

fn text(buf: Vec<u8>) -> String {
    String::from_utf8(buf).expect("utf-8 output")
}

#[test]
fn human_rows_show_kind_permissions_owner_and_path() {
    let mut out = Vec::new();
    let mut err = Vec::new();
    {
        let mut p = HumanPrinter::new(&mut out, &mut err, cfg(OutputFormat::Human, ColorChoice::Never));
        p.print_record("/data", &record("/a.txt", 0o100644, 12)).unwrap();
        p.print_record("/data", &record("/sub", 0o040755, 4096)).unwrap();
        p.print_record("/data", &record("/link", 0o120777, 5)).unwrap();
        p.print_record("/data", &record("/fifo", 0o010600, 0)).unwrap();
    }

    let out = text(out);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);

    let cases = [
        ("-0644", "/data/a.txt", "12"),
        ("d0755", "/data/sub", "4096"),
        ("l0777", "/data/link", "5"),
        ("?0600", "/data/fifo", "0"),
    ];
    for (line, (prefix, path, size)) in lines.iter().zip(cases) {
        assert!(line.starts_with(prefix), "{line:?} should start with {prefix:?}");
        assert!(line.ends_with(path), "{line:?} should end with {path:?}");
        assert!(line.contains(" 1000:50 "), "{line:?} should show owner");
        assert!(line.split_whitespace().any(|w| w == size), "{line:?} should show size {size}");
        assert!(line.contains(&format_mtime(1_690_000_000)), "{line:?} should show mtime");
    }
    assert!(err.is_empty());
}

#[test]
fn human_colors_only_when_forced() {
    let mut plain = Vec::new();
    HumanPrinter::new(&mut plain, Vec::new(), cfg(OutputFormat::Human, ColorChoice::Auto))
        .print_record("/d", &record("/sub", 0o040755, 0))
        .unwrap();
    assert!(!text(plain).contains('\x1b'));

    let mut colored = Vec::new();
    HumanPrinter::new(&mut colored, Vec::new(), cfg(OutputFormat::Human, ColorChoice::Always))
        .print_record("/d", &record("/sub", 0o040755, 0))
        .unwrap();
    assert!(text(colored).contains("\x1b[34m/d/sub\x1b[0m"));
}

#[test]
fn human_summary_goes_to_stderr() {
    let mut out = Vec::new();
    let mut err = Vec::new();
    HumanPrinter::new(&mut out, &mut err, cfg(OutputFormat::Human, ColorChoice::Never))
        .finish(&ctx("/data"))
        .unwrap();

    assert!(out.is_empty());
    assert_eq!(
        text(err),
        "[list] /data on build01: 3 entries (1 dirs, 1 symlinks)\n"
    );
}

#[test]
fn summary_can_be_suppressed() {
    let quiet = PrinterConfig {
        show_summary: false,
        ..PrinterConfig::default()
    };

    let mut err = Vec::new();
    HumanPrinter::new(Vec::new(), &mut err, quiet.clone())
        .finish(&ctx("/data"))
        .unwrap();
    JsonPrinter::new(Vec::new(), &mut err, quiet)
        .finish(&ctx("/data"))
        .unwrap();
    assert!(err.is_empty());
}

#[test]
fn json_rows_are_ndjson_records_with_root() {
    let mut out = Vec::new();
    {
        let mut p = JsonPrinter::new(&mut out, Vec::new(), cfg(OutputFormat::Json, ColorChoice::Never));
        p.print_record("/data", &record("/a.txt", 0o100644, 12)).unwrap();
        p.print_record("/data", &record("/link", 0o120777, 5)).unwrap();
    }

    let out = text(out);
    let rows: Vec<serde_json::Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).expect("valid json line"))
        .collect();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["root"], "/data");
    assert_eq!(rows[0]["name"], "/a.txt");
    assert_eq!(rows[0]["size"], 12);
    assert_eq!(rows[0]["remote_mode"], 0o644);
    assert_eq!(rows[0]["raw_mode"], 0o100644);
    assert_eq!(rows[1]["is_symbolic_link"], true);
    assert_eq!(rows[1]["is_directory"], false);
}

#[test]
fn json_summary_is_tagged() {
    let mut err = Vec::new();
    JsonPrinter::new(Vec::new(), &mut err, cfg(OutputFormat::Json, ColorChoice::Never))
        .finish(&ctx("/data"))
        .unwrap();

    let obj: serde_json::Value = serde_json::from_str(text(err).trim()).expect("valid json");
    assert_eq!(obj["type"], "summary");
    assert_eq!(obj["host"], "build01");
    assert_eq!(obj["records"], 3);
    assert!(obj["elapsed_ms"].is_null());
}

#[test]
fn mtime_out_of_range_falls_back_to_seconds() {
    assert_eq!(format_mtime(i64::MAX), i64::MAX.to_string());
    assert_eq!(format_mtime(0).len(), "1970-01-01 00:00:00".len());
}
