/// Written (without a trailing newline) once the whole traversal succeeded.
pub const END_SENTINEL: &str = "@@statwire:end-of-listing@@";

/// Written (with a trailing newline) when `find` or `stat` exited non-zero.
pub const ERROR_SENTINEL: &str = "@@statwire:listing-failed@@";

/// Separates the path from the metadata fields on every entry line.
pub const PATH_DELIMITER: &str = "///";

/// Separates the metadata fields from one another.
pub const FIELD_DELIMITER: char = ',';

/// Number of comma separated metadata fields per entry line.
pub const FIELD_COUNT: usize = 6;

/// `stat -c` format producing one entry line.
pub const STAT_FORMAT: &str = "%n///%s,%Y,%f,%a,%u,%g";

/// Longest entry line the decoder accepts, excluding the newline: a
/// `PATH_MAX` path plus room for the delimiter and six numeric fields.
pub const MAX_LINE_LEN: usize = 4096 + 256;
