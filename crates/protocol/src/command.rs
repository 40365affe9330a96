use crate::{
    record::ListingRequest,
    sentinel::{END_SENTINEL, ERROR_SENTINEL, STAT_FORMAT},
};

/// Build the shell command that creates `root` if needed, stats every entry
/// below it and terminates the output with a sentinel.
///
/// Output shape:
///   - one `PATH///size,mtime,mode-hex,perm-octal,uid,gid` line per entry
///   - `END_SENTINEL` without a trailing newline on success
///   - `ERROR_SENTINEL` plus newline if `mkdir`, `find` or `stat` failed
pub fn find_command(root: &str) -> String {
    let root = quote_path(root);
    format!(
        "mkdir -p {root} && find {root} -exec stat -c \"{STAT_FORMAT}\" {{}} + 2>/dev/null \
         && echo -n \"{END_SENTINEL}\" || echo \"{ERROR_SENTINEL}\""
    )
}

/// Single-quote `path` for a POSIX shell. An embedded `'` becomes `'\''`.
pub fn quote_path(path: &str) -> String {
    let mut quoted = String::with_capacity(path.len() + 2);
    quoted.push('\'');
    for c in path.chars() {
        if c == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    quoted
}

impl ListingRequest {
    pub fn command(&self) -> String {
        find_command(self.root())
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
