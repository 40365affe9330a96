use std::{fmt, io, num::ParseIntError};

/// Metadata field of an entry line, in wire order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Field {
    Size,
    ModifiedAt,
    RawMode,
    Permissions,
    OwnerId,
    GroupId,
}

impl Field {
    pub const fn name(self) -> &'static str {
        match self {
            Field::Size => "size",
            Field::ModifiedAt => "mtime",
            Field::RawMode => "mode (hex)",
            Field::Permissions => "permissions (octal)",
            Field::OwnerId => "uid",
            Field::GroupId => "gid",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    /// The line does not follow `PATH///f0,f1,f2,f3,f4,f5`.
    #[error("malformed listing line: {line:?}")]
    MalformedLine { line: String },

    #[error("failed to decode {field} in listing line {line:?}")]
    FieldDecode {
        field: Field,
        line: String,
        #[source]
        source: ParseIntError,
    },

    /// The remote `find`/`stat` pipeline reported failure.
    #[error("remote traversal failed")]
    RemoteTraversal,

    /// The stream ended before either sentinel arrived.
    #[error("listing stream closed before end of listing")]
    StreamClosed,

    #[error("failed to read listing stream")]
    Io(#[from] io::Error),
}

impl ListingError {
    pub(crate) fn malformed(line: &str) -> Self {
        ListingError::MalformedLine {
            line: line.to_owned(),
        }
    }

    pub(crate) fn field(field: Field, line: &str, source: ParseIntError) -> Self {
        ListingError::FieldDecode {
            field,
            line: line.to_owned(),
            source,
        }
    }

    /// True for grammar and numeric failures, i.e. a protocol mismatch
    /// rather than a remote or transport failure.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            ListingError::MalformedLine { .. } | ListingError::FieldDecode { .. }
        )
    }
}
