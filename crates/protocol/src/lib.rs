//! Remote listing protocol: the `find`/`stat` command sent to a remote shell
//! and the decoder for the line stream it prints.
//!
//! Known limitation: a path containing `///` cannot be represented, the line
//! grammar has no escaping for the delimiter.

mod command;
mod decoder;
mod error;
mod mode;
mod record;
pub mod sentinel;

pub use command::{find_command, quote_path};
pub use decoder::{Listing, Terminal, decode_line, decode_listing};
pub use error::{Field, ListingError};
pub use mode::{FileKind, RawMode, S_IFDIR, S_IFLNK, S_IFMT, S_IFREG, parse_permissions};
pub use record::{FileRecord, ListingRequest};
pub use sentinel::{END_SENTINEL, ERROR_SENTINEL};
