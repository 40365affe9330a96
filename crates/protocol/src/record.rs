use serde::{Deserialize, Serialize};

use crate::mode::{FileKind, RawMode};

/// One remote filesystem entry decoded from a single listing line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the listed root, e.g. `/a.txt` for root `/data`
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Last modified time, seconds since the epoch
    pub modified_at: i64,
    pub is_directory: bool,
    /// Reported but expected to be skipped by sync consumers
    pub is_symbolic_link: bool,
    /// Permission bits, e.g. `0o644`
    pub remote_mode: u32,
    pub remote_owner_id: u32,
    pub remote_group_id: u32,
    /// Full `st_mode` the flags above were derived from
    pub raw_mode: RawMode,
}

impl FileRecord {
    #[inline]
    pub fn kind(&self) -> FileKind {
        self.raw_mode.kind()
    }

    #[inline]
    pub fn is_regular(&self) -> bool {
        self.raw_mode.is_regular()
    }
}

/// The directory whose subtree is listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    root: String,
}

impl ListingRequest {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &str {
        &self.root
    }
}
