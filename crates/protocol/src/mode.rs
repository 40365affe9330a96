use std::{fmt, num::ParseIntError};

use serde::{Deserialize, Serialize};

/// Bits of `st_mode` that encode the file type.
pub const S_IFMT: u32 = 0o170000;
/// Directory type bits.
pub const S_IFDIR: u32 = 0o040000;
/// Regular file type bits.
pub const S_IFREG: u32 = 0o100000;
/// Symbolic link type bits.
pub const S_IFLNK: u32 = 0o120000;
/// Access permission bits (including setuid, setgid and sticky).
pub const PERMISSION_BITS: u32 = 0o7777;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FileKind {
    Regular,
    Directory,
    Symlink,
    // Sockets, fifos, block and character devices
    Other,
}

/// Full POSIX `st_mode` of a remote entry: type bits plus permission bits,
/// as printed by `stat -c %f`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawMode(u32);

impl RawMode {
    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    /// Parse the hexadecimal rendering produced by `%f`.
    pub fn from_hex(s: &str) -> Result<Self, ParseIntError> {
        u32::from_str_radix(s, 16).map(Self)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    const fn type_bits(self) -> u32 {
        self.0 & S_IFMT
    }

    /// True only when the type bits are exactly `S_IFDIR`. Block devices and
    /// sockets share the `0o040000` bit and must not count as directories.
    #[inline]
    pub const fn is_directory(self) -> bool {
        self.type_bits() == S_IFDIR
    }

    #[inline]
    pub const fn is_symbolic_link(self) -> bool {
        self.type_bits() == S_IFLNK
    }

    #[inline]
    pub const fn is_regular(self) -> bool {
        self.type_bits() == S_IFREG
    }

    pub const fn kind(self) -> FileKind {
        match self.type_bits() {
            S_IFDIR => FileKind::Directory,
            S_IFLNK => FileKind::Symlink,
            S_IFREG => FileKind::Regular,
            _ => FileKind::Other,
        }
    }

    #[inline]
    pub const fn permissions(self) -> u32 {
        self.0 & PERMISSION_BITS
    }
}

impl fmt::Display for RawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// Parse the octal permission rendering produced by `%a`. A negative value is
/// rejected.
pub fn parse_permissions(s: &str) -> Result<u32, ParseIntError> {
    u32::from_str_radix(s, 8)
}

#[cfg(test)]
#[path = "mode_tests.rs"]
mod tests;
