use std::fmt::{self, Debug};
use std::mem::size_of;

use serde::{Deserialize, Serialize};

use super::block::BLOCK_SIZE;
use super::inode::InodeNumber;

/// The number of bytes occupied by a directory entry.
pub const DIRECTORY_ENTRY_SIZE: usize = 16;
const_assert!(size_of::<DirectoryEntry>() == DIRECTORY_ENTRY_SIZE);

const_assert!(BLOCK_SIZE % DIRECTORY_ENTRY_SIZE == 0);
/// The number of directory entries packed into a block.
pub const DIRECTORY_ENTRIES_PER_BLOCK: usize = BLOCK_SIZE / DIRECTORY_ENTRY_SIZE;

/// The fixed capacity of an entry name in bytes.
pub const MAX_NAME_LEN: usize = 12;
const_assert!(size_of::<EntryName>() == MAX_NAME_LEN);

/// A free directory entry.
pub const FREE_DIRECTORY_ENTRY: DirectoryEntry = DirectoryEntry {
    name: EntryName([0; MAX_NAME_LEN]),
    inum: 0,
};

/// A directory entry. An inode number of 0 marks the slot as free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(C)]
pub struct DirectoryEntry {
    /// The name of the entry.
    pub name: EntryName,
    /// The inode number.
    pub inum: InodeNumber,
}

impl DirectoryEntry {
    /// Constructs a new entry. The name is truncated to [`MAX_NAME_LEN`]
    /// bytes.
    #[must_use]
    pub fn new(name: &str, inum: InodeNumber) -> DirectoryEntry {
        DirectoryEntry {
            name: EntryName::new(name),
            inum,
        }
    }
}

/// A fixed-capacity name, as used in [`DirectoryEntry`].
///
/// Names shorter than the capacity are zero-padded; a name of exactly
/// [`MAX_NAME_LEN`] bytes is not nul-terminated.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(C)]
pub struct EntryName([u8; MAX_NAME_LEN]);

impl EntryName {
    /// Builds a name from a string, truncating to the fixed capacity.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let bytes = name.as_bytes();
        let len = bytes.len().min(MAX_NAME_LEN);

        let mut converted = [0; MAX_NAME_LEN];
        converted[..len].copy_from_slice(&bytes[..len]);

        EntryName(converted)
    }

    /// The stored bytes, trimmed at the first nul (or the full capacity if
    /// there is none).
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        let len = self
            .0
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(MAX_NAME_LEN);

        &self.0[..len]
    }
}

impl Debug for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntryName")
            .field(&String::from_utf8_lossy(self.as_bytes()))
            .finish()
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.as_bytes()))
    }
}
