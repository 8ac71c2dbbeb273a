use std::mem::size_of;

use serde::{Deserialize, Serialize};

use super::block::BlockNumber;

/// The number of bytes occupied by the header at the start of its block.
pub const HEADER_SIZE: usize = 8;
const_assert!(size_of::<Header>() == HEADER_SIZE);

/// The block number holding the filesystem header.
pub const HEADER_BLOCK_NUMBER: BlockNumber = 0;

/// The magic bytes identifying a formatted device. Exactly four bytes, with
/// no guaranteed nul terminator.
pub const MAGIC: [u8; 4] = *b"TNFS";

/// The on-disk format version written by this implementation.
pub const CURRENT_VERSION: u32 = 1;

/// The filesystem header.
///
/// A device is considered formatted and compatible iff the magic matches
/// exactly and the version equals [`CURRENT_VERSION`]. Any mismatch is
/// treated as "uninitialized" and triggers a full reformat.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(C)]
pub struct Header {
    pub magic: [u8; 4],
    pub version: u32,
}

impl Header {
    /// The header written by a fresh format.
    #[must_use]
    pub fn current() -> Self {
        Header {
            magic: MAGIC,
            version: CURRENT_VERSION,
        }
    }

    /// Whether this header identifies a device we can operate on.
    #[must_use]
    pub fn is_compatible(&self) -> bool {
        self.magic == MAGIC && self.version == CURRENT_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_size() {
        let serialized = bincode::serialize(&Header::current()).unwrap();
        assert_eq!(serialized.len(), HEADER_SIZE);
    }

    #[test]
    fn test_current_is_compatible() {
        assert!(Header::current().is_compatible());
    }

    #[test]
    fn test_magic_mismatch() {
        let header = Header {
            magic: *b"EXT4",
            version: CURRENT_VERSION,
        };
        assert!(!header.is_compatible());
    }

    #[test]
    fn test_version_mismatch() {
        let header = Header {
            magic: MAGIC,
            version: CURRENT_VERSION + 1,
        };
        assert!(!header.is_compatible());
    }

    #[test]
    fn test_round_trip() {
        let serialized = bincode::serialize(&Header::current()).unwrap();
        let parsed: Header = bincode::deserialize(&serialized).unwrap();
        assert_eq!(parsed, Header::current());
    }
}
