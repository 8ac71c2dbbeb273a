use std::mem::size_of;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use super::block::BLOCK_SIZE;

/// The number of bytes occupied by an inode record at the start of its block.
pub const INODE_SIZE: usize = 60;
const_assert!(size_of::<Inode>() == INODE_SIZE);
const_assert!(INODE_SIZE <= BLOCK_SIZE);

/// The number of direct data-block slots per inode. This is the one true
/// capacity, applied to directories and regular files alike.
pub const NUM_DIRECT: usize = 12;

/// Number of inode slots in the inode table. A fixed constant, not derived
/// from the device size. Each slot occupies a whole block.
pub const INODE_TABLE_CAPACITY: usize = 1024;

/// The maximum number of content bytes a regular file can hold.
pub const MAX_FILE_SIZE: usize = NUM_DIRECT * BLOCK_SIZE;

/// Inode numbers are stored as `u32`s inside directory entries.
pub type InodeNumber = u32;

/// The root directory is always inode 0. Its bit is set at format time, so
/// the allocator never hands out 0, and a 0 inside a directory entry always
/// means "free slot". The root can therefore never appear as a child entry.
pub const ROOT_INODE: InodeNumber = 0;

/// An inode record. One record per inode-table block, not packed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(C)]
pub struct Inode {
    /// type tag (directory or regular file)
    pub mode: InodeType,
    /// owning user id (stored, never enforced)
    pub uid: u16,
    /// owning group id (stored, never enforced)
    pub gid: u16,
    /// explicit padding so the serialized record has no implicit gaps
    pub pad: u16,
    /// file size in bytes
    pub size: u32,
    /// device block numbers of the first NUM_DIRECT blocks; 0 = unused slot
    pub direct: [u32; NUM_DIRECT],
}

impl Inode {
    /// Constructs a fresh inode of the given type with zeroed uid, gid,
    /// size, and direct-block array.
    #[must_use]
    pub fn new(mode: InodeType) -> Self {
        Inode {
            mode,
            uid: 0,
            gid: 0,
            pad: 0,
            size: 0,
            direct: [0; NUM_DIRECT],
        }
    }

    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.mode == InodeType::Directory
    }

    #[must_use]
    pub fn is_regular(&self) -> bool {
        self.mode == InodeType::Regular
    }
}

/// The inode type tag. The numeric values keep the type in the high bits of
/// the 16-bit mode field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u16)]
pub enum InodeType {
    /// This inode is not in use.
    Free = 0,
    /// This inode describes a directory.
    Directory = 0x4000,
    /// This inode describes a regular data file.
    Regular = 0x8000,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_size() {
        let inode = Inode::new(InodeType::Regular);
        let serialized = bincode::serialize(&inode).unwrap();
        assert_eq!(serialized.len(), INODE_SIZE);
    }

    #[test]
    fn test_round_trip() {
        let mut inode = Inode::new(InodeType::Directory);
        inode.size = 4096;
        inode.direct[0] = 1030;
        inode.direct[11] = 2047;

        let serialized = bincode::serialize(&inode).unwrap();
        let parsed: Inode = bincode::deserialize(&serialized).unwrap();
        assert_eq!(parsed, inode);
    }

    #[test]
    fn test_zeroed_record_is_free() {
        // format zero-fills every inode slot; a zeroed record must parse as
        // a free inode
        let parsed: Inode = bincode::deserialize(&[0; INODE_SIZE]).unwrap();
        assert_eq!(parsed.mode, InodeType::Free);
        assert_eq!(parsed.size, 0);
        assert_eq!(parsed.direct, [0; NUM_DIRECT]);
    }
}
