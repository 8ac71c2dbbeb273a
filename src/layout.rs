use crate::disk_format::block::{BlockNumber, BLOCK_SIZE};
use crate::disk_format::inode::{InodeNumber, INODE_TABLE_CAPACITY};
use crate::disk_format::superblock::Superblock;
use crate::error::{FsError, Result};

/// The device block index of the first inode-table slot. The header occupies
/// block 0 and the superblock block 1.
pub const INODE_TABLE_START: BlockNumber = 2;

/// Bits tracked per bitmap block.
const BITS_PER_BLOCK: usize = 8 * BLOCK_SIZE;

/// The fixed on-disk regions, in order: header, superblock, inode table,
/// inode bitmap, data bitmap, data blocks.
///
/// Everything here is derived either from the device size (at format time)
/// or from the superblock (when opening a formatted device). The layout is
/// immutable once the device is formatted; the mutable structures (inodes,
/// bitmaps, data) are always read fresh from the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Size of the inode bitmap in blocks.
    pub inode_bitmap_blocks: usize,
    /// Size of the data bitmap in blocks.
    pub data_bitmap_blocks: usize,
    /// Count of usable data blocks.
    pub data_blocks: usize,
    /// Device block index of the first data block.
    pub data_start_block: BlockNumber,
}

impl Layout {
    /// Computes the final layout for a device of `total_blocks` blocks.
    ///
    /// Fails if the device cannot hold the fixed regions plus at least one
    /// data-bitmap block and one data block.
    pub fn compute(total_blocks: usize) -> Result<Layout> {
        let inode_bitmap_blocks = INODE_TABLE_CAPACITY.div_ceil(BITS_PER_BLOCK);
        let fixed = INODE_TABLE_START + INODE_TABLE_CAPACITY + inode_bitmap_blocks;

        let remaining = total_blocks.saturating_sub(fixed);
        if remaining < 2 {
            return Err(FsError::DeviceTooSmall {
                blocks: total_blocks,
            });
        }

        let data_bitmap_blocks = remaining.div_ceil(BITS_PER_BLOCK);
        let data_blocks = remaining - data_bitmap_blocks;

        Ok(Layout {
            inode_bitmap_blocks,
            data_bitmap_blocks,
            data_blocks,
            data_start_block: fixed + data_bitmap_blocks,
        })
    }

    /// Rebuilds the layout recorded in a superblock, validating it against
    /// the actual device size.
    pub fn from_superblock(superblock: &Superblock, total_blocks: usize) -> Result<Layout> {
        if superblock.block_size as usize != BLOCK_SIZE {
            return Err(FsError::CorruptSuperblock("unexpected block size"));
        }

        if superblock.inode_table_capacity as usize != INODE_TABLE_CAPACITY {
            return Err(FsError::CorruptSuperblock("unexpected inode table capacity"));
        }

        let layout = Layout {
            inode_bitmap_blocks: superblock.inode_bitmap_blocks as usize,
            data_bitmap_blocks: superblock.data_bitmap_blocks as usize,
            data_blocks: superblock.data_blocks as usize,
            data_start_block: superblock.data_start_block as BlockNumber,
        };

        let expected_start = INODE_TABLE_START
            + INODE_TABLE_CAPACITY
            + layout.inode_bitmap_blocks
            + layout.data_bitmap_blocks;
        if layout.data_start_block != expected_start {
            return Err(FsError::CorruptSuperblock("inconsistent data start block"));
        }

        if layout.data_start_block + layout.data_blocks > total_blocks {
            return Err(FsError::CorruptSuperblock("data region exceeds device"));
        }

        Ok(layout)
    }

    /// The superblock recording this layout.
    #[must_use]
    pub fn superblock(&self) -> Superblock {
        Superblock {
            block_size: BLOCK_SIZE as u32,
            inode_table_capacity: INODE_TABLE_CAPACITY as u32,
            inode_bitmap_blocks: self.inode_bitmap_blocks as u32,
            data_bitmap_blocks: self.data_bitmap_blocks as u32,
            data_blocks: self.data_blocks as u32,
            data_start_block: self.data_start_block as u32,
        }
    }

    /// The block holding the record of inode `inum`.
    #[must_use]
    pub fn inode_block(&self, inum: InodeNumber) -> BlockNumber {
        INODE_TABLE_START + inum as usize
    }

    /// The first block of the inode bitmap, immediately after the inode
    /// table.
    #[must_use]
    pub fn inode_bitmap_start(&self) -> BlockNumber {
        INODE_TABLE_START + INODE_TABLE_CAPACITY
    }

    /// The first block of the data bitmap, immediately after the inode
    /// bitmap.
    #[must_use]
    pub fn data_bitmap_start(&self) -> BlockNumber {
        self.inode_bitmap_start() + self.inode_bitmap_blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute() {
        let layout = Layout::compute(2048).unwrap();

        assert_eq!(layout.inode_bitmap_blocks, 1);
        assert_eq!(layout.data_bitmap_blocks, 1);
        assert_eq!(layout.data_blocks, 1020);
        assert_eq!(layout.data_start_block, 1028);
    }

    #[test]
    fn test_regions_are_disjoint() {
        let layout = Layout::compute(4096).unwrap();

        assert_eq!(layout.inode_bitmap_start(), 1026);
        assert_eq!(
            layout.data_bitmap_start(),
            layout.inode_bitmap_start() + layout.inode_bitmap_blocks
        );
        assert_eq!(
            layout.data_start_block,
            layout.data_bitmap_start() + layout.data_bitmap_blocks
        );
    }

    #[test]
    fn test_bitmap_covers_data_blocks() {
        for total in [1029, 2048, 10_000, 1_000_000] {
            let layout = Layout::compute(total).unwrap();
            assert!(layout.data_bitmap_blocks * BITS_PER_BLOCK >= layout.data_blocks);
            assert_eq!(layout.data_start_block + layout.data_blocks, total);
        }
    }

    #[test]
    fn test_device_too_small() {
        assert!(matches!(
            Layout::compute(1028),
            Err(FsError::DeviceTooSmall { .. })
        ));
        assert!(Layout::compute(1029).is_ok());
    }

    #[test]
    fn test_superblock_round_trip() {
        let layout = Layout::compute(2048).unwrap();
        let rebuilt = Layout::from_superblock(&layout.superblock(), 2048).unwrap();
        assert_eq!(rebuilt, layout);
    }

    #[test]
    fn test_from_superblock_rejects_bad_block_size() {
        let mut superblock = Layout::compute(2048).unwrap().superblock();
        superblock.block_size = 512;

        assert!(matches!(
            Layout::from_superblock(&superblock, 2048),
            Err(FsError::CorruptSuperblock(_))
        ));
    }

    #[test]
    fn test_from_superblock_rejects_oversized_data_region() {
        let superblock = Layout::compute(2048).unwrap().superblock();

        assert!(matches!(
            Layout::from_superblock(&superblock, 2000),
            Err(FsError::CorruptSuperblock(_))
        ));
    }
}
