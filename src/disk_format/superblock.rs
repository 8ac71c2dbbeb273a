use std::mem::size_of;

use serde::{Deserialize, Serialize};

use super::block::BlockNumber;

/// The number of bytes occupied by the superblock at the start of its block.
pub const SUPERBLOCK_SIZE: usize = 24;
const_assert!(size_of::<Superblock>() == SUPERBLOCK_SIZE);

/// The block number holding the superblock.
pub const SUPERBLOCK_BLOCK_NUMBER: BlockNumber = 1;

/// The superblock: six unsigned 32-bit fields describing the region layout.
///
/// `data_bitmap_blocks`, `data_blocks`, and `data_start_block` are written
/// twice during format: first as placeholders while the inode table is laid
/// out, then with the final values computed from the remaining device
/// capacity. The final write is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(C)]
pub struct Superblock {
    /// Size of a block in bytes.
    pub block_size: u32,
    /// Number of inode slots in the inode table.
    pub inode_table_capacity: u32,
    /// Size of the inode bitmap in blocks.
    pub inode_bitmap_blocks: u32,
    /// Size of the data bitmap in blocks.
    pub data_bitmap_blocks: u32,
    /// Count of usable data blocks.
    pub data_blocks: u32,
    /// Device block index of the first data block.
    pub data_start_block: u32,
}
