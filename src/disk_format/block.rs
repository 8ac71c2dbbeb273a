use std::mem::size_of;

/// size of a block in bytes
pub const BLOCK_SIZE: usize = 1024;

/// A block's worth of raw bytes.
pub type Block = [u8; BLOCK_SIZE];
const_assert!(size_of::<Block>() == BLOCK_SIZE);

/// An all-zero block.
pub const EMPTY_BLOCK: Block = [0; BLOCK_SIZE];

/// Block numbers index the device directly. They are stored as `u32`s on the
/// disk, but we use `usize`s to avoid littering the code with casts.
pub type BlockNumber = usize;
