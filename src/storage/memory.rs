use std::cell::RefCell;

use crate::disk_format::block::{Block, BlockNumber, BLOCK_SIZE};
use crate::error::{FsError, Result};

use super::block_storage::BlockStorage;

/// Block storage backed by an in-memory vector of blocks.
///
/// Useful as a fake device in tests; each instance is fully independent, so
/// a test can stand up several devices side by side. Like the filesystem
/// itself this is a single-threaded structure.
pub struct MemoryStorage {
    blocks: RefCell<Vec<Block>>,
}

impl MemoryStorage {
    /// A zero-filled device of `block_count` blocks.
    #[must_use]
    pub fn new(block_count: usize) -> Self {
        MemoryStorage {
            blocks: RefCell::new(vec![[0; BLOCK_SIZE]; block_count]),
        }
    }

    /// A device of `block_count` blocks with every byte set to `fill`.
    /// Handy for simulating a device with pre-existing garbage.
    #[must_use]
    pub fn filled(block_count: usize, fill: u8) -> Self {
        MemoryStorage {
            blocks: RefCell::new(vec![[fill; BLOCK_SIZE]; block_count]),
        }
    }
}

impl BlockStorage for MemoryStorage {
    fn read_block(&self, block_number: BlockNumber) -> Result<Block> {
        self.blocks
            .borrow()
            .get(block_number)
            .copied()
            .ok_or(FsError::OutOfRange(block_number))
    }

    fn write_block(&self, block_number: BlockNumber, block: &Block) -> Result<()> {
        let mut blocks = self.blocks.borrow_mut();
        let slot = blocks
            .get_mut(block_number)
            .ok_or(FsError::OutOfRange(block_number))?;
        slot.copy_from_slice(block);

        Ok(())
    }

    fn block_count(&self) -> usize {
        self.blocks.borrow().len()
    }
}
