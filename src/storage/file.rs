use std::fs::File;
use std::os::unix::prelude::FileExt;

use crate::disk_format::block::{Block, BlockNumber, BLOCK_SIZE};
use crate::error::{FsError, Result};

use super::block_storage::BlockStorage;

/// Block storage backed by a disk-image file.
pub struct FileBackedStorage {
    file: File,
    block_count: usize,
}

impl FileBackedStorage {
    /// Wraps an open disk-image file. The capacity is the number of whole
    /// blocks the file holds at this point; a trailing partial block is
    /// ignored.
    pub fn new(file: File) -> Result<Self> {
        let block_count = file.metadata()?.len() as usize / BLOCK_SIZE;

        Ok(FileBackedStorage { file, block_count })
    }
}

impl BlockStorage for FileBackedStorage {
    fn read_block(&self, block_number: BlockNumber) -> Result<Block> {
        if block_number >= self.block_count {
            return Err(FsError::OutOfRange(block_number));
        }

        let mut buf = [0; BLOCK_SIZE];
        let position = block_number * BLOCK_SIZE;
        self.file.read_exact_at(&mut buf, position as u64)?;

        Ok(buf)
    }

    fn write_block(&self, block_number: BlockNumber, block: &Block) -> Result<()> {
        if block_number >= self.block_count {
            return Err(FsError::OutOfRange(block_number));
        }

        let position = block_number * BLOCK_SIZE;
        self.file.write_all_at(block, position as u64)?;

        Ok(())
    }

    fn block_count(&self) -> usize {
        self.block_count
    }
}
