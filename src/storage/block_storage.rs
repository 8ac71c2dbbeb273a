use crate::disk_format::block::{Block, BlockNumber};
use crate::error::Result;

/// A flat array of fixed-size blocks exposing block-granular reads and
/// writes. The device owns all filesystem bytes; everything else is a
/// transient view.
///
/// Accessing a block at or beyond [`Self::block_count`] is a fatal error to
/// the caller. Reads and writes either complete or fail hard; there are no
/// transient-failure semantics.
pub trait BlockStorage {
    fn read_block(&self, block_number: BlockNumber) -> Result<Block>;

    fn write_block(&self, block_number: BlockNumber, block: &Block) -> Result<()>;

    /// The fixed total capacity of the device in blocks.
    fn block_count(&self) -> usize;
}
