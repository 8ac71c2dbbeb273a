/// Perform a const assertion.
macro_rules! const_assert {
    ($($tt:tt)*) => {
        const _: () = assert!($($tt)*);
    }
}

/// Blocks.
pub mod block;
/// Directory entries and entry names.
pub mod directory_entry;
/// The filesystem header.
pub mod header;
/// Inodes.
pub mod inode;
/// The superblock.
pub mod superblock;
