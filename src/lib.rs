//! A minimal inode-based filesystem laid out on a fixed-size block device.
//!
//! The on-disk format consists of a header block, a superblock, a table of
//! one inode per block, allocation bitmaps for inodes and data blocks, and
//! the data blocks themselves. Files and directories are bounded by a small
//! fixed number of direct data blocks; there is no indirection.
//!
//! All filesystem state lives on the block device. Every operation reads
//! what it needs, mutates it, and writes it back synchronously. There is no
//! locking and no transactional grouping of writes: concurrent callers must
//! serialize externally, e.g. by wrapping the [`fs::FileSystem`] instance in
//! a single mutex.

/// Allocation bitmaps.
pub mod bitmap;
/// Constants and structures that define the on-disk format.
pub mod disk_format;
mod error;
/// The filesystem proper.
pub mod fs;
/// On-disk region arithmetic.
pub mod layout;
/// Absolute-path parsing.
pub mod path;
/// Block storage backends.
pub mod storage;

pub use error::{FsError, Result};
pub use fs::{DirEntryInfo, FileSystem};
