use thiserror::Error;

use crate::disk_format::block::BlockNumber;
use crate::disk_format::inode::InodeNumber;

/// Errors surfaced by filesystem operations.
///
/// Every failure aborts the whole requested operation. Nothing is retried
/// internally and writes persisted before the point of failure are left
/// as-is.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FsError {
    #[error("invalid path: {0:?}")]
    InvalidPath(String),
    #[error("no such file or directory: {0}")]
    NotFound(String),
    #[error("not a directory: {0}")]
    NotADirectory(String),
    #[error("not a regular file: {0}")]
    NotAFile(String),
    #[error("out of {0}")]
    ResourceExhausted(&'static str),
    #[error("content requires {required} blocks but files are limited to {limit} direct blocks")]
    FileTooLarge { required: usize, limit: usize },
    #[error("device of {blocks} blocks is too small to hold a filesystem")]
    DeviceTooSmall { blocks: usize },
    #[error("block number out of range: {0}")]
    OutOfRange(BlockNumber),
    #[error("inode number out of range: {0}")]
    BadInodeNumber(InodeNumber),
    #[error("corrupt superblock: {0}")]
    CorruptSuperblock(&'static str),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("record codec: {0}")]
    Codec(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, FsError>;
