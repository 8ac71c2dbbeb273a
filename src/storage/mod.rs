/// The block storage abstraction.
mod block_storage;
/// File-backed block storage.
mod file;
/// In-memory block storage.
mod memory;

pub use block_storage::*;
pub use file::*;
pub use memory::*;
