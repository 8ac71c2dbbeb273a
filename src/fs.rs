use log::{debug, info};

use crate::bitmap::Bitmap;
use crate::disk_format::block::{BlockNumber, BLOCK_SIZE, EMPTY_BLOCK};
use crate::disk_format::directory_entry::{DirectoryEntry, EntryName, DIRECTORY_ENTRY_SIZE};
use crate::disk_format::header::{Header, HEADER_BLOCK_NUMBER, HEADER_SIZE};
use crate::disk_format::inode::{
    Inode, InodeNumber, InodeType, INODE_SIZE, INODE_TABLE_CAPACITY, NUM_DIRECT, ROOT_INODE,
};
use crate::disk_format::superblock::{Superblock, SUPERBLOCK_BLOCK_NUMBER, SUPERBLOCK_SIZE};
use crate::error::{FsError, Result};
use crate::layout::{Layout, INODE_TABLE_START};
use crate::path;
use crate::storage::BlockStorage;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub is_dir: bool,
    pub size: u32,
}

/// The filesystem over a block device.
///
/// Single-threaded and synchronous: every operation runs a sequence of
/// blocking device reads and writes to completion. Callers that share an
/// instance across threads must serialize externally, e.g. with one mutex
/// around the whole instance.
pub struct FileSystem<S: BlockStorage> {
    pub storage: S,
    layout: Layout,
}

impl<S: BlockStorage> FileSystem<S> {
    /// Opens the filesystem on a device, formatting it first if the header
    /// magic or version do not match. There is no partial-validation path:
    /// any mismatch is treated as an uninitialized device and reset.
    pub fn new(storage: S) -> Result<Self> {
        let header_block = storage.read_block(HEADER_BLOCK_NUMBER)?;
        let header: Header = bincode::deserialize(&header_block[..HEADER_SIZE])?;

        if header.is_compatible() {
            let superblock_block = storage.read_block(SUPERBLOCK_BLOCK_NUMBER)?;
            let superblock: Superblock =
                bincode::deserialize(&superblock_block[..SUPERBLOCK_SIZE])?;
            let layout = Layout::from_superblock(&superblock, storage.block_count())?;

            info!(
                "found compatible filesystem: {} data blocks",
                layout.data_blocks
            );

            return Ok(FileSystem { storage, layout });
        }

        info!("no compatible filesystem on device; formatting");

        let layout = Layout::compute(storage.block_count())?;
        let mut fs = FileSystem { storage, layout };
        fs.format()?;

        Ok(fs)
    }

    /// Formats the device, destroying any previous contents.
    pub fn format(&mut self) -> Result<()> {
        let layout = Layout::compute(self.storage.block_count())?;

        let mut header_block = EMPTY_BLOCK;
        header_block[..HEADER_SIZE].copy_from_slice(&bincode::serialize(&Header::current())?);
        self.storage.write_block(HEADER_BLOCK_NUMBER, &header_block)?;

        // placeholder superblock; the data-bitmap size and data-block count
        // are written as zero until the inode table is laid out
        let placeholder = Superblock {
            data_bitmap_blocks: 0,
            data_blocks: 0,
            data_start_block: layout.data_bitmap_start() as u32,
            ..layout.superblock()
        };
        self.write_superblock(&placeholder)?;

        // zero every inode slot
        for slot in 0..INODE_TABLE_CAPACITY {
            self.storage
                .write_block(INODE_TABLE_START + slot, &EMPTY_BLOCK)?;
        }

        // the final superblock is authoritative
        self.write_superblock(&layout.superblock())?;

        // both bitmap regions start all-free
        for block_number in layout.inode_bitmap_start()..layout.data_start_block {
            self.storage.write_block(block_number, &EMPTY_BLOCK)?;
        }

        self.layout = layout;

        // reserve inode 0 and type the root explicitly as an empty
        // directory, so the allocator can never hand out 0 and a 0 in a
        // directory entry always means "free slot"
        let mut bitmap = self.read_inode_bitmap()?;
        bitmap.set(ROOT_INODE as usize);
        self.write_inode_bitmap(&bitmap)?;
        self.write_inode(ROOT_INODE, &Inode::new(InodeType::Directory))?;

        info!(
            "formatted device: {} data blocks starting at block {}",
            layout.data_blocks, layout.data_start_block
        );

        Ok(())
    }

    /// Creates a regular file or directory at `path`, auto-creating missing
    /// intermediate directories.
    pub fn create_file(&mut self, file_path: &str, directory: bool) -> Result<()> {
        info!("creating {file_path:?} (directory = {directory})");

        let segments = path::parse(file_path)?;
        let Some((name, intermediate)) = segments.split_last() else {
            return Err(FsError::InvalidPath(file_path.to_string()));
        };

        let parent_inum = self.resolve_dir_or_create(intermediate)?;

        if directory {
            self.create_directory(name, parent_inum)?;
        } else {
            self.create_regular_file(name, parent_inum)?;
        }

        Ok(())
    }

    /// Lists the directory at `path` in block order then in-block slot
    /// order, unsorted.
    pub fn list_dir(&self, file_path: &str) -> Result<Vec<DirEntryInfo>> {
        debug!("listing {file_path:?}");

        let segments = path::parse(file_path)?;
        let Some((name, intermediate)) = segments.split_last() else {
            return self.list_dir_inode(ROOT_INODE);
        };

        let parent_inum = self.resolve_dir_strict(intermediate)?;
        let Some((inum, inode)) = self.directory_lookup(parent_inum, name)? else {
            return Err(FsError::NotFound(file_path.to_string()));
        };

        if !inode.is_directory() {
            return Err(FsError::NotADirectory(file_path.to_string()));
        }

        self.list_dir_inode(inum)
    }

    /// Reads the contents of the regular file at `path`.
    ///
    /// Returns the full fixed size of every populated data block, so the
    /// result is always a multiple of the block size; it is not trimmed to
    /// the stored size field.
    pub fn get_content(&self, file_path: &str) -> Result<Vec<u8>> {
        debug!("reading {file_path:?}");

        let (inum, inode) = self.resolve_regular_file(file_path)?;

        let mut content = Vec::new();
        for &slot in inode.direct.iter() {
            if slot == 0 {
                break;
            }

            content.extend_from_slice(&self.storage.read_block(slot as BlockNumber)?);
        }

        debug!("[inode #{inum}] read {} bytes", content.len());
        Ok(content)
    }

    /// Replaces the contents of the existing regular file at `path`. Does
    /// not create the file.
    ///
    /// Blocks past the new content that were previously allocated to the
    /// file are left referenced, not freed.
    pub fn set_content(&mut self, file_path: &str, content: &[u8]) -> Result<()> {
        info!("writing {} bytes to {file_path:?}", content.len());

        let (inum, mut inode) = self.resolve_regular_file(file_path)?;

        let required = content.len().div_ceil(BLOCK_SIZE);
        if required > NUM_DIRECT {
            return Err(FsError::FileTooLarge {
                required,
                limit: NUM_DIRECT,
            });
        }

        // reuse already-populated slots; allocate the rest
        for slot in 0..required {
            if inode.direct[slot] == 0 {
                inode.direct[slot] = self.allocate_block()? as u32;
            }
        }

        for (index, chunk) in content.chunks(BLOCK_SIZE).enumerate() {
            let block_number = inode.direct[index] as BlockNumber;

            if chunk.len() == BLOCK_SIZE {
                let mut block = EMPTY_BLOCK;
                block.copy_from_slice(chunk);
                self.storage.write_block(block_number, &block)?;
            } else {
                // short final chunk: only the remaining bytes are written;
                // the rest of the block's prior bytes stay untouched
                let mut block = self.storage.read_block(block_number)?;
                block[..chunk.len()].copy_from_slice(chunk);
                self.storage.write_block(block_number, &block)?;
            }
        }

        inode.size = content.len() as u32;
        self.write_inode(inum, &inode)?;

        Ok(())
    }

    /// Lists the entries of the directory with the given inode number.
    pub fn list_dir_inode(&self, inum: InodeNumber) -> Result<Vec<DirEntryInfo>> {
        let inode = self.read_inode(inum)?;
        if !inode.is_directory() {
            return Err(FsError::NotADirectory(format!("inode {inum}")));
        }

        let mut listing = Vec::new();
        for &slot in inode.direct.iter() {
            if slot == 0 {
                continue;
            }

            let block = self.storage.read_block(slot as BlockNumber)?;
            for chunk in block.chunks_exact(DIRECTORY_ENTRY_SIZE) {
                let entry: DirectoryEntry = bincode::deserialize(chunk)?;
                if entry.inum == 0 {
                    continue;
                }

                let child = self.read_inode(entry.inum)?;
                listing.push(DirEntryInfo {
                    name: entry.name.to_string(),
                    is_dir: child.is_directory(),
                    size: child.size,
                });
            }
        }

        Ok(listing)
    }

    /// Creates a directory named `name` under `parent_inum` and returns the
    /// new inode number.
    pub fn create_directory(&mut self, name: &str, parent_inum: InodeNumber) -> Result<InodeNumber> {
        self.create_node(name, parent_inum, InodeType::Directory)
    }

    /// Creates a regular file named `name` under `parent_inum` and returns
    /// the new inode number.
    pub fn create_regular_file(
        &mut self,
        name: &str,
        parent_inum: InodeNumber,
    ) -> Result<InodeNumber> {
        self.create_node(name, parent_inum, InodeType::Regular)
    }

    /// Reads the inode record with the given number.
    pub fn read_inode(&self, inum: InodeNumber) -> Result<Inode> {
        if inum as usize >= INODE_TABLE_CAPACITY {
            return Err(FsError::BadInodeNumber(inum));
        }

        let block = self.storage.read_block(self.layout.inode_block(inum))?;
        Ok(bincode::deserialize(&block[..INODE_SIZE])?)
    }

    /// Writes the inode record with the given number.
    pub fn write_inode(&self, inum: InodeNumber, inode: &Inode) -> Result<()> {
        if inum as usize >= INODE_TABLE_CAPACITY {
            return Err(FsError::BadInodeNumber(inum));
        }

        let mut block = EMPTY_BLOCK;
        block[..INODE_SIZE].copy_from_slice(&bincode::serialize(inode)?);
        self.storage
            .write_block(self.layout.inode_block(inum), &block)
    }

    /// Marks the next free inode allocated and returns its number.
    ///
    /// The bitmap is persisted before returning; allocation is not
    /// transactional with the operation that populates the inode, so a crash
    /// in between leaks the inode. A failing call persists nothing.
    pub fn allocate_inode(&mut self) -> Result<InodeNumber> {
        let mut bitmap = self.read_inode_bitmap()?;
        let index = bitmap
            .first_clear(INODE_TABLE_CAPACITY)
            .ok_or(FsError::ResourceExhausted("free inodes"))?;

        bitmap.set(index);
        self.write_inode_bitmap(&bitmap)?;

        debug!("allocated inode {index}");
        Ok(index as InodeNumber)
    }

    /// Marks the next free data block allocated and returns its device block
    /// index. Same persistence contract as [`Self::allocate_inode`].
    pub fn allocate_block(&mut self) -> Result<BlockNumber> {
        let mut bitmap = self.read_data_bitmap()?;
        let index = bitmap
            .first_clear(self.layout.data_blocks)
            .ok_or(FsError::ResourceExhausted("free data blocks"))?;

        bitmap.set(index);
        self.write_data_bitmap(&bitmap)?;

        let block_number = self.layout.data_start_block + index;
        debug!("allocated data block {block_number}");
        Ok(block_number)
    }

    /// Marks an inode free again. No current operation deletes, but freeing
    /// is part of the allocator contract.
    pub fn release_inode(&mut self, inum: InodeNumber) -> Result<()> {
        if inum as usize >= INODE_TABLE_CAPACITY {
            return Err(FsError::BadInodeNumber(inum));
        }

        let mut bitmap = self.read_inode_bitmap()?;
        bitmap.clear(inum as usize);
        self.write_inode_bitmap(&bitmap)
    }

    /// Marks a data block free again, by device block index.
    pub fn release_block(&mut self, block_number: BlockNumber) -> Result<()> {
        let Some(index) = block_number.checked_sub(self.layout.data_start_block) else {
            return Err(FsError::OutOfRange(block_number));
        };
        if index >= self.layout.data_blocks {
            return Err(FsError::OutOfRange(block_number));
        }

        let mut bitmap = self.read_data_bitmap()?;
        bitmap.clear(index);
        self.write_data_bitmap(&bitmap)
    }

    /// Resolves `path` to an existing regular file. Intermediate directories
    /// must already exist.
    fn resolve_regular_file(&self, file_path: &str) -> Result<(InodeNumber, Inode)> {
        let segments = path::parse(file_path)?;
        let Some((name, intermediate)) = segments.split_last() else {
            return Err(FsError::NotAFile(file_path.to_string()));
        };

        let parent_inum = self.resolve_dir_strict(intermediate)?;
        let Some((inum, inode)) = self.directory_lookup(parent_inum, name)? else {
            return Err(FsError::NotFound(file_path.to_string()));
        };

        if !inode.is_regular() {
            return Err(FsError::NotAFile(file_path.to_string()));
        }

        Ok((inum, inode))
    }

    /// Walks `segments` from the root, requiring every segment to resolve to
    /// an existing directory child. Used by the read/update operations.
    fn resolve_dir_strict(&self, segments: &[&str]) -> Result<InodeNumber> {
        let mut current = ROOT_INODE;

        for segment in segments {
            match self.directory_lookup(current, segment)? {
                Some((inum, inode)) if inode.is_directory() => current = inum,
                _ => return Err(FsError::NotFound((*segment).to_string())),
            }
        }

        Ok(current)
    }

    /// Walks `segments` from the root, creating each missing intermediate
    /// directory on the way. Used by the create operation.
    fn resolve_dir_or_create(&mut self, segments: &[&str]) -> Result<InodeNumber> {
        let mut current = ROOT_INODE;

        for segment in segments {
            current = match self.directory_lookup(current, segment)? {
                Some((inum, inode)) if inode.is_directory() => inum,
                _ => self.create_directory(segment, current)?,
            };
        }

        Ok(current)
    }

    /// Finds the entry named `name` in the given directory. Names longer
    /// than the entry capacity compare by their truncation.
    fn directory_lookup(
        &self,
        dir_inum: InodeNumber,
        name: &str,
    ) -> Result<Option<(InodeNumber, Inode)>> {
        let dir_inode = self.read_inode(dir_inum)?;
        if !dir_inode.is_directory() {
            return Err(FsError::NotADirectory(format!("inode {dir_inum}")));
        }

        let target = EntryName::new(name);

        for &slot in dir_inode.direct.iter() {
            if slot == 0 {
                continue;
            }

            let block = self.storage.read_block(slot as BlockNumber)?;
            for chunk in block.chunks_exact(DIRECTORY_ENTRY_SIZE) {
                let entry: DirectoryEntry = bincode::deserialize(chunk)?;
                if entry.inum == 0 || entry.name != target {
                    continue;
                }

                let inode = self.read_inode(entry.inum)?;
                return Ok(Some((entry.inum, inode)));
            }
        }

        Ok(None)
    }

    /// Allocates and persists a new inode, then links it into the parent
    /// directory's first free entry slot.
    ///
    /// The writes are not transactional: a failure after the inode is
    /// persisted but before it is linked leaves the inode allocated and
    /// unreferenced.
    fn create_node(
        &mut self,
        name: &str,
        parent_inum: InodeNumber,
        mode: InodeType,
    ) -> Result<InodeNumber> {
        let mut parent = self.read_inode(parent_inum)?;
        if !parent.is_directory() {
            return Err(FsError::NotADirectory(format!("inode {parent_inum}")));
        }

        let new_inum = self.allocate_inode()?;
        self.write_inode(new_inum, &Inode::new(mode))?;

        let entry = DirectoryEntry::new(name, new_inum);
        let entry_serialized = bincode::serialize(&entry)?;

        for slot in 0..NUM_DIRECT {
            if parent.direct[slot] == 0 {
                let fresh = self.allocate_block()?;
                // zero the block so residual bytes never parse as entries
                self.storage.write_block(fresh, &EMPTY_BLOCK)?;

                parent.direct[slot] = fresh as u32;
                self.write_inode(parent_inum, &parent)?;
            }

            let block_number = parent.direct[slot] as BlockNumber;
            let mut block = self.storage.read_block(block_number)?;

            for offset in (0..BLOCK_SIZE).step_by(DIRECTORY_ENTRY_SIZE) {
                let existing: DirectoryEntry =
                    bincode::deserialize(&block[offset..offset + DIRECTORY_ENTRY_SIZE])?;
                if existing.inum != 0 {
                    continue;
                }

                block[offset..offset + DIRECTORY_ENTRY_SIZE].copy_from_slice(&entry_serialized);
                self.storage.write_block(block_number, &block)?;

                debug!("[inode #{parent_inum}] linked {name:?} as inode {new_inum}");
                return Ok(new_inum);
            }
        }

        Err(FsError::ResourceExhausted("parent directory entry slots"))
    }

    fn write_superblock(&self, superblock: &Superblock) -> Result<()> {
        let mut block = EMPTY_BLOCK;
        block[..SUPERBLOCK_SIZE].copy_from_slice(&bincode::serialize(superblock)?);
        self.storage.write_block(SUPERBLOCK_BLOCK_NUMBER, &block)
    }

    fn read_inode_bitmap(&self) -> Result<Bitmap> {
        self.read_bitmap(
            self.layout.inode_bitmap_start(),
            self.layout.inode_bitmap_blocks,
        )
    }

    fn write_inode_bitmap(&self, bitmap: &Bitmap) -> Result<()> {
        self.write_bitmap(self.layout.inode_bitmap_start(), bitmap)
    }

    fn read_data_bitmap(&self) -> Result<Bitmap> {
        self.read_bitmap(
            self.layout.data_bitmap_start(),
            self.layout.data_bitmap_blocks,
        )
    }

    fn write_data_bitmap(&self, bitmap: &Bitmap) -> Result<()> {
        self.write_bitmap(self.layout.data_bitmap_start(), bitmap)
    }

    fn read_bitmap(&self, start: BlockNumber, blocks: usize) -> Result<Bitmap> {
        let mut bytes = Vec::with_capacity(blocks * BLOCK_SIZE);
        for index in 0..blocks {
            bytes.extend_from_slice(&self.storage.read_block(start + index)?);
        }

        Ok(Bitmap::from_bytes(bytes))
    }

    fn write_bitmap(&self, start: BlockNumber, bitmap: &Bitmap) -> Result<()> {
        for (index, chunk) in bitmap.as_bytes().chunks(BLOCK_SIZE).enumerate() {
            let mut block = EMPTY_BLOCK;
            block[..chunk.len()].copy_from_slice(chunk);
            self.storage.write_block(start + index, &block)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk_format::header::CURRENT_VERSION;
    use crate::disk_format::inode::MAX_FILE_SIZE;
    use crate::storage::MemoryStorage;

    const TEST_BLOCKS: usize = 2048;

    fn test_fs() -> FileSystem<MemoryStorage> {
        FileSystem::new(MemoryStorage::new(TEST_BLOCKS)).unwrap()
    }

    mod format {
        use super::*;

        #[test]
        fn test_zeroed_device_is_formatted() {
            let fs = test_fs();
            assert!(fs.list_dir("/").unwrap().is_empty());
        }

        #[test]
        fn test_garbage_device_is_formatted() {
            let fs = FileSystem::new(MemoryStorage::filled(TEST_BLOCKS, 0xab)).unwrap();
            assert!(fs.list_dir("/").unwrap().is_empty());
        }

        #[test]
        fn test_version_mismatch_reformats() {
            let mut fs = test_fs();
            fs.create_file("/a.txt", false).unwrap();

            let mut header_block = EMPTY_BLOCK;
            header_block[..HEADER_SIZE].copy_from_slice(
                &bincode::serialize(&Header {
                    magic: crate::disk_format::header::MAGIC,
                    version: CURRENT_VERSION + 1,
                })
                .unwrap(),
            );
            fs.storage
                .write_block(HEADER_BLOCK_NUMBER, &header_block)
                .unwrap();

            let reopened = FileSystem::new(fs.storage).unwrap();
            assert!(reopened.list_dir("/").unwrap().is_empty());
        }

        #[test]
        fn test_compatible_device_is_not_reformatted() {
            let mut fs = test_fs();
            fs.create_file("/a.txt", false).unwrap();
            fs.set_content("/a.txt", b"hello").unwrap();

            let reopened = FileSystem::new(fs.storage).unwrap();
            let listing = reopened.list_dir("/").unwrap();
            assert_eq!(listing.len(), 1);
            assert_eq!(listing[0].name, "a.txt");
            assert_eq!(&reopened.get_content("/a.txt").unwrap()[..5], b"hello");
        }

        #[test]
        fn test_root_is_an_empty_directory() {
            let fs = test_fs();
            let root = fs.read_inode(ROOT_INODE).unwrap();

            assert!(root.is_directory());
            assert_eq!(root.size, 0);
            assert_eq!(root.direct, [0; NUM_DIRECT]);
        }

        #[test]
        fn test_root_inode_is_reserved() {
            let mut fs = test_fs();
            assert!(fs.read_inode_bitmap().unwrap().test(ROOT_INODE as usize));
            assert_ne!(fs.allocate_inode().unwrap(), ROOT_INODE);
        }

        #[test]
        fn test_device_too_small() {
            assert!(matches!(
                FileSystem::new(MemoryStorage::new(100)),
                Err(FsError::DeviceTooSmall { .. })
            ));
        }
    }

    mod allocation {
        use super::*;

        #[test]
        fn test_sequential_inodes_are_distinct() {
            let mut fs = test_fs();

            let mut seen = std::collections::HashSet::new();
            for _ in 0..100 {
                let inum = fs.allocate_inode().unwrap();
                assert!(seen.insert(inum));
            }

            let bitmap = fs.read_inode_bitmap().unwrap();
            for inum in seen {
                assert!(bitmap.test(inum as usize));
            }
        }

        #[test]
        fn test_inode_exhaustion() {
            let mut fs = test_fs();

            // inode 0 is reserved for the root
            for _ in 0..INODE_TABLE_CAPACITY - 1 {
                fs.allocate_inode().unwrap();
            }

            let before = fs.read_inode_bitmap().unwrap().as_bytes().to_vec();
            assert!(matches!(
                fs.allocate_inode(),
                Err(FsError::ResourceExhausted(_))
            ));
            let after = fs.read_inode_bitmap().unwrap().as_bytes().to_vec();

            // the failing call must not change bitmap state
            assert_eq!(before, after);
        }

        #[test]
        fn test_block_numbers_are_device_indices() {
            let mut fs = test_fs();
            let block_number = fs.allocate_block().unwrap();
            assert_eq!(block_number, fs.layout.data_start_block);
        }

        #[test]
        fn test_release_makes_resources_reusable() {
            let mut fs = test_fs();

            let inum = fs.allocate_inode().unwrap();
            fs.release_inode(inum).unwrap();
            assert_eq!(fs.allocate_inode().unwrap(), inum);

            let block_number = fs.allocate_block().unwrap();
            fs.release_block(block_number).unwrap();
            assert_eq!(fs.allocate_block().unwrap(), block_number);
        }

        #[test]
        fn test_release_block_outside_data_region() {
            let mut fs = test_fs();
            assert!(matches!(
                fs.release_block(0),
                Err(FsError::OutOfRange(0))
            ));
        }
    }

    mod create {
        use super::*;

        #[test]
        fn test_directory_membership() {
            let mut fs = test_fs();
            fs.create_file("/a.txt", false).unwrap();

            let listing = fs.list_dir("/").unwrap();
            assert_eq!(listing.len(), 1);
            assert_eq!(
                listing[0],
                DirEntryInfo {
                    name: "a.txt".to_string(),
                    is_dir: false,
                    size: 0,
                }
            );
        }

        #[test]
        fn test_create_directory() {
            let mut fs = test_fs();
            fs.create_file("/stuff", true).unwrap();

            let listing = fs.list_dir("/").unwrap();
            assert_eq!(listing.len(), 1);
            assert!(listing[0].is_dir);
            assert!(fs.list_dir("/stuff").unwrap().is_empty());
        }

        #[test]
        fn test_missing_intermediates_are_created() {
            let mut fs = test_fs();
            fs.create_file("/a/b/c.txt", false).unwrap();

            let a = fs.list_dir("/a").unwrap();
            assert_eq!(a.len(), 1);
            assert_eq!(a[0].name, "b");
            assert!(a[0].is_dir);

            let b = fs.list_dir("/a/b").unwrap();
            assert_eq!(b.len(), 1);
            assert_eq!(b[0].name, "c.txt");
            assert!(!b[0].is_dir);
        }

        #[test]
        fn test_root_path_is_invalid() {
            let mut fs = test_fs();
            assert!(matches!(
                fs.create_file("/", false),
                Err(FsError::InvalidPath(_))
            ));
        }

        #[test]
        fn test_long_names_are_truncated() {
            let mut fs = test_fs();
            fs.create_file("/a-rather-long-name.txt", false).unwrap();

            let listing = fs.list_dir("/").unwrap();
            assert_eq!(listing[0].name, "a-rather-lon");

            // lookup goes through the same truncation
            assert!(fs.get_content("/a-rather-long-name.txt").is_ok());
        }

        #[test]
        fn test_parent_entry_slots_exhausted() {
            let mut fs = test_fs();

            let slots = NUM_DIRECT * crate::disk_format::directory_entry::DIRECTORY_ENTRIES_PER_BLOCK;
            for index in 0..slots {
                fs.create_regular_file(&format!("f{index}"), ROOT_INODE)
                    .unwrap();
            }

            assert!(matches!(
                fs.create_regular_file("straw", ROOT_INODE),
                Err(FsError::ResourceExhausted(_))
            ));
            assert_eq!(fs.list_dir("/").unwrap().len(), slots);
        }

        #[test]
        fn test_parent_must_be_directory() {
            let mut fs = test_fs();
            fs.create_file("/a.txt", false).unwrap();
            let (inum, _) = fs.resolve_regular_file("/a.txt").unwrap();

            assert!(matches!(
                fs.create_regular_file("b", inum),
                Err(FsError::NotADirectory(_))
            ));
        }
    }

    mod content {
        use super::*;

        #[test]
        fn test_round_trip() {
            let mut fs = test_fs();
            fs.create_file("/notes.txt", false).unwrap();

            let content = b"four score and seven years ago".repeat(100);
            fs.set_content("/notes.txt", &content).unwrap();

            let read = fs.get_content("/notes.txt").unwrap();
            assert_eq!(&read[..content.len()], &content[..]);
            assert_eq!(read.len() % BLOCK_SIZE, 0);
            assert_eq!(read.len(), content.len().div_ceil(BLOCK_SIZE) * BLOCK_SIZE);
        }

        #[test]
        fn test_empty_file_reads_empty() {
            let mut fs = test_fs();
            fs.create_file("/empty", false).unwrap();
            assert!(fs.get_content("/empty").unwrap().is_empty());
        }

        #[test]
        fn test_size_field_tracks_exact_length() {
            let mut fs = test_fs();
            fs.create_file("/sized", false).unwrap();
            fs.set_content("/sized", &[7; 1500]).unwrap();

            let listing = fs.list_dir("/").unwrap();
            assert_eq!(listing[0].size, 1500);
        }

        #[test]
        fn test_capacity_boundary() {
            let mut fs = test_fs();
            fs.create_file("/big", false).unwrap();

            fs.set_content("/big", &vec![1; MAX_FILE_SIZE]).unwrap();
            assert_eq!(fs.list_dir("/").unwrap()[0].size, MAX_FILE_SIZE as u32);

            assert!(matches!(
                fs.set_content("/big", &vec![1; MAX_FILE_SIZE + 1]),
                Err(FsError::FileTooLarge { .. })
            ));
        }

        #[test]
        fn test_set_content_does_not_create() {
            let mut fs = test_fs();
            assert!(matches!(
                fs.set_content("/ghost", b"boo"),
                Err(FsError::NotFound(_))
            ));
        }

        #[test]
        fn test_shrinking_leaves_trailing_blocks() {
            let mut fs = test_fs();
            fs.create_file("/shrink", false).unwrap();

            fs.set_content("/shrink", &[b'a'; 2000]).unwrap();
            fs.set_content("/shrink", &[b'b'; 100]).unwrap();

            // size reflects the new length, but the stale second block is
            // still referenced
            assert_eq!(fs.list_dir("/").unwrap()[0].size, 100);
            let read = fs.get_content("/shrink").unwrap();
            assert_eq!(read.len(), 2 * BLOCK_SIZE);
            assert_eq!(&read[..100], &[b'b'; 100]);
        }

        #[test]
        fn test_short_final_chunk_preserves_prior_bytes() {
            let mut fs = test_fs();
            fs.create_file("/partial", false).unwrap();

            fs.set_content("/partial", &[b'a'; BLOCK_SIZE]).unwrap();
            fs.set_content("/partial", &[b'b'; 10]).unwrap();

            let read = fs.get_content("/partial").unwrap();
            assert_eq!(&read[..10], &[b'b'; 10]);
            assert_eq!(&read[10..BLOCK_SIZE], &[b'a'; BLOCK_SIZE - 10]);
        }

        #[test]
        fn test_blocks_are_reused_on_rewrite() {
            let mut fs = test_fs();
            fs.create_file("/stable", false).unwrap();

            fs.set_content("/stable", &[1; 3000]).unwrap();
            let before = fs.resolve_regular_file("/stable").unwrap().1.direct;

            fs.set_content("/stable", &[2; 3000]).unwrap();
            let after = fs.resolve_regular_file("/stable").unwrap().1.direct;

            assert_eq!(before, after);
        }
    }

    mod resolution {
        use super::*;

        #[test]
        fn test_missing_intermediate_is_not_found() {
            let fs = test_fs();
            assert!(matches!(
                fs.get_content("/missing/x"),
                Err(FsError::NotFound(_))
            ));
        }

        #[test]
        fn test_list_dir_on_file() {
            let mut fs = test_fs();
            fs.create_file("/a.txt", false).unwrap();

            assert!(matches!(
                fs.list_dir("/a.txt"),
                Err(FsError::NotADirectory(_))
            ));
        }

        #[test]
        fn test_get_content_on_directory() {
            let mut fs = test_fs();
            fs.create_file("/dir", true).unwrap();

            assert!(matches!(
                fs.get_content("/dir"),
                Err(FsError::NotAFile(_))
            ));
        }

        #[test]
        fn test_get_content_on_root() {
            let fs = test_fs();
            assert!(matches!(fs.get_content("/"), Err(FsError::NotAFile(_))));
        }

        #[test]
        fn test_file_as_intermediate_is_not_found() {
            let mut fs = test_fs();
            fs.create_file("/a.txt", false).unwrap();

            assert!(matches!(
                fs.get_content("/a.txt/b"),
                Err(FsError::NotFound(_))
            ));
        }

        #[test]
        fn test_relative_path_is_invalid() {
            let fs = test_fs();
            assert!(matches!(
                fs.get_content("a.txt"),
                Err(FsError::InvalidPath(_))
            ));
        }

        #[test]
        fn test_strict_resolution_does_not_create() {
            let mut fs = test_fs();
            assert!(matches!(
                fs.set_content("/a/b.txt", b"x"),
                Err(FsError::NotFound(_))
            ));
            assert!(fs.list_dir("/").unwrap().is_empty());
        }
    }
}
