use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use tinyfs::disk_format::block::BLOCK_SIZE;
use tinyfs::storage::FileBackedStorage;
use tinyfs::FileSystem;

/// Create or open a tinyfs disk image and list one of its directories.
#[derive(Parser)]
struct Args {
    /// disk image file; created if it does not exist
    disk_file: PathBuf,
    /// size in blocks for a newly created image
    #[arg(long, default_value_t = 4096)]
    blocks: usize,
    /// directory to list
    #[arg(long, default_value = "/")]
    list: String,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let disk_file = File::options()
        .read(true)
        .write(true)
        .create(true)
        .open(&args.disk_file)
        .context("unable to open disk file in read-write mode")?;

    if disk_file.metadata()?.len() == 0 {
        disk_file
            .set_len((args.blocks * BLOCK_SIZE) as u64)
            .context("sizing new disk image")?;
    }

    let storage = FileBackedStorage::new(disk_file)?;
    let fs = FileSystem::new(storage)?;

    for entry in fs.list_dir(&args.list)? {
        let kind = if entry.is_dir { "d" } else { "-" };
        println!("{kind} {:>10} {}", entry.size, entry.name);
    }

    Ok(())
}
