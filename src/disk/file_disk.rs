use std::{
    fs::{File, OpenOptions},
    io::{Read, Result, Seek, SeekFrom, Write},
    sync::Mutex,
};

use crate::disk::{
    block_device::BlockDevice,
    types::{Block, BLOCK_SIZE},
};

/// A disk image backed by a regular host file.
///
/// The mutex serializes the seek + transfer pair, so two block operations on
/// the same image never interleave.
#[derive(Debug)]
pub struct FileDisk {
    file: Mutex<File>,
}

impl FileDisk {
    /// Create or resize the image at `path` and open it read-write.
    ///
    /// The file is created if missing, then sized to `n_bytes` rounded up
    /// to a whole number of blocks. Existing content up to the new size is
    /// preserved; content beyond it is cut off.
    pub fn create(path: &str, n_bytes: u64) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;

        let size = round_to_blocks(n_bytes);
        file.set_len(size)?;
        log::debug!("sized image {} to {} bytes", path, size);

        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Open an existing image read-write without touching its size.
    pub fn reopen(path: &str) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;

        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Current length of the backing file in bytes.
    pub fn size(&self) -> Result<u64> {
        let file = self.file.lock().unwrap();
        Ok(file.metadata()?.len())
    }

    /// Flush buffered writes through to the host file.
    pub fn sync(&self) -> Result<()> {
        let file = self.file.lock().unwrap();
        file.sync_all()
    }
}

impl BlockDevice for FileDisk {
    /// A short read at end of file zero-fills the rest of `buf`.
    fn read_block(&self, block_id: u64, buf: &mut Block) -> Result<()> {
        let mut file = self.file.lock().unwrap();
        file.seek(SeekFrom::Start(block_id * BLOCK_SIZE as u64))?;

        buf.fill(0);
        let mut filled = 0;
        while filled < BLOCK_SIZE {
            match file.read(&mut buf[filled..])? {
                0 => break,
                n => filled += n,
            }
        }
        Ok(())
    }

    fn write_block(&self, block_id: u64, buf: &Block) -> Result<()> {
        let mut file = self.file.lock().unwrap();
        file.seek(SeekFrom::Start(block_id * BLOCK_SIZE as u64))?;
        file.write_all(buf)?;
        Ok(())
    }
}

/// Round a requested byte count up to a whole number of blocks.
fn round_to_blocks(n_bytes: u64) -> u64 {
    n_bytes.div_ceil(BLOCK_SIZE as u64) * BLOCK_SIZE as u64
}

/// Uniquely named image file under the system temp dir, removed on drop.
/// Test fixture shared by the disk-layer test modules.
#[cfg(test)]
pub struct TempImage(std::path::PathBuf);

#[cfg(test)]
impl TempImage {
    pub fn new() -> Self {
        let path =
            std::env::temp_dir().join(format!("minidisk-{}.img", uuid::Uuid::new_v4()));
        Self(path)
    }

    pub fn path(&self) -> &str {
        self.0.to_str().unwrap()
    }
}

#[cfg(test)]
impl Drop for TempImage {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}
