use std::path::Path;

use crate::disk::{
    block_device::BlockDevice,
    error::{DiskError, Result},
    file_disk::FileDisk,
    types::{Block, DiskId, BLOCK_SIZE},
};

/// One tracked disk: the backing image path plus, while the disk is open,
/// the device itself. A closed disk keeps its slot so its handle stays
/// valid for a later re-open.
#[derive(Debug)]
struct Disk {
    filename: String,
    device: Option<FileDisk>,
}

/// Snapshot of one registry entry, for display layers.
#[derive(Debug, Clone)]
pub struct DiskInfo {
    pub id: DiskId,
    pub filename: String,
    pub is_open: bool,
}

/// Registry of virtual disks.
///
/// Hands out stable integer handles: a disk's handle is its index in the
/// table, assigned at first open and never reassigned. Re-opening a
/// filename the registry already tracks re-points that entry's device and
/// returns the original handle.
#[derive(Debug)]
pub struct DiskRegistry {
    disks: Vec<Disk>,
}

impl DiskRegistry {
    pub fn new() -> Self {
        Self { disks: Vec::new() }
    }

    /// Open (and possibly create or resize) the disk image at `filename`.
    ///
    /// With `n_bytes > 0` the image is created if missing and sized to
    /// `n_bytes` rounded up to a whole number of blocks; existing content
    /// up to the new size survives. With `n_bytes == 0` the image must
    /// already exist and is opened as-is.
    pub fn open_disk(&mut self, filename: &str, n_bytes: u64) -> Result<DiskId> {
        let device = if n_bytes > 0 {
            FileDisk::create(filename, n_bytes)?
        } else {
            if !Path::new(filename).exists() {
                return Err(DiskError::NoSuchImage(filename.to_string()));
            }
            FileDisk::reopen(filename)?
        };

        if let Some(id) = self.find(filename) {
            self.disks[id].device = Some(device);
            log::debug!("reopened disk {} ({})", id, filename);
            return Ok(id);
        }

        self.disks.push(Disk {
            filename: filename.to_string(),
            device: Some(device),
        });
        let id = self.disks.len() - 1;
        log::info!("registered disk {} ({})", id, filename);
        Ok(id)
    }

    /// Read logical block `block_num` into `buf`.
    ///
    /// Block numbers are not range-checked against the image size; reading
    /// past end of file yields zero-filled bytes.
    pub fn read_block(&self, disk: DiskId, block_num: u64, buf: &mut Block) -> Result<()> {
        let device = self.open_device(disk)?;
        device.read_block(block_num, buf)?;
        Ok(())
    }

    /// Write exactly one block taken from `data` at logical block
    /// `block_num`: input longer than a block is truncated, shorter input
    /// is zero-padded. Writing past end of file extends the image.
    pub fn write_block(&self, disk: DiskId, block_num: u64, data: &[u8]) -> Result<()> {
        let device = self.open_device(disk)?;

        let mut block: Block = [0; BLOCK_SIZE];
        let n = data.len().min(BLOCK_SIZE);
        block[..n].copy_from_slice(&data[..n]);

        device.write_block(block_num, &block)?;
        Ok(())
    }

    /// Close the disk: flush buffered writes, release the backing file,
    /// keep the slot. Closing an already-closed disk is an error.
    pub fn close_disk(&mut self, disk: DiskId) -> Result<()> {
        let slot = self
            .disks
            .get_mut(disk)
            .ok_or(DiskError::UnknownDisk(disk))?;

        match slot.device.take() {
            Some(device) => {
                device.sync()?;
                log::debug!("closed disk {} ({})", disk, slot.filename);
                Ok(())
            }
            None => Err(DiskError::DiskClosed(disk)),
        }
    }

    /// Current size of an open disk's backing image, in bytes.
    pub fn size_of(&self, disk: DiskId) -> Result<u64> {
        let device = self.open_device(disk)?;
        Ok(device.size()?)
    }

    /// Snapshot of every tracked disk, open or closed.
    pub fn list(&self) -> Vec<DiskInfo> {
        self.disks
            .iter()
            .enumerate()
            .map(|(id, d)| DiskInfo {
                id,
                filename: d.filename.clone(),
                is_open: d.device.is_some(),
            })
            .collect()
    }

    fn find(&self, filename: &str) -> Option<DiskId> {
        self.disks.iter().position(|d| d.filename == filename)
    }

    fn open_device(&self, disk: DiskId) -> Result<&FileDisk> {
        let slot = self.disks.get(disk).ok_or(DiskError::UnknownDisk(disk))?;
        slot.device.as_ref().ok_or(DiskError::DiskClosed(disk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::file_disk::TempImage;

    #[test]
    fn write_then_read_round_trips() {
        let img = TempImage::new();
        let mut registry = DiskRegistry::new();
        let disk = registry.open_disk(img.path(), 2560).unwrap();

        let data: Block = [0x3c; BLOCK_SIZE];
        registry.write_block(disk, 4, &data).unwrap();

        let mut out: Block = [0; BLOCK_SIZE];
        registry.read_block(disk, 4, &mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn reopening_the_same_image_returns_the_same_handle() {
        let img = TempImage::new();
        let mut registry = DiskRegistry::new();

        let first = registry.open_disk(img.path(), 1024).unwrap();
        let second = registry.open_disk(img.path(), 1024).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn distinct_images_get_distinct_handles() {
        let a = TempImage::new();
        let b = TempImage::new();
        let mut registry = DiskRegistry::new();

        let first = registry.open_disk(a.path(), 512).unwrap();
        let second = registry.open_disk(b.path(), 512).unwrap();
        assert_ne!(first, second);
        assert_eq!(first, 0);
        assert_eq!(second, 1);
    }

    #[test]
    fn handles_work_as_indices_after_several_opens() {
        let a = TempImage::new();
        let b = TempImage::new();
        let mut registry = DiskRegistry::new();

        registry.open_disk(a.path(), 512).unwrap();
        let second = registry.open_disk(b.path(), 512).unwrap();

        // the handle returned at creation must address the same disk later
        let data: Block = [0x11; BLOCK_SIZE];
        registry.write_block(second, 0, &data).unwrap();
        let mut out: Block = [0; BLOCK_SIZE];
        registry.read_block(second, 0, &mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn unknown_handles_are_rejected() {
        let img = TempImage::new();
        let mut registry = DiskRegistry::new();
        registry.open_disk(img.path(), 512).unwrap();

        let mut buf: Block = [0; BLOCK_SIZE];
        assert!(matches!(
            registry.read_block(5, 0, &mut buf),
            Err(DiskError::UnknownDisk(5))
        ));
        assert!(matches!(
            registry.write_block(5, 0, &buf),
            Err(DiskError::UnknownDisk(5))
        ));
        assert!(matches!(
            registry.close_disk(5),
            Err(DiskError::UnknownDisk(5))
        ));
    }

    #[test]
    fn opening_a_missing_image_with_zero_size_fails() {
        let img = TempImage::new(); // never created on disk
        let mut registry = DiskRegistry::new();
        let result = registry.open_disk(img.path(), 0);
        assert!(matches!(result, Err(DiskError::NoSuchImage(_))));
        assert!(registry.list().is_empty());
    }

    #[test]
    fn short_writes_are_zero_padded() {
        let img = TempImage::new();
        let mut registry = DiskRegistry::new();
        let disk = registry.open_disk(img.path(), 512).unwrap();

        registry.write_block(disk, 0, b"hello").unwrap();

        let mut out: Block = [0xff; BLOCK_SIZE];
        registry.read_block(disk, 0, &mut out).unwrap();
        assert_eq!(&out[..5], b"hello");
        assert_eq!(out[5..], [0u8; BLOCK_SIZE - 5]);
    }

    #[test]
    fn long_writes_are_truncated_to_one_block() {
        let img = TempImage::new();
        let mut registry = DiskRegistry::new();
        let disk = registry.open_disk(img.path(), 1024).unwrap();

        let data = vec![0x77u8; BLOCK_SIZE + 100];
        registry.write_block(disk, 0, &data).unwrap();

        // the spill must not leak into the next block
        let mut out: Block = [0; BLOCK_SIZE];
        registry.read_block(disk, 1, &mut out).unwrap();
        assert_eq!(out, [0u8; BLOCK_SIZE]);
    }

    #[test]
    fn ten_block_disk_scenario() {
        let img = TempImage::new();
        let mut registry = DiskRegistry::new();

        let disk = registry.open_disk(img.path(), 2560).unwrap();
        assert_eq!(disk, 0);
        assert_eq!(registry.size_of(disk).unwrap(), 2560);

        let data: Block = [0x41; BLOCK_SIZE];
        registry.write_block(disk, 3, &data).unwrap();

        let mut out: Block = [0; BLOCK_SIZE];
        registry.read_block(disk, 3, &mut out).unwrap();
        assert_eq!(out, data);

        registry.close_disk(disk).unwrap();
        assert!(matches!(
            registry.read_block(disk, 3, &mut out),
            Err(DiskError::DiskClosed(0))
        ));
    }

    #[test]
    fn double_close_fails() {
        let img = TempImage::new();
        let mut registry = DiskRegistry::new();
        let disk = registry.open_disk(img.path(), 512).unwrap();

        registry.close_disk(disk).unwrap();
        assert!(matches!(
            registry.close_disk(disk),
            Err(DiskError::DiskClosed(_))
        ));
    }

    #[test]
    fn closed_disk_can_be_reopened_under_its_old_handle() {
        let img = TempImage::new();
        let mut registry = DiskRegistry::new();

        let disk = registry.open_disk(img.path(), 1024).unwrap();
        let data: Block = [0x99; BLOCK_SIZE];
        registry.write_block(disk, 2, &data).unwrap();
        registry.close_disk(disk).unwrap();

        // size 0: open as-is, no resize
        let again = registry.open_disk(img.path(), 0).unwrap();
        assert_eq!(again, disk);
        assert_eq!(registry.size_of(again).unwrap(), 1024);

        let mut out: Block = [0; BLOCK_SIZE];
        registry.read_block(again, 2, &mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn list_reports_open_state() {
        let a = TempImage::new();
        let b = TempImage::new();
        let mut registry = DiskRegistry::new();

        let first = registry.open_disk(a.path(), 512).unwrap();
        registry.open_disk(b.path(), 512).unwrap();
        registry.close_disk(first).unwrap();

        let infos = registry.list();
        assert_eq!(infos.len(), 2);
        assert!(!infos[0].is_open);
        assert!(infos[1].is_open);
        assert_eq!(infos[0].filename, a.path());
    }
}
