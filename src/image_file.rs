//! the backing file of a volume, mapped into memory for the duration of one operation
use std::{
    fs::{File, OpenOptions},
    io::{self, Cursor, ErrorKind},
    path::Path,
};

use memmap2::MmapMut;

use crate::{
    error::{Result, VfsError},
    fs::SuperBlock,
    utils::traits::OnDiskRecord,
};

/// a read-write mapping of an image file
///
/// The mapping is released when this value is dropped,
/// so every early return of an operation gives the handle back.
#[derive(Debug)]
pub struct ImageFile {
    mmap: MmapMut,
}

impl ImageFile {
    /// open an existing image
    /// # Return
    /// [VfsError::VolumeNotFound] if there is no file at `path`,
    /// [VfsError::CorruptVolume] if it can't even hold a superblock
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        // open the "device" for read and write
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => VfsError::VolumeNotFound(path.to_path_buf()),
                _ => e.into(),
            })?;
        let len = file.metadata()?.len();
        if len < SuperBlock::SIZE as u64 {
            return Err(VfsError::CorruptVolume(format!(
                "image is only {len} bytes long"
            )));
        }
        Self::map(&file)
    }

    /// create a new image of exactly `len` bytes, all zero
    /// # Return
    /// [VfsError::AlreadyExists] if something already lives at `path`
    pub fn create<P>(path: P, len: u64) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => VfsError::AlreadyExists(path.to_path_buf()),
                _ => e.into(),
            })?;
        // all regions are set to zero by `set_len`
        file.set_len(len)?;
        Self::map(&file)
    }

    fn map(file: &File) -> Result<Self> {
        // Safety
        // the mapping is only valid as long as no other process truncates the file,
        // a volume is never shared between processes
        let mmap = unsafe { MmapMut::map_mut(file)? };
        Ok(ImageFile { mmap })
    }

    pub fn len(&self) -> u64 {
        self.mmap.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// a seekable reader over the whole image
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(&self.mmap[..])
    }

    /// a seekable writer over the whole image, it never grows the file
    pub fn writer(&mut self) -> Cursor<&mut [u8]> {
        Cursor::new(&mut self.mmap[..])
    }

    /// write `len` bytes starting at `offset` back to the file
    pub fn flush_range(&self, offset: u64, len: usize) -> io::Result<()> {
        self.mmap.flush_range(offset as usize, len)
    }

    pub fn flush(&self) -> io::Result<()> {
        self.mmap.flush()
    }
}
