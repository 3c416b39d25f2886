//! what does our filesystem look like in the memory

use std::{
    fmt,
    path::{Path, PathBuf},
};

use bitvec::prelude::*;
use byte_unit::Byte;
use log::{debug, info};

use crate::{
    error::{Result, VfsError},
    image_file::ImageFile,
    utils::traits::OnDiskRecord,
};

use super::{codec, free_space, DataBlock, INode, SuperBlock, BLOCK_PAYLOAD_SIZE};

/// one opened volume
///
/// it holds the superblock and in-memory mirrors of both tables.
/// The image file itself is only mapped while a mutation is written back,
/// every mutated record is flushed to the file before the mutating call returns.
#[derive(Debug)]
pub struct Volume {
    /// path of the image file
    path: PathBuf,
    /// the superblock of this filesystem
    superblock: SuperBlock,
    inodes: Vec<INode>,
    blocks: Vec<DataBlock>,
    /// blocks reachable from a live inode, rebuilt on every open and never persisted
    pub(super) claimed: BitVec<u8, Lsb0>,
}

impl Volume {
    /// load a volume
    /// # Params
    /// - `path`: the path of the image file
    /// # Return
    /// [VfsError::VolumeNotFound] if there is no such file,
    /// [VfsError::CorruptVolume] if it is not a volume of this format
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let image = ImageFile::open(path)?;
        let mut reader = image.reader();

        let superblock = codec::read_superblock(&mut reader)?;
        superblock.validate(image.len())?;
        let inodes = (0..superblock.inode_count as usize)
            .map(|index| codec::read_inode(&mut reader, &superblock, index))
            .collect::<Result<Vec<_>>>()?;
        let blocks = (0..superblock.block_count as usize)
            .map(|index| codec::read_data_block(&mut reader, &superblock, index))
            .collect::<Result<Vec<_>>>()?;
        let claimed = free_space::claimed_blocks(&superblock, &inodes, &blocks)?;

        debug!(
            "opened volume {:?}: {} inodes, {} data blocks",
            path, superblock.inode_count, superblock.block_count
        );
        Ok(Volume {
            path: path.to_path_buf(),
            superblock,
            inodes,
            blocks,
            claimed,
        })
    }

    /// end this session
    ///
    /// every mutation has already been written through, nothing is left to flush
    pub fn close(self) {
        debug!("closed volume {:?}", self.path);
    }
}

/// get [SuperBlock] and the table mirrors of this volume
impl Volume {
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn superblock(&self) -> &SuperBlock {
        &self.superblock
    }

    #[inline]
    pub fn inodes(&self) -> &[INode] {
        &self.inodes
    }

    #[inline]
    pub fn blocks(&self) -> &[DataBlock] {
        &self.blocks
    }

    pub fn inode(&self, index: usize) -> Option<&INode> {
        self.inodes.get(index)
    }

    pub fn block(&self, index: usize) -> Option<&DataBlock> {
        self.blocks.get(index)
    }
}

/// write-back of single records
impl Volume {
    /// map the image file for writing
    pub(crate) fn image(&self) -> Result<ImageFile> {
        ImageFile::open(&self.path)
    }

    pub(crate) fn store_inode(
        &mut self,
        image: &mut ImageFile,
        index: usize,
        inode: INode,
    ) -> Result<()> {
        if index >= self.inodes.len() {
            return Err(VfsError::CorruptVolume(format!(
                "inode {index} is outside the inode table"
            )));
        }
        codec::write_inode(&mut image.writer(), &self.superblock, index, &inode)?;
        image.flush_range(self.superblock.inode_offset(index), INode::SIZE)?;
        self.inodes[index] = inode;
        Ok(())
    }

    pub(crate) fn store_block(
        &mut self,
        image: &mut ImageFile,
        index: usize,
        block: DataBlock,
    ) -> Result<()> {
        if index >= self.blocks.len() {
            return Err(VfsError::CorruptVolume(format!(
                "block {index} is outside the block table"
            )));
        }
        codec::write_data_block(&mut image.writer(), &self.superblock, index, &block)?;
        image.flush_range(self.superblock.block_offset(index), DataBlock::SIZE)?;
        self.blocks[index] = block;
        Ok(())
    }
}

/// geometry and usage of a volume
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeInfo {
    pub superblock: SuperBlock,
    pub used_inodes: usize,
    pub free_blocks: usize,
}

impl Volume {
    pub fn info(&self) -> VolumeInfo {
        let info = VolumeInfo {
            superblock: self.superblock,
            used_inodes: self.inodes.iter().filter(|inode| !inode.is_free()).count(),
            free_blocks: self.count_free_blocks(),
        };
        info!("volume {:?}: {:?}", self.path, info);
        info
    }
}

impl fmt::Display for VolumeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sb = &self.superblock;
        let free_bytes = self.free_blocks as u64 * BLOCK_PAYLOAD_SIZE as u64;
        writeln!(
            f,
            "volume size:   {}",
            Byte::from_bytes(sb.volume_size as _).get_appropriate_unit(true)
        )?;
        writeln!(f, "inodes:        {} used / {}", self.used_inodes, sb.inode_count)?;
        writeln!(f, "data blocks:   {} free / {}", self.free_blocks, sb.block_count)?;
        writeln!(f, "inode table:   at byte {}", sb.inode_table_start)?;
        writeln!(f, "block table:   at byte {}", sb.block_table_start)?;
        write!(
            f,
            "free capacity: {}",
            Byte::from_bytes(free_bytes as _).get_appropriate_unit(true)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mkfs::create_volume,
        utils::{fs_size_calculator::compute_layout, init_test_environment::temp_image_path},
    };

    #[test]
    fn test_open_fresh_volume() -> anyhow::Result<()> {
        let path = temp_image_path("volume_open_fresh");
        create_volume(&path, 1 << 20)?;
        let volume = Volume::open(&path)?;
        assert_eq!(*volume.superblock(), compute_layout(1 << 20)?);
        assert_eq!(volume.inodes().len(), 512);
        assert_eq!(volume.blocks().len(), 754);
        assert!(volume.inodes().iter().all(INode::is_free));
        assert!(volume.inode(512).is_none());
        assert!(volume.block(753).is_some());

        let info = volume.info();
        assert_eq!(info.used_inodes, 0);
        assert_eq!(info.free_blocks, 754);
        volume.close();
        std::fs::remove_file(&path)?;
        Ok(())
    }

    #[test]
    fn test_open_foreign_file() -> anyhow::Result<()> {
        let path = temp_image_path("volume_open_foreign");
        std::fs::write(&path, vec![0xabu8; 1 << 20])?;
        assert!(matches!(
            Volume::open(&path),
            Err(VfsError::CorruptVolume(_))
        ));
        std::fs::remove_file(&path)?;
        Ok(())
    }

    #[test]
    fn test_open_missing() {
        let path = temp_image_path("volume_open_missing");
        assert!(matches!(
            Volume::open(&path),
            Err(VfsError::VolumeNotFound(_))
        ));
    }

    #[test]
    fn test_open_truncated_volume() -> anyhow::Result<()> {
        let path = temp_image_path("volume_open_truncated");
        create_volume(&path, 1 << 20)?;
        let file = std::fs::OpenOptions::new().write(true).open(&path)?;
        file.set_len(4096)?;
        drop(file);
        assert!(matches!(
            Volume::open(&path),
            Err(VfsError::CorruptVolume(_))
        ));
        std::fs::remove_file(&path)?;
        Ok(())
    }

    #[test]
    fn test_store_writes_through() -> anyhow::Result<()> {
        let path = temp_image_path("volume_store");
        create_volume(&path, 1 << 20)?;
        let mut volume = Volume::open(&path)?;
        let mut image = volume.image()?;
        let head = volume.superblock().block_offset(0);
        volume.store_inode(&mut image, 5, INode::new("x", 3, head))?;
        volume.store_block(&mut image, 0, DataBlock::new(b"xyz", 0))?;
        assert!(volume
            .store_block(&mut image, 754, DataBlock::default())
            .is_err());
        drop(image);

        let reloaded = Volume::open(&path)?;
        assert_eq!(reloaded.inode(5), volume.inode(5));
        assert_eq!(reloaded.block(0), volume.block(0));
        std::fs::remove_file(&path)?;
        Ok(())
    }

    #[test]
    fn test_open_rejects_bad_chain() -> anyhow::Result<()> {
        let path = temp_image_path("volume_bad_chain");
        let superblock = create_volume(&path, 1 << 20)?;
        {
            let mut image = ImageFile::open(&path)?;
            // head offset points into the inode table
            codec::write_inode(&mut image.writer(), &superblock, 0, &INode::new("bad", 10, 64))?;
            image.flush()?;
        }
        assert!(matches!(
            Volume::open(&path),
            Err(VfsError::CorruptVolume(_))
        ));
        std::fs::remove_file(&path)?;
        Ok(())
    }
}
