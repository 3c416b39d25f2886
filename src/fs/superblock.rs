use bincode::{Decode, Encode};

use crate::{
    error::{Result, VfsError},
    utils::traits::OnDiskRecord,
};

use super::{DataBlock, INode, FS_MAGIC};

/// The superblock of this filesystem, stored at offset 0 of the image
///
/// It is written once when the volume is created and never changes afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Encode, Decode)]
pub struct SuperBlock {
    /// magic number
    pub magic: u64,
    /// total size of the image file in bytes
    pub volume_size: u64,
    pub inode_count: u64,
    pub block_count: u64,
    /// byte offset of the first inode record
    pub inode_table_start: u64,
    /// byte offset of the first data block record
    pub block_table_start: u64,
}

impl OnDiskRecord for SuperBlock {
    const SIZE: usize = 6 * std::mem::size_of::<u64>();
}

/// record addressing
impl SuperBlock {
    #[inline]
    pub fn inode_offset(&self, index: usize) -> u64 {
        self.inode_table_start + index as u64 * INode::SIZE as u64
    }

    #[inline]
    pub fn block_offset(&self, index: usize) -> u64 {
        self.block_table_start + index as u64 * DataBlock::SIZE as u64
    }

    /// map a `next_block`/`first_block` byte offset back to a block index
    ///
    /// returns `None` if the offset is not the start of a block record in the table
    pub fn block_index(&self, offset: u64) -> Option<usize> {
        let relative = offset.checked_sub(self.block_table_start)?;
        if relative % DataBlock::SIZE as u64 != 0 {
            return None;
        }
        let index = relative / DataBlock::SIZE as u64;
        if index >= self.block_count {
            return None;
        }
        usize::try_from(index).ok()
    }

    /// first byte past the block table
    #[inline]
    pub fn end_of_tables(&self) -> u64 {
        self.block_offset(self.block_count as usize)
    }
}

impl SuperBlock {
    /// check magic number and geometry against the length of the image file
    pub fn validate(&self, image_len: u64) -> Result<()> {
        if self.magic != FS_MAGIC {
            return Err(VfsError::CorruptVolume(format!(
                "invalid magic number {}, expected {}",
                self.magic, FS_MAGIC
            )));
        }
        let inode_table_end = self
            .inode_count
            .checked_mul(INode::SIZE as u64)
            .and_then(|len| len.checked_add(self.inode_table_start));
        if self.inode_table_start < SuperBlock::SIZE as u64
            || inode_table_end != Some(self.block_table_start)
        {
            return Err(VfsError::CorruptVolume(
                "inode table does not end where the block table starts".into(),
            ));
        }
        let block_table_end = self
            .block_count
            .checked_mul(DataBlock::SIZE as u64)
            .and_then(|len| len.checked_add(self.block_table_start));
        match block_table_end {
            Some(end) if end <= self.volume_size && end <= image_len => Ok(()),
            _ => Err(VfsError::CorruptVolume(format!(
                "block table exceeds the image ({} bytes)",
                image_len
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fs_size_calculator::compute_layout;
    use std::io::Cursor;

    #[test]
    fn test_superblock_record_size() -> anyhow::Result<()> {
        let superblock = compute_layout(1 << 20)?;
        assert_eq!(superblock.encode_to_vec()?.len(), SuperBlock::SIZE);
        assert_eq!(SuperBlock::SIZE, 48);
        Ok(())
    }

    #[test]
    fn test_superblock_serialization_and_deserialization() -> anyhow::Result<()> {
        let superblock = compute_layout(3 << 20)?;
        let mut cursor = Cursor::new(Vec::new());
        superblock.encode_into(&mut cursor)?;
        cursor.set_position(0);
        assert_eq!(SuperBlock::decode_from(&mut cursor)?, superblock);
        // first field is the magic number
        assert_eq!(&cursor.get_ref()[..8], &2137u64.to_le_bytes());
        Ok(())
    }

    #[test]
    fn test_block_index() {
        let superblock = compute_layout(1 << 20).unwrap();
        let start = superblock.block_table_start;
        assert_eq!(superblock.block_index(start), Some(0));
        assert_eq!(superblock.block_index(superblock.block_offset(7)), Some(7));
        // not aligned to a record
        assert_eq!(superblock.block_index(start + 1), None);
        // inside the inode table
        assert_eq!(superblock.block_index(0), None);
        // past the end of the table
        assert_eq!(superblock.block_index(superblock.end_of_tables()), None);
    }

    #[test]
    fn test_validate() {
        let superblock = compute_layout(1 << 20).unwrap();
        assert!(superblock.validate(1 << 20).is_ok());
        // image truncated before the end of the block table
        assert!(matches!(
            superblock.validate(superblock.end_of_tables() - 1),
            Err(VfsError::CorruptVolume(_))
        ));

        let foreign = SuperBlock {
            magic: 0x1324a,
            ..superblock
        };
        assert!(matches!(
            foreign.validate(1 << 20),
            Err(VfsError::CorruptVolume(_))
        ));

        let shifted = SuperBlock {
            block_table_start: superblock.block_table_start + 1,
            ..superblock
        };
        assert!(matches!(
            shifted.validate(1 << 20),
            Err(VfsError::CorruptVolume(_))
        ));
    }
}
