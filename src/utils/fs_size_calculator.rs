//! This module computes the geometry of a volume from its size
//!
//! Nothing here touches the image file, so the geometry of any volume can be
//! recomputed or audited from its size alone.

use byte_unit::Byte;

use crate::{
    error::{Result, VfsError},
    fs::{DataBlock, INode, SuperBlock, BYTES_PER_INODE, FS_MAGIC, MIN_VOLUME_SIZE},
    utils::traits::OnDiskRecord,
};

/// calculate the number of inode slots
/// # Example
/// ```
/// use blockvfs::utils::fs_size_calculator::inode_count;
/// assert_eq!(inode_count(1 << 20), 512);
/// ```
pub const fn inode_count(volume_size: u64) -> u64 {
    volume_size / BYTES_PER_INODE
}

/// calculate the number of data blocks left after the superblock and inode table
/// # Example
/// ```
/// use blockvfs::utils::fs_size_calculator::block_count;
/// // (1 MiB - 48 - 512 * 528) / 1032
/// assert_eq!(block_count(1 << 20), 754);
/// ```
pub const fn block_count(volume_size: u64) -> u64 {
    let metadata = SuperBlock::SIZE as u64 + inode_count(volume_size) * INode::SIZE as u64;
    volume_size.saturating_sub(metadata) / DataBlock::SIZE as u64
}

/// compute the superblock of a volume of `volume_size` bytes
/// # Return
/// [VfsError::VolumeTooSmall] if `volume_size` is below [MIN_VOLUME_SIZE]
/// # Example
/// ```
/// use blockvfs::utils::fs_size_calculator::compute_layout;
/// let superblock = compute_layout(1 << 20).unwrap();
/// assert_eq!(superblock.inode_table_start, 48);
/// assert_eq!(superblock.block_table_start, 48 + 512 * 528);
/// assert!(compute_layout((1 << 20) - 1).is_err());
/// ```
pub fn compute_layout(volume_size: u64) -> Result<SuperBlock> {
    if volume_size < MIN_VOLUME_SIZE {
        return Err(VfsError::VolumeTooSmall {
            requested: Byte::from_bytes(volume_size as _)
                .get_appropriate_unit(true)
                .to_string(),
            minimum: Byte::from_bytes(MIN_VOLUME_SIZE as _)
                .get_appropriate_unit(true)
                .to_string(),
        });
    }
    let inode_count = inode_count(volume_size);
    let inode_table_start = SuperBlock::SIZE as u64;
    Ok(SuperBlock {
        magic: FS_MAGIC,
        volume_size,
        inode_count,
        block_count: block_count(volume_size),
        inode_table_start,
        block_table_start: inode_table_start + inode_count * INode::SIZE as u64,
    })
}
