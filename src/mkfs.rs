//! create our filesystem
use std::path::Path;

use byte_unit::Byte;
use log::{info, warn};

use crate::{
    error::{Result, VfsError},
    fs::{codec, DataBlock, INode, SuperBlock},
    image_file::ImageFile,
    utils::fs_size_calculator,
};

/// create a new volume, given the path of the image file and its size
/// # Params
/// - `image_file_path`: the path of the image file, it must not exist yet
/// - `volume_size`: the size of the image file in bytes
///
/// # Return
/// the superblock of the new volume.
/// Nothing is left on disk when the volume can't be created.
pub fn create_volume<P>(image_file_path: P, volume_size: u64) -> Result<SuperBlock>
where
    P: AsRef<Path>,
{
    let image_file_path = image_file_path.as_ref();
    if image_file_path.exists() {
        return Err(VfsError::AlreadyExists(image_file_path.to_path_buf()));
    }
    let superblock = fs_size_calculator::compute_layout(volume_size)?;

    let created = ImageFile::create(image_file_path, volume_size)
        .and_then(|mut image| write_empty_tables(&mut image, &superblock));
    match created {
        Ok(()) => {}
        // somebody else owns that file
        Err(e @ VfsError::AlreadyExists(_)) => return Err(e),
        Err(e) => {
            warn!("creating {:?} failed, removing the partial image", image_file_path);
            let _ = std::fs::remove_file(image_file_path);
            return Err(e);
        }
    }

    info!(
        "created volume {:?} of {} with {} inodes and {} data blocks",
        image_file_path,
        Byte::from_bytes(volume_size as _).get_appropriate_unit(true),
        superblock.inode_count,
        superblock.block_count
    );
    Ok(superblock)
}

/// write the superblock and a zeroed record into every inode and data block slot
fn write_empty_tables(image: &mut ImageFile, superblock: &SuperBlock) -> Result<()> {
    let mut cursor = image.writer();
    codec::write_superblock(&mut cursor, superblock)?;
    let inode = INode::default();
    for index in 0..superblock.inode_count as usize {
        codec::write_inode(&mut cursor, superblock, index, &inode)?;
    }
    let block = DataBlock::default();
    for index in 0..superblock.block_count as usize {
        codec::write_data_block(&mut cursor, superblock, index, &block)?;
    }
    Ok(image.flush()?)
}
