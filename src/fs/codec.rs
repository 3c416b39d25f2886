//! seek-then-read/write access to the records of an image
//!
//! Indices are not range-checked here, [Volume](super::Volume) validates them
//! against the loaded tables before calling in.
use std::io::{Read, Seek, SeekFrom, Write};

use crate::{error::Result, utils::traits::OnDiskRecord};

use super::{DataBlock, INode, SuperBlock};

pub fn read_superblock<R>(r: &mut R) -> Result<SuperBlock>
where
    R: Read + Seek,
{
    r.seek(SeekFrom::Start(0))?;
    SuperBlock::decode_from(r)
}

pub fn write_superblock<W>(w: &mut W, superblock: &SuperBlock) -> Result<()>
where
    W: Write + Seek,
{
    w.seek(SeekFrom::Start(0))?;
    superblock.encode_into(w).map(|_size| ())
}

pub fn read_inode<R>(r: &mut R, superblock: &SuperBlock, index: usize) -> Result<INode>
where
    R: Read + Seek,
{
    r.seek(SeekFrom::Start(superblock.inode_offset(index)))?;
    INode::decode_from(r)
}

pub fn write_inode<W>(w: &mut W, superblock: &SuperBlock, index: usize, inode: &INode) -> Result<()>
where
    W: Write + Seek,
{
    w.seek(SeekFrom::Start(superblock.inode_offset(index)))?;
    inode.encode_into(w).map(|_size| ())
}

pub fn read_data_block<R>(r: &mut R, superblock: &SuperBlock, index: usize) -> Result<DataBlock>
where
    R: Read + Seek,
{
    r.seek(SeekFrom::Start(superblock.block_offset(index)))?;
    DataBlock::decode_from(r)
}

pub fn write_data_block<W>(
    w: &mut W,
    superblock: &SuperBlock,
    index: usize,
    block: &DataBlock,
) -> Result<()>
where
    W: Write + Seek,
{
    w.seek(SeekFrom::Start(superblock.block_offset(index)))?;
    block.encode_into(w).map(|_size| ())
}
