//! forward-only walk over the data blocks of one file
use crate::error::{Result, VfsError};

use super::{DataBlock, INode, SuperBlock, BLOCK_PAYLOAD_SIZE};

/// iterator over the block indices of a file, in file order
///
/// The walk ends at a zero `next_block`, once the declared size is covered,
/// or with [VfsError::CorruptVolume] on an offset outside the block table or
/// a walk longer than the table itself.
pub struct Chain<'a> {
    superblock: &'a SuperBlock,
    blocks: &'a [DataBlock],
    next: u64,
    remaining: u64,
    steps: usize,
}

impl<'a> Chain<'a> {
    pub fn new(superblock: &'a SuperBlock, blocks: &'a [DataBlock], inode: &INode) -> Self {
        let next = if inode.has_blocks() {
            inode.first_block
        } else {
            0
        };
        Chain {
            superblock,
            blocks,
            next,
            remaining: inode.size,
            steps: 0,
        }
    }

    /// bytes of the file not yet covered by the blocks visited so far
    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl<'a> Iterator for Chain<'a> {
    /// block index and the number of payload bytes of it that belong to the file
    type Item = Result<(usize, usize)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == 0 || self.remaining == 0 {
            return None;
        }
        let offset = std::mem::take(&mut self.next);
        let Some(index) = self.superblock.block_index(offset) else {
            return Some(Err(VfsError::CorruptVolume(format!(
                "block offset {offset} is outside the block table"
            ))));
        };
        self.steps += 1;
        if self.steps > self.blocks.len() {
            return Some(Err(VfsError::CorruptVolume(
                "block chain loops back on itself".into(),
            )));
        }
        let len = self.remaining.min(BLOCK_PAYLOAD_SIZE as u64);
        self.remaining -= len;
        self.next = self.blocks[index].next_block;
        Some(Ok((index, len as usize)))
    }
}
