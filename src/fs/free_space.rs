//! structural free-space scans over the in-memory tables
//!
//! There is no allocation bitmap on disk, every decision is made by rescanning.
use std::fmt;

use bitvec::prelude::*;

use crate::error::{Result, VfsError};

use super::{Chain, DataBlock, INode, SuperBlock, Volume, MAP_LINE_WIDTH};

/// collect every block reachable from a live inode
///
/// a block reached twice is shared between files or part of a loop,
/// either way the volume is corrupted
pub(crate) fn claimed_blocks(
    superblock: &SuperBlock,
    inodes: &[INode],
    blocks: &[DataBlock],
) -> Result<BitVec<u8, Lsb0>> {
    let mut claimed = bitvec![u8, Lsb0; 0; blocks.len()];
    for inode in inodes.iter().filter(|inode| !inode.is_free()) {
        for link in Chain::new(superblock, blocks, inode) {
            let (index, _) = link?;
            if claimed.replace(index, true) {
                return Err(VfsError::CorruptVolume(format!(
                    "data block {index} belongs to more than one chain"
                )));
            }
        }
    }
    Ok(claimed)
}

/// for inode and data block allocation
impl Volume {
    /// check if an inode slot is free
    pub fn is_inode_free(&self, index: usize) -> bool {
        self.inode(index).map_or(false, INode::is_free)
    }

    /// check if a data block is free
    ///
    /// a free block has an all-zero payload and is not part of any live chain
    pub fn is_block_free(&self, index: usize) -> bool {
        let claimed = self.claimed.get(index).map_or(true, |bit| *bit);
        !claimed && self.block(index).map_or(false, DataBlock::is_zeroed)
    }

    pub fn first_free_inode(&self) -> Option<usize> {
        (0..self.inodes().len()).find(|index| self.is_inode_free(*index))
    }

    pub fn first_free_block(&self) -> Option<usize> {
        (0..self.blocks().len()).find(|index| self.is_block_free(*index))
    }

    /// first free block strictly after `index`
    pub fn next_free_block(&self, index: usize) -> Option<usize> {
        (index.saturating_add(1)..self.blocks().len()).find(|index| self.is_block_free(*index))
    }

    /// calculate the number of free data blocks
    pub fn count_free_blocks(&self) -> usize {
        (0..self.blocks().len())
            .filter(|index| self.is_block_free(*index))
            .count()
    }

    pub(crate) fn claim_block(&mut self, index: usize) {
        self.claimed.set(index, true);
    }

    pub(crate) fn release_block(&mut self, index: usize) {
        self.claimed.set(index, false);
    }

    /// one bit per inode slot, set if occupied
    pub fn inode_occupancy(&self) -> BitVec<u8, Lsb0> {
        (0..self.inodes().len())
            .map(|index| !self.is_inode_free(index))
            .collect()
    }

    /// one bit per data block, set if occupied
    pub fn block_occupancy(&self) -> BitVec<u8, Lsb0> {
        (0..self.blocks().len())
            .map(|index| !self.is_block_free(index))
            .collect()
    }

    pub fn occupancy_map(&self) -> OccupancyMap {
        OccupancyMap {
            inodes: render_map(&self.inode_occupancy()),
            blocks: render_map(&self.block_occupancy()),
        }
    }
}

/// printable occupancy of both tables, `*` for occupied and `0` for free slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyMap {
    pub inodes: String,
    pub blocks: String,
}

fn render_map(bits: &BitSlice<u8, Lsb0>) -> String {
    bits.chunks(MAP_LINE_WIDTH)
        .map(|line| {
            line.iter()
                .map(|bit| if *bit { '*' } else { '0' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl fmt::Display for OccupancyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "------INODES------")?;
        writeln!(f, "{}", self.inodes)?;
        writeln!(f, "----DATA BLOCKS----")?;
        write!(f, "{}", self.blocks)
    }
}
