use bincode::{Decode, Encode};

use crate::utils::traits::OnDiskRecord;

use super::{EMPTY_CHAIN, FILE_NAME_SIZE};

/// one slot of the inode table
///
/// A slot is free iff both `size` and `first_block` are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct INode {
    /// NUL-padded file name
    pub name: [u8; FILE_NAME_SIZE],
    /// file size in bytes
    pub size: u64,
    /// byte offset of the first data block,
    /// `0` for a free slot and [EMPTY_CHAIN] for a zero-byte file
    pub first_block: u64,
}

impl OnDiskRecord for INode {
    const SIZE: usize = FILE_NAME_SIZE + 2 * std::mem::size_of::<u64>();
}

impl Default for INode {
    fn default() -> Self {
        INode {
            name: [0u8; FILE_NAME_SIZE],
            size: 0,
            first_block: 0,
        }
    }
}

impl INode {
    pub fn new(name: impl AsRef<[u8]>, size: u64, first_block: u64) -> Self {
        INode {
            name: encode_name(name),
            size,
            first_block,
        }
    }

    pub fn is_free(&self) -> bool {
        self.size == 0 && self.first_block == 0
    }

    /// whether this file owns a chain of data blocks
    pub fn has_blocks(&self) -> bool {
        self.first_block != 0 && self.first_block != EMPTY_CHAIN
    }

    /// the stored name, without the NUL padding
    pub fn name_bytes(&self) -> &[u8] {
        let len = self
            .name
            .iter()
            .position(|b| *b == 0)
            .unwrap_or(FILE_NAME_SIZE);
        &self.name[..len]
    }

    pub fn file_name(&self) -> String {
        String::from_utf8_lossy(self.name_bytes()).into_owned()
    }

    /// compare against a name the way it would be stored
    pub fn has_name(&self, name: impl AsRef<[u8]>) -> bool {
        self.name == encode_name(name)
    }
}

/// truncate `name` to `FILE_NAME_SIZE - 1` bytes and pad it with NULs,
/// stopping early at an embedded NUL
pub fn encode_name(name: impl AsRef<[u8]>) -> [u8; FILE_NAME_SIZE] {
    let mut buf = [0u8; FILE_NAME_SIZE];
    let name = name.as_ref();
    let name = match name.iter().position(|b| *b == 0) {
        Some(nul) => &name[..nul],
        None => name,
    };
    let len = name.len().min(FILE_NAME_SIZE - 1);
    buf[..len].copy_from_slice(&name[..len]);
    buf
}
