use std::fmt;

use bincode::{Decode, Encode};

use crate::utils::traits::OnDiskRecord;

use super::BLOCK_PAYLOAD_SIZE;

/// one slot of the data block table
#[derive(Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct DataBlock {
    pub data: [u8; BLOCK_PAYLOAD_SIZE],
    /// byte offset of the next block of the file, `0` ends the chain
    pub next_block: u64,
}

impl OnDiskRecord for DataBlock {
    const SIZE: usize = BLOCK_PAYLOAD_SIZE + std::mem::size_of::<u64>();
}

impl Default for DataBlock {
    fn default() -> Self {
        DataBlock {
            data: [0u8; BLOCK_PAYLOAD_SIZE],
            next_block: 0,
        }
    }
}

impl DataBlock {
    /// copy up to [BLOCK_PAYLOAD_SIZE] bytes of `payload` into a new block
    pub fn new(payload: &[u8], next_block: u64) -> Self {
        let mut block = DataBlock {
            next_block,
            ..Default::default()
        };
        let len = payload.len().min(BLOCK_PAYLOAD_SIZE);
        block.data[..len].copy_from_slice(&payload[..len]);
        block
    }

    pub fn is_zeroed(&self) -> bool {
        self.data.iter().all(|b| *b == 0)
    }
}

impl fmt::Debug for DataBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let used = self
            .data
            .iter()
            .rposition(|b| *b != 0)
            .map_or(0, |p| p + 1);
        f.debug_struct("DataBlock")
            .field("data", &&self.data[..used])
            .field("next_block", &self.next_block)
            .finish()
    }
}
