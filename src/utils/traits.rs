use std::io::{Read, Write};

use bincode::{config, Decode, Encode};

use crate::error::Result;

/// Trait for fixed-width records stored in the volume image
/// # Note
/// every integer is encoded with a fixed width in little-endian order
/// and byte arrays are written without a length prefix,
/// so each record always occupies exactly [OnDiskRecord::SIZE] bytes
pub trait OnDiskRecord: Encode + Decode<()> + Sized {
    /// size of one encoded record in bytes
    const SIZE: usize;

    /// encode into a writer implementing [Write](std::io::Write)
    /// # Returns
    /// The number of bytes written if successful
    fn encode_into<W>(&self, w: &mut W) -> Result<usize>
    where
        W: Write,
    {
        let config = config::legacy();
        Ok(bincode::encode_into_std_write(self, w, config)?)
    }

    /// encode into a [Vec](std::vec::Vec)
    fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let config = config::legacy();
        Ok(bincode::encode_to_vec(self, config)?)
    }

    /// decode from a reader implementing [Read](std::io::Read)
    fn decode_from<R>(r: &mut R) -> Result<Self>
    where
        R: Read,
    {
        let config = config::legacy();
        Ok(bincode::decode_from_std_read(r, config)?)
    }
}
