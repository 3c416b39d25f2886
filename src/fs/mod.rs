//! our single-file filesystem
pub mod chain;
pub mod codec;
pub mod data_block;
mod file_ops;
pub mod free_space;
pub mod inode;
pub mod superblock;
pub mod volume;
pub use chain::*;
pub use data_block::*;
pub use file_ops::*;
pub use inode::*;
pub use superblock::*;
pub use volume::*;

pub const FS_MAGIC: u64 = 2137;
/// capacity of the name buffer, including the terminating NUL
pub const FILE_NAME_SIZE: usize = 512;
pub const BLOCK_PAYLOAD_SIZE: usize = 1024;
/// 1 MiB
pub const MIN_VOLUME_SIZE: u64 = 1 << 20;
/// one inode slot for every this many bytes of volume
pub const BYTES_PER_INODE: u64 = 2048;
pub const MAP_LINE_WIDTH: usize = 80;
/// `first_block` of a file that owns no blocks (a zero-byte file)
pub const EMPTY_CHAIN: u64 = u64::MAX;
