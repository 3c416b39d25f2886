pub mod cli_interface;
pub mod commands;
pub mod error;
mod fs;
pub mod image_file;
pub mod mkfs;
pub mod utils;
pub use error::{Result, VfsError};
pub use fs::*;
