//! error type shared by every volume operation
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while manipulating a volume.
///
/// Each variant is reported to the caller once; nothing is retried.
#[derive(Debug, Error)]
pub enum VfsError {
    #[error("volume {0:?} not found")]
    VolumeNotFound(PathBuf),

    /// bad magic, truncated image or a broken block chain
    #[error("volume is corrupted: {0}")]
    CorruptVolume(String),

    #[error("{0:?} already exists")]
    AlreadyExists(PathBuf),

    #[error("volume size {requested} is too small, at least {minimum} is needed")]
    VolumeTooSmall { requested: String, minimum: String },

    #[error("source file {0:?} not found")]
    SourceNotFound(PathBuf),

    #[error("path {0:?} has no usable file name")]
    InvalidName(PathBuf),

    #[error("file {0} already exists on the volume")]
    NameCollision(String),

    #[error("no free inodes left on the volume")]
    NoFreeINodes,

    #[error("not enough space: {needed} bytes needed, {available} bytes free")]
    InsufficientSpace { needed: u64, available: u64 },

    #[error("file {0} not found on the volume")]
    FileNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode on-disk record: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("failed to decode on-disk record: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

pub type Result<T> = std::result::Result<T, VfsError>;
