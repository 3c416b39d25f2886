//! whole-file operations executed against an opened [Volume]
use std::{
    fs::File,
    io::{BufReader, BufWriter, ErrorKind, Read, Write},
    path::Path,
};

use log::{info, warn};

use crate::error::{Result, VfsError};

use super::{Chain, DataBlock, INode, Volume, BLOCK_PAYLOAD_SIZE, EMPTY_CHAIN};

/// a host file opened for import
#[derive(Debug)]
pub struct SourceFile {
    /// base name of the host path, the name the file gets on the volume
    pub name: String,
    pub size: u64,
    pub file: File,
}

impl SourceFile {
    /// # Return
    /// [VfsError::SourceNotFound] if `path` is missing or not a regular file
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => VfsError::SourceNotFound(path.to_path_buf()),
            _ => e.into(),
        })?;
        let metadata = file.metadata()?;
        if !metadata.is_file() {
            return Err(VfsError::SourceNotFound(path.to_path_buf()));
        }
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| VfsError::InvalidName(path.to_path_buf()))?;
        Ok(SourceFile {
            name,
            size: metadata.len(),
            file,
        })
    }
}

/// where an imported file ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedFile {
    pub name: String,
    pub size: u64,
    pub inode: usize,
    /// indices of the data blocks, in file order
    pub blocks: Vec<usize>,
}

/// lookups
impl Volume {
    /// index of the live inode called `name`
    pub fn find_file(&self, name: impl AsRef<[u8]>) -> Option<usize> {
        let name = name.as_ref();
        self.inodes()
            .iter()
            .position(|inode| !inode.is_free() && inode.has_name(name))
    }

    /// names of all files, in inode order
    pub fn file_names(&self) -> Vec<String> {
        self.inodes()
            .iter()
            .filter(|inode| !inode.is_free())
            .map(INode::file_name)
            .collect()
    }
}

/// import
impl Volume {
    /// copy an opened host file into the volume under its base name
    pub fn import_file(&mut self, source: SourceFile) -> Result<ImportedFile> {
        self.import(&source.name, BufReader::new(source.file), source.size)
    }

    /// store `size` bytes read from `source` as a new file called `name`
    ///
    /// The inode is written first, then every block is written as soon as it is filled.
    /// A failure halfway leaves a listed file whose chain ends early.
    pub fn import<R>(&mut self, name: &str, mut source: R, size: u64) -> Result<ImportedFile>
    where
        R: Read,
    {
        if self.find_file(name).is_some() {
            return Err(VfsError::NameCollision(name.to_string()));
        }
        let inode_index = self.first_free_inode().ok_or(VfsError::NoFreeINodes)?;
        let available = self.count_free_blocks() as u64 * BLOCK_PAYLOAD_SIZE as u64;
        if size > available {
            return Err(VfsError::InsufficientSpace {
                needed: size,
                available,
            });
        }

        let mut image = self.image()?;
        let mut imported = ImportedFile {
            name: name.to_string(),
            size,
            inode: inode_index,
            blocks: Vec::new(),
        };
        let Some(mut current) = self.first_free_block().filter(|_| size > 0) else {
            self.store_inode(&mut image, inode_index, INode::new(name, 0, EMPTY_CHAIN))?;
            info!("imported empty file {name} into inode {inode_index}");
            return Ok(imported);
        };

        let head = self.superblock().block_offset(current);
        self.store_inode(&mut image, inode_index, INode::new(name, size, head))?;

        let mut remaining = size;
        let mut buf = [0u8; BLOCK_PAYLOAD_SIZE];
        loop {
            let len = remaining.min(BLOCK_PAYLOAD_SIZE as u64) as usize;
            source.read_exact(&mut buf[..len])?;
            remaining -= len as u64;
            // claim first, so a zero payload is not handed out again below
            self.claim_block(current);

            let next = if remaining > 0 {
                let next = self
                    .next_free_block(current)
                    .ok_or(VfsError::InsufficientSpace {
                        needed: remaining,
                        available: 0,
                    })?;
                Some(next)
            } else {
                None
            };
            let next_offset = next.map_or(0, |next| self.superblock().block_offset(next));
            self.store_block(&mut image, current, DataBlock::new(&buf[..len], next_offset))?;
            imported.blocks.push(current);

            match next {
                Some(next) => current = next,
                None => break,
            }
        }

        info!(
            "imported {name} ({size} bytes) into inode {inode_index}, blocks {:?}",
            imported.blocks
        );
        Ok(imported)
    }
}

/// export and delete
impl Volume {
    /// copy the content of `name` into `dest`
    /// # Return
    /// the number of bytes written
    pub fn export<W>(&self, name: &str, mut dest: W) -> Result<u64>
    where
        W: Write,
    {
        let index = self
            .find_file(name)
            .ok_or_else(|| VfsError::FileNotFound(name.to_string()))?;
        let inode = &self.inodes()[index];
        let mut chain = Chain::new(self.superblock(), self.blocks(), inode);
        let mut written = 0u64;
        for link in chain.by_ref() {
            let (block, len) = link?;
            dest.write_all(&self.blocks()[block].data[..len])?;
            written += len as u64;
        }
        if chain.remaining() > 0 {
            warn!(
                "chain of {name} ends {} bytes short of its declared size",
                chain.remaining()
            );
        }
        dest.flush()?;
        Ok(written)
    }

    /// copy `name` out of the volume into a new host file at `dest_path`
    pub fn export_file<P>(&self, name: &str, dest_path: P) -> Result<u64>
    where
        P: AsRef<Path>,
    {
        if self.find_file(name).is_none() {
            return Err(VfsError::FileNotFound(name.to_string()));
        }
        let dest = BufWriter::new(File::create(dest_path.as_ref())?);
        let written = self.export(name, dest)?;
        info!("exported {name} ({written} bytes) to {:?}", dest_path.as_ref());
        Ok(written)
    }

    /// zero every block of `name` and then its inode
    /// # Return
    /// the indices of the released blocks
    pub fn delete_file(&mut self, name: &str) -> Result<Vec<usize>> {
        let index = self
            .find_file(name)
            .ok_or_else(|| VfsError::FileNotFound(name.to_string()))?;
        let blocks = Chain::new(self.superblock(), self.blocks(), &self.inodes()[index])
            .map(|link| link.map(|(block, _)| block))
            .collect::<Result<Vec<_>>>()?;

        let mut image = self.image()?;
        for &block in &blocks {
            self.store_block(&mut image, block, DataBlock::default())?;
            self.release_block(block);
        }
        self.store_inode(&mut image, index, INode::default())?;
        info!("deleted {name} from inode {index}, released blocks {blocks:?}");
        Ok(blocks)
    }
}
