//! one function per command verb
//!
//! Each call opens the volume, runs a single operation against it and closes it again,
//! no session outlives the command.
use std::path::Path;

use log::info;

use crate::{
    error::Result,
    fs::{free_space::OccupancyMap, ImportedFile, SourceFile, Volume, VolumeInfo},
};

/// remove a volume after checking that it really is one
pub fn delete_volume<P>(volume_path: P) -> Result<()>
where
    P: AsRef<Path>,
{
    let volume_path = volume_path.as_ref();
    Volume::open(volume_path)?.close();
    std::fs::remove_file(volume_path)?;
    info!("deleted volume {:?}", volume_path);
    Ok(())
}

/// copy a host file into the volume, named after its base name
pub fn import_file<P, Q>(volume_path: P, host_path: Q) -> Result<ImportedFile>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    // a missing source is reported before the volume is even looked at
    let source = SourceFile::open(host_path)?;
    let mut volume = Volume::open(volume_path)?;
    let imported = volume.import_file(source)?;
    volume.close();
    Ok(imported)
}

/// copy `file_name` out of the volume into `dest_path`
pub fn export_file<P, Q>(volume_path: P, file_name: &str, dest_path: Q) -> Result<u64>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let volume = Volume::open(volume_path)?;
    let written = volume.export_file(file_name, dest_path)?;
    volume.close();
    Ok(written)
}

pub fn delete_file<P>(volume_path: P, file_name: &str) -> Result<Vec<usize>>
where
    P: AsRef<Path>,
{
    let mut volume = Volume::open(volume_path)?;
    let released = volume.delete_file(file_name)?;
    volume.close();
    Ok(released)
}

pub fn list_files<P>(volume_path: P) -> Result<Vec<String>>
where
    P: AsRef<Path>,
{
    let volume = Volume::open(volume_path)?;
    let names = volume.file_names();
    volume.close();
    Ok(names)
}

pub fn occupancy_map<P>(volume_path: P) -> Result<OccupancyMap>
where
    P: AsRef<Path>,
{
    let volume = Volume::open(volume_path)?;
    let map = volume.occupancy_map();
    volume.close();
    Ok(map)
}

pub fn volume_info<P>(volume_path: P) -> Result<VolumeInfo>
where
    P: AsRef<Path>,
{
    let volume = Volume::open(volume_path)?;
    let info = volume.info();
    volume.close();
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::VfsError,
        mkfs::create_volume,
        utils::init_test_environment::{host_file, remove_host_file, sample_content, temp_image_path},
    };

    #[test]
    fn test_source_checked_before_volume() {
        let volume = temp_image_path("commands_source_first");
        let missing = temp_image_path("commands_source_first_host");
        // neither exists, the source is reported
        assert!(matches!(
            import_file(&volume, &missing),
            Err(VfsError::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_commands_on_missing_volume() {
        let volume = temp_image_path("commands_missing_volume");
        assert!(matches!(delete_volume(&volume), Err(VfsError::VolumeNotFound(_))));
        assert!(matches!(list_files(&volume), Err(VfsError::VolumeNotFound(_))));
        assert!(matches!(occupancy_map(&volume), Err(VfsError::VolumeNotFound(_))));
        assert!(matches!(delete_file(&volume, "a"), Err(VfsError::VolumeNotFound(_))));
    }

    #[test]
    fn test_delete_volume_refuses_foreign_file() -> anyhow::Result<()> {
        let path = temp_image_path("commands_delete_foreign");
        std::fs::write(&path, vec![7u8; 4096])?;
        assert!(matches!(delete_volume(&path), Err(VfsError::CorruptVolume(_))));
        assert!(path.exists());
        std::fs::remove_file(&path)?;
        Ok(())
    }

    #[test]
    fn test_delete_volume() -> anyhow::Result<()> {
        let path = temp_image_path("commands_delete");
        create_volume(&path, 1 << 20)?;
        delete_volume(&path)?;
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_occupancy_map_is_idempotent() -> anyhow::Result<()> {
        let path = temp_image_path("commands_map_idempotent");
        create_volume(&path, 1 << 20)?;
        let host = host_file("data.bin", &sample_content(3000));
        import_file(&path, &host)?;

        let first = occupancy_map(&path)?;
        let second = occupancy_map(&path)?;
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
        assert!(first.inodes.starts_with("*0"));
        assert!(first.blocks.starts_with("***0"));
        // 512 inode slots over 80 columns
        assert_eq!(first.inodes.lines().count(), 7);

        remove_host_file(&host);
        std::fs::remove_file(&path)?;
        Ok(())
    }

    #[test]
    fn test_volume_info() -> anyhow::Result<()> {
        let path = temp_image_path("commands_info");
        create_volume(&path, 2 << 20)?;
        let host = host_file("one.bin", &sample_content(1500));
        import_file(&path, &host)?;
        let info = volume_info(&path)?;
        assert_eq!(info.used_inodes, 1);
        assert_eq!(info.free_blocks as u64, info.superblock.block_count - 2);
        assert!(info.to_string().contains("1 used / 1024"));
        remove_host_file(&host);
        std::fs::remove_file(&path)?;
        Ok(())
    }
}
