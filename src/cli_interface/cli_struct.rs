use std::path::PathBuf;

use byte_unit::Byte;
use clap::{Parser, Subcommand};

/// a virtual file system living inside a single image file
#[derive(Parser, Debug, PartialEq)]
#[command(author, version, about, long_about = None)]
pub struct BlockVfsCli {
    /// the path of the volume image file
    pub volume: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// create a new volume
    #[command(name = "CREATE")]
    Create {
        /// volume size in bytes, units such as `1MiB` are accepted
        #[arg(value_parser = parse_volume_size)]
        size: u64,
    },
    /// delete the volume
    #[command(name = "DELETE")]
    Delete,
    /// copy a host file into the volume
    #[command(name = "COPYTO")]
    CopyTo { host_path: PathBuf },
    /// copy a file out of the volume into the current directory
    #[command(name = "COPYFROM")]
    CopyFrom { file_name: String },
    /// delete a file from the volume
    #[command(name = "RM")]
    Rm { file_name: String },
    /// list the files on the volume
    #[command(name = "LS")]
    Ls,
    /// show which inodes and data blocks are in use
    #[command(name = "MAP")]
    Map,
    /// show the geometry and usage of the volume
    #[command(name = "INFO")]
    Info,
}

fn parse_volume_size(s: &str) -> Result<u64, String> {
    let size = Byte::from_str(s).map_err(|e| e.to_string())?;
    u64::try_from(size.get_bytes()).map_err(|_| format!("{s} is too large"))
}

/// test the `BlockVfsCli` struct
#[cfg(test)]
mod parse_args_tests {
    use super::*;

    #[test]
    fn test_create() {
        let args = BlockVfsCli::parse_from(["blockvfs", "disk.img", "CREATE", "1048576"]);
        assert_eq!(
            args,
            BlockVfsCli {
                volume: PathBuf::from("disk.img"),
                command: Command::Create { size: 1 << 20 },
            }
        );
    }

    #[test]
    fn test_create_with_unit() {
        let args = BlockVfsCli::parse_from(["blockvfs", "disk.img", "CREATE", "2MiB"]);
        assert_eq!(args.command, Command::Create { size: 2 << 20 });
    }

    #[test]
    fn test_file_verbs() {
        let args = BlockVfsCli::parse_from(["blockvfs", "disk.img", "COPYTO", "/tmp/a.txt"]);
        assert_eq!(
            args.command,
            Command::CopyTo {
                host_path: PathBuf::from("/tmp/a.txt")
            }
        );
        let args = BlockVfsCli::parse_from(["blockvfs", "disk.img", "COPYFROM", "a.txt"]);
        assert_eq!(
            args.command,
            Command::CopyFrom {
                file_name: "a.txt".to_string()
            }
        );
        let args = BlockVfsCli::parse_from(["blockvfs", "disk.img", "RM", "a.txt"]);
        assert_eq!(
            args.command,
            Command::Rm {
                file_name: "a.txt".to_string()
            }
        );
    }

    #[test]
    fn test_verbs_without_arguments() {
        for (verb, command) in [
            ("DELETE", Command::Delete),
            ("LS", Command::Ls),
            ("MAP", Command::Map),
            ("INFO", Command::Info),
        ] {
            let args = BlockVfsCli::parse_from(["blockvfs", "disk.img", verb]);
            assert_eq!(args.command, command);
        }
    }

    #[test]
    fn test_malformed_argument_counts() {
        for argv in [
            vec!["blockvfs"],
            vec!["blockvfs", "disk.img"],
            vec!["blockvfs", "disk.img", "CREATE"],
            vec!["blockvfs", "disk.img", "LS", "extra"],
            vec!["blockvfs", "disk.img", "COPYTO"],
            vec!["blockvfs", "disk.img", "FORMAT"],
            vec!["blockvfs", "disk.img", "CREATE", "lots"],
        ] {
            assert!(BlockVfsCli::try_parse_from(argv).is_err());
        }
    }
}
