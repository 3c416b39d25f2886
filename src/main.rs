use blockvfs::{
    cli_interface::{BlockVfsCli, Command},
    commands, mkfs,
};
use clap::Parser;
/// a CLI interface to users to manage a volume and the files inside it.
///
/// Every command opens the volume, runs one operation and closes it again.
/// A malformed command line only prints the usage.
fn main() -> anyhow::Result<()> {
    env_logger::builder().format_timestamp_nanos().init();
    let args = match BlockVfsCli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // usage problems are informational, not failures
            e.print()?;
            return Ok(());
        }
    };
    let volume = args.volume;
    let volume_name = volume.display();
    match args.command {
        Command::Create { size } => {
            mkfs::create_volume(&volume, size)?;
            println!("volume {volume_name} has been created");
        }
        Command::Delete => {
            commands::delete_volume(&volume)?;
            println!("volume {volume_name} has been deleted");
        }
        Command::CopyTo { host_path } => {
            let imported = commands::import_file(&volume, &host_path)?;
            println!(
                "file '{}' has been copied to volume {volume_name} ({} bytes, {} blocks)",
                imported.name,
                imported.size,
                imported.blocks.len()
            );
        }
        Command::CopyFrom { file_name } => {
            let written = commands::export_file(&volume, &file_name, &file_name)?;
            println!("file '{file_name}' has been copied from volume {volume_name} ({written} bytes)");
        }
        Command::Rm { file_name } => {
            commands::delete_file(&volume, &file_name)?;
            println!("file '{file_name}' has been deleted");
        }
        Command::Ls => {
            for name in commands::list_files(&volume)? {
                println!("{name}");
            }
        }
        Command::Map => println!("{}", commands::occupancy_map(&volume)?),
        Command::Info => println!("{}", commands::volume_info(&volume)?),
    }
    Ok(())
}
