use anyhow::Error;
use mediatransfer::device::{MediaTransfer, StorageSort};
use mediatransfer::storage::Parent;

fn main() -> Result<(), Error> {
    let args: Vec<_> = std::env::args().collect();
    if args.len() < 2 || args.len() > 4 {
        println!("Usage: new_folder <name> [parent-id] [storage-id]");
        return Ok(());
    }

    let parent = match args.get(2) {
        Some(id) => Parent::Folder(id.parse()?),
        None => Parent::Root,
    };

    let storage_id = match args.get(3) {
        Some(id) => id.parse()?,
        None => 0,
    };

    let mut mtp_device = MediaTransfer::connect()?;
    mtp_device.update_storage(StorageSort::NotSorted)?;

    let (folder_id, name) = mtp_device.create_folder(&args[1], parent, storage_id)?;
    println!("Created folder {} with id {}", name, folder_id);

    Ok(())
}
