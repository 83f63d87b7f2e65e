use anyhow::Error;
use mediatransfer::device::{MediaTransfer, StorageSort};
use mediatransfer::storage::Parent;
use mediatransfer::util::CallbackReturn;
use std::io::Write;
use std::path::Path;

fn main() -> Result<(), Error> {
    let args: Vec<_> = std::env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        println!("Usage: send_file <source> [parent-id]");
        return Ok(());
    }

    let parent = match args.get(2) {
        Some(id) => Parent::Folder(id.parse()?),
        None => Parent::Root,
    };

    let path = Path::new(&args[1]);
    let target_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut mtp_device = MediaTransfer::connect()?;
    mtp_device.update_storage(StorageSort::ByFreeSpace)?;

    let item_id = mtp_device.send_file_with_callback(path, &target_name, parent, |sent, total| {
        print!("\rProgress {}/{}", sent, total);
        std::io::stdout().lock().flush().expect("Failed to flush");
        CallbackReturn::Continue
    })?;

    println!();
    println!("Sent as object {}", item_id);

    Ok(())
}
