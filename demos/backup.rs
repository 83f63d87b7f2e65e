use anyhow::Error;
use mediatransfer::device::{MediaTransfer, StorageSort};
use mediatransfer::object::filetypes::Filetype;
use mediatransfer::util::CallbackReturn;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() -> Result<(), Error> {
    let args: Vec<_> = std::env::args().collect();
    if args.len() != 2 {
        println!("Usage: backup <destination>");
        return Ok(());
    }

    let dest = Path::new(&args[1]);

    let mut mtp_device = MediaTransfer::connect()?;
    mtp_device.update_storage(StorageSort::NotSorted)?;

    // Folders come flattened in depth-first order, so a parent is always
    // mapped before its children show up.
    let mut folder_paths: HashMap<u32, PathBuf> = HashMap::new();
    for folder in mtp_device.folders()? {
        let parent = folder_paths
            .get(&folder.parent_id())
            .cloned()
            .unwrap_or_else(|| dest.to_path_buf());

        folder_paths.insert(folder.id(), parent.join(folder.name()));
    }

    let files = mtp_device.files()?;
    let total_files = files
        .iter()
        .filter(|file| !matches!(file.ftype(), Filetype::Folder))
        .count();

    let mut copied = 0;
    for file in files {
        if matches!(file.ftype(), Filetype::Folder) {
            continue;
        }

        let dir = folder_paths
            .get(&file.parent_id())
            .cloned()
            .unwrap_or_else(|| dest.to_path_buf());
        std::fs::create_dir_all(&dir)?;

        copied += 1;
        println!("[{}/{}] {}", copied, total_files, file.name());

        mtp_device.get_file_with_callback(&file, dir.join(file.name()), |sent, total| {
            print!("\rProgress {}/{}", sent, total);
            std::io::stdout().lock().flush().expect("Failed to flush");
            CallbackReturn::Continue
        })?;

        println!();
    }

    Ok(())
}
