use anyhow::Error;
use mediatransfer::device::{MediaTransfer, StorageSort};
use mediatransfer::storage::tracks::TrackTags;
use mediatransfer::storage::Parent;
use mediatransfer::util::CallbackReturn;
use std::io::Write;
use std::path::Path;

fn main() -> Result<(), Error> {
    let args: Vec<_> = std::env::args().collect();
    if args.len() < 2 {
        println!(
            "Usage: send_track <source> [--title T] [--artist A] [--album L] \
             [--genre G] [--number N]"
        );
        return Ok(());
    }

    let mut tags = TrackTags::default();

    let mut flags = args[2..].iter();
    while let Some(flag) = flags.next() {
        let value = match flags.next() {
            Some(value) => value,
            None => {
                println!("Error: missing value for {}", flag);
                return Ok(());
            }
        };

        match flag.as_str() {
            "--title" => tags.title = Some(value.clone()),
            "--artist" => tags.artist = Some(value.clone()),
            "--album" => tags.album = Some(value.clone()),
            "--genre" => tags.genre = Some(value.clone()),
            "--number" => tags.track_number = value.parse()?,
            unknown => {
                println!("Error: unknown flag {}", unknown);
                return Ok(());
            }
        }
    }

    let path = Path::new(&args[1]);

    let mut mtp_device = MediaTransfer::connect()?;
    mtp_device.update_storage(StorageSort::ByFreeSpace)?;

    let item_id = mtp_device.send_track_with_callback(path, &tags, Parent::Root, |sent, total| {
        print!("\rProgress {}/{}", sent, total);
        std::io::stdout().lock().flush().expect("Failed to flush");
        CallbackReturn::Continue
    })?;

    println!();
    println!("Sent as track {}", item_id);

    Ok(())
}
