use anyhow::Error;
use mediatransfer::device::{MediaTransfer, StorageSort};
use mediatransfer::storage::playlists::PlaylistMetadata;
use mediatransfer::storage::Parent;

fn main() -> Result<(), Error> {
    let args: Vec<_> = std::env::args().collect();
    if args.len() < 2 {
        println!("Usage: new_playlist <name> [track-id]...");
        return Ok(());
    }

    let tracks = args[2..]
        .iter()
        .map(|id| id.parse::<u32>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut mtp_device = MediaTransfer::connect()?;
    mtp_device.update_storage(StorageSort::NotSorted)?;

    let metadata = PlaylistMetadata {
        name: &args[1],
        tracks: &tracks,
        parent: Parent::Root,
        storage_id: 0,
    };

    let playlist_id = mtp_device.create_playlist(&metadata)?;
    println!("Created playlist with id {}", playlist_id);

    Ok(())
}
