use anyhow::Error;
use mediatransfer::device::MediaTransfer;

fn main() -> Result<(), Error> {
    let args: Vec<_> = std::env::args().collect();
    if args.len() < 2 {
        println!("Usage: delete_object <object-id>...");
        return Ok(());
    }

    let mtp_device = MediaTransfer::connect()?;

    for arg in &args[1..] {
        let id: u32 = arg.parse()?;

        match mtp_device.delete_object(id) {
            Ok(()) => println!("Deleted object {}", id),
            Err(err) => println!("Failed to delete object {}: {}", id, err),
        }
    }

    Ok(())
}
