use anyhow::Error;
use mediatransfer::device::{MediaTransfer, StorageSort};
use mediatransfer::error::Error as MtpError;
use std::io::Write;
use text_io::read;

fn session_or_err(session: &Option<MediaTransfer>) -> Result<&MediaTransfer, MtpError> {
    session.as_ref().ok_or(MtpError::NotConnected)
}

fn report(err: MtpError) {
    println!("Error: {}", err);

    if let MtpError::CommandFailed { stack, .. } = err {
        for entry in stack {
            println!("  {}", entry);
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  connect     open a session with the first device found");
    println!("  disconnect  close the current session");
    println!("  info        print device name, serial and battery");
    println!("  storages    list the storages of the device");
    println!("  ls          list every file on the device");
    println!("  folders     print the folder tree of the device");
    println!("  tracks      list every track on the device");
    println!("  playlists   list every playlist on the device");
    println!("  albums      list every album on the device");
    println!("  quit        exit the shell");
}

fn main() -> Result<(), Error> {
    let mut session: Option<MediaTransfer> = None;

    println!("Type help for the command list");

    loop {
        print!("mtp> ");
        std::io::stdout().lock().flush()?;
        let command: String = read!();

        match command.as_str() {
            "help" => print_help(),

            "connect" => match MediaTransfer::connect() {
                Ok(mut device) => {
                    if let Err(err) = device.update_storage(StorageSort::NotSorted) {
                        println!("Warning, couldn't update storage: {}", err);
                    }

                    println!("Connected");
                    session = Some(device);
                }
                Err(err) => report(err),
            },

            "disconnect" => match session.take() {
                Some(device) => {
                    device.disconnect();
                    println!("Disconnected");
                }
                None => report(MtpError::NotConnected),
            },

            "info" => match session_or_err(&session) {
                Ok(device) => {
                    let name = if let Ok(fname) = device.friendly_name() {
                        fname
                    } else {
                        format!(
                            "{} {}",
                            device.manufacturer_name().unwrap_or_default(),
                            device.model_name().unwrap_or_default()
                        )
                    };

                    println!("Device: {}", name);

                    match device.serial_number() {
                        Ok(serial) => println!("Serial number: {}", serial),
                        Err(err) => report(err),
                    }

                    match device.battery_level() {
                        Ok((level, max)) => println!("Battery: {:?} of max {}", level, max),
                        Err(_) => println!("Battery: not reported"),
                    }
                }
                Err(err) => report(err),
            },

            "storages" => match session_or_err(&session) {
                Ok(device) => {
                    for (i, storage) in device.storages().iter().enumerate() {
                        println!(
                            "Storage {}: {} ({} free of {})",
                            i + 1,
                            storage.description().unwrap_or("Unknown"),
                            bytefmt::format(storage.free_space_in_bytes()),
                            bytefmt::format(storage.maximum_capacity()),
                        );
                    }
                }
                Err(err) => report(err),
            },

            "ls" => match session_or_err(&session).and_then(|device| device.files()) {
                Ok(files) => {
                    for file in files {
                        println!(
                            "{:>10} {:>10} {}",
                            file.id(),
                            bytefmt::format(file.size()),
                            file.name()
                        );
                    }
                }
                Err(err) => report(err),
            },

            "folders" => match session_or_err(&session).and_then(|device| device.folders()) {
                Ok(folders) => {
                    for folder in folders {
                        let level = folder.depth() as usize * 2;
                        println!("{:>level$}{} ({})", "", folder.name(), folder.id(), level = level);
                    }
                }
                Err(err) => report(err),
            },

            "tracks" => match session_or_err(&session).and_then(|device| device.tracks()) {
                Ok(tracks) => {
                    for track in tracks {
                        println!(
                            "{:>10} {} - {}",
                            track.id(),
                            track.artist().unwrap_or("Unknown"),
                            track.title().unwrap_or(track.name()),
                        );
                    }
                }
                Err(err) => report(err),
            },

            "playlists" => match session_or_err(&session).and_then(|device| device.playlists()) {
                Ok(playlists) => {
                    for playlist in playlists {
                        println!(
                            "{:>10} {} ({} tracks)",
                            playlist.id(),
                            playlist.name(),
                            playlist.tracks().len()
                        );
                    }
                }
                Err(err) => report(err),
            },

            "albums" => match session_or_err(&session).and_then(|device| device.albums()) {
                Ok(albums) => {
                    for album in albums {
                        println!(
                            "{:>10} {} - {} ({} tracks)",
                            album.id(),
                            album.artist().unwrap_or("Unknown"),
                            album.name(),
                            album.tracks().len()
                        );
                    }
                }
                Err(err) => report(err),
            },

            "quit" | "exit" => break,

            unknown => println!("Unknown command: {}", unknown),
        }
    }

    Ok(())
}
