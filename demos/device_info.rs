use anyhow::Error;
use mediatransfer::device::{raw::detect_raw_devices, StorageSort};
use mediatransfer::internals::{set_debug, DebugLevel};

fn main() -> Result<(), Error> {
    let args: Vec<_> = std::env::args().collect();
    if args.iter().any(|arg| arg == "--debug") {
        set_debug(DebugLevel::ALL);
    }

    let raw_devices = detect_raw_devices()?;
    let raw_device = if let Some(raw) = raw_devices.get(0) {
        raw
    } else {
        println!("No devices");
        return Ok(());
    };

    let entry = raw_device.device_entry();
    println!(
        "Found {} {} (vid {:04x}, pid {:04x}) on bus {} dev {}",
        entry.vendor,
        entry.product,
        entry.vendor_id,
        entry.product_id,
        raw_device.bus_number(),
        raw_device.dev_number(),
    );

    let mut mtp_device = raw_device.open_uncached()?;

    let name = if let Ok(fname) = mtp_device.friendly_name() {
        fname
    } else {
        format!(
            "{} {}",
            mtp_device.manufacturer_name()?,
            mtp_device.model_name()?
        )
    };

    println!("Device: {}", name);
    println!("Serial number: {}", mtp_device.serial_number()?);
    println!("Device version: {}", mtp_device.device_version()?);

    match mtp_device.battery_level() {
        Ok((level, max)) => println!("Battery: {:?} of max {}", level, max),
        Err(_) => println!("Battery: not reported"),
    }

    mtp_device.update_storage(StorageSort::ByFreeSpace)?;

    for (i, storage) in mtp_device.storages().iter().enumerate() {
        println!("Storage {}:", i + 1);
        println!(
            "  Description: {}",
            storage.description().unwrap_or("Unknown")
        );
        println!(
            "  Max. capacity: {}",
            bytefmt::format(storage.maximum_capacity())
        );
        println!(
            "  Free space: {}",
            bytefmt::format(storage.free_space_in_bytes())
        );
        println!("  Used: {:.1}%", storage.used_percent());
    }

    println!("Default folders: {:#?}", mtp_device.default_folders());

    Ok(())
}
