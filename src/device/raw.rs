//! Raw device descriptors, detection of the connected USB devices starts
//! here and every MTP session is opened from one of these descriptors.

use mtp_sys as ffi;
use std::fmt::{self, Debug};
use std::mem::MaybeUninit;

use crate::device::{acquire_session, release_session, MediaTransfer};
use crate::error::{Error, ErrorEntry};
use crate::internals::{maybe_init, DeviceEntry};
use crate::util::string_or_empty;
use crate::Result;

/// Descriptor of a connected USB device, open it with [`open`](#method.open)
/// or [`open_uncached`](#method.open_uncached) to get a working MTP session.
pub struct RawDevice {
    pub(crate) inner: ffi::LIBMTP_raw_device_t,
}

impl Debug for RawDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawDevice")
            .field("bus_number", &self.bus_number())
            .field("dev_number", &self.dev_number())
            .field("device_entry", &self.device_entry())
            .finish()
    }
}

impl RawDevice {
    /// Opens an MTP session on this raw device descriptor, this method lets
    /// `libmtp` cache object metadata, often faster on big collections.
    pub fn open(&self) -> Result<MediaTransfer> {
        acquire_session()?;

        unsafe {
            let ptr = &self.inner as *const _;
            let inner = ffi::LIBMTP_Open_Raw_Device(ptr as *mut _);

            if inner.is_null() {
                release_session();
                Err(Error::NoDeviceFound)
            } else {
                let device = MediaTransfer { inner };
                // Opening usually leaves handshake noise on the error stack.
                device.clear_error_stack();
                Ok(device)
            }
        }
    }

    /// Opens an MTP session on this raw device descriptor, uncached version.
    pub fn open_uncached(&self) -> Result<MediaTransfer> {
        acquire_session()?;

        unsafe {
            let ptr = &self.inner as *const _;
            let inner = ffi::LIBMTP_Open_Raw_Device_Uncached(ptr as *mut _);

            if inner.is_null() {
                release_session();
                Err(Error::NoDeviceFound)
            } else {
                let device = MediaTransfer { inner };
                device.clear_error_stack();
                Ok(device)
            }
        }
    }

    /// Returns the USB bus number of this device.
    pub fn bus_number(&self) -> u32 {
        self.inner.bus_location
    }

    /// Returns the device number within its bus.
    pub fn dev_number(&self) -> u8 {
        self.inner.devnum
    }

    /// Returns the entry of this device in the device database bundled
    /// with `libmtp`.
    pub fn device_entry(&self) -> DeviceEntry {
        let entry = &self.inner.device_entry;

        unsafe {
            DeviceEntry {
                vendor: string_or_empty(entry.vendor),
                vendor_id: entry.vendor_id,
                product: string_or_empty(entry.product),
                product_id: entry.product_id,
                device_flags: entry.device_flags,
            }
        }
    }
}

/// Detects the connected USB devices and returns one descriptor per device,
/// an empty list means nothing was found. Open a descriptor to manage the
/// device, its storages and the objects they hold.
///
/// ## Example
/// ```no_run
/// use mediatransfer::device::raw::detect_raw_devices;
///
/// let raw_devices = detect_raw_devices().expect("Detection failed");
///
/// if let Some(raw) = raw_devices.get(0) {
///     let mtp_device = raw.open_uncached().expect("Couldn't open the device");
/// }
/// ```
pub fn detect_raw_devices() -> Result<Vec<RawDevice>> {
    maybe_init();

    unsafe {
        let mut devices = std::ptr::null_mut();
        let mut len = 0;

        let res = ffi::LIBMTP_Detect_Raw_Devices(&mut devices, &mut len);

        match res {
            ffi::LIBMTP_ERROR_NONE => {}
            ffi::LIBMTP_ERROR_NO_DEVICE_ATTACHED => return Ok(Vec::new()),
            number => {
                return Err(Error::from_stack(vec![ErrorEntry {
                    number,
                    text: "Failed to detect raw devices".to_string(),
                }]))
            }
        }

        let mut devices_vec = Vec::with_capacity(len as usize);
        for i in 0..(len as isize) {
            let mut new = MaybeUninit::zeroed().assume_init();

            std::ptr::copy_nonoverlapping(devices.offset(i), &mut new, 1);
            devices_vec.push(RawDevice { inner: new });
        }

        libc::free(devices as *mut _);
        Ok(devices_vec)
    }
}

/// Tells whether the device at the given bus and device number exposes an
/// MTP descriptor.
pub fn check_specific_device(bus_number: u32, dev_number: u32) -> bool {
    let res = unsafe { ffi::LIBMTP_Check_Specific_Device(bus_number as i32, dev_number as i32) };
    res == 1
}
