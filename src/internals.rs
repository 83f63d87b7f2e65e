//! Native-side knobs of `libmtp`, debug tracing and the bundled device
//! database, most programs never touch this module.

use std::sync::Once;

use bitflags::bitflags;
use mtp_sys as ffi;

use crate::util::string_or_empty;
use crate::{error::Error, Result};

pub(crate) fn maybe_init() {
    static INIT: Once = Once::new();

    INIT.call_once(|| unsafe {
        ffi::LIBMTP_Init();
    });
}

bitflags! {
    /// Debug level bitflags of the native library, single layers can be
    /// traced by combining them with a bitwise or.
    ///
    /// ## Example
    /// ```
    /// use mediatransfer::internals::DebugLevel;
    ///
    /// let noisy = DebugLevel::PTP | DebugLevel::USB;
    /// ```
    pub struct DebugLevel: i32 {
        const NONE = ffi::LIBMTP_DEBUG_NONE as i32;
        const PTP = ffi::LIBMTP_DEBUG_PTP as i32;
        const PLST = ffi::LIBMTP_DEBUG_PLST as i32;
        const USB = ffi::LIBMTP_DEBUG_USB as i32;
        const DATA = ffi::LIBMTP_DEBUG_DATA as i32;
        const ALL = ffi::LIBMTP_DEBUG_ALL as i32;
    }
}

/// Tells `libmtp` how much tracing to print on stderr.
///
/// Since [`DebugLevel`](struct.DebugLevel.html) is a bitflag any subset of
/// the layers can be picked.
///
/// ## Example
/// ```
/// use mediatransfer::internals::{set_debug, DebugLevel};
///
/// set_debug(DebugLevel::DATA | DebugLevel::USB);
/// ```
pub fn set_debug(level: DebugLevel) {
    maybe_init();

    unsafe {
        ffi::LIBMTP_Set_Debug(level.bits());
    }
}

/// One row of the device database bundled with `libmtp`, see
/// [`music-players.h`](https://github.com/libmtp/libmtp/blob/master/src/music-players.h)
/// for the full table, listed devices get their quirk flags applied on open.
#[derive(Debug, Clone)]
pub struct DeviceEntry {
    pub vendor: String,
    pub vendor_id: u16,
    pub product: String,
    pub product_id: u16,
    pub device_flags: u32,
}

/// Copies the bundled device database, i.e. every device `libmtp` claims
/// to support.
pub fn get_supported_devices() -> Result<Vec<DeviceEntry>> {
    maybe_init();

    let mut table = std::ptr::null_mut();
    let mut count = 0;

    let res = unsafe { ffi::LIBMTP_Get_Supported_Devices_List(&mut table, &mut count) };
    if res != 0 {
        return Err(Error::Unknown);
    }

    // The table lives in static storage on the native side, nothing to free.
    let mut entries = Vec::with_capacity(count as usize);
    for offset in 0..count as isize {
        unsafe {
            let native = &*table.offset(offset);

            entries.push(DeviceEntry {
                vendor: string_or_empty(native.vendor),
                vendor_id: native.vendor_id,
                product: string_or_empty(native.product),
                product_id: native.product_id,
                device_flags: native.device_flags,
            });
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_levels_combine_as_native_masks() {
        assert_eq!(DebugLevel::NONE.bits(), 0x00);
        assert_eq!(DebugLevel::ALL.bits(), 0xff);
        assert_eq!((DebugLevel::PTP | DebugLevel::USB).bits(), 0x05);
    }
}
