use std::ffi::{CStr, CString};
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use mtp_sys as ffi;

use crate::Result;

/// Values a progress callback may return to drive an ongoing operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CallbackReturn {
    Continue,
    Cancel,
}

#[allow(clippy::transmute_ptr_to_ref)]
pub(crate) unsafe extern "C" fn progress_func_handler(
    sent: u64,
    total: u64,
    data: *const libc::c_void,
) -> libc::c_int {
    let closure: &mut &mut dyn FnMut(u64, u64) -> CallbackReturn = std::mem::transmute(data);
    match closure(sent, total) {
        CallbackReturn::Continue => 0,
        CallbackReturn::Cancel => 1,
    }
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        pub(crate) fn path_to_cstring(path: &Path) -> Result<CString> {
            use std::os::unix::ffi::OsStrExt;
            Ok(CString::new(path.as_os_str().as_bytes())?)
        }
    } else {
        pub(crate) fn path_to_cstring(path: &Path) -> Result<CString> {
            Ok(CString::new(path.to_string_lossy().as_bytes())?)
        }
    }
}

pub(crate) fn epoch_to_datetime(epoch: ffi::time_t) -> DateTime<Utc> {
    Utc.timestamp_opt(epoch as i64, 0)
        .single()
        .unwrap_or_else(|| DateTime::from(std::time::UNIX_EPOCH))
}

pub(crate) fn datetime_to_epoch(datetime: DateTime<Utc>) -> ffi::time_t {
    datetime.timestamp() as ffi::time_t
}

/// Copies a malloc'd C string into an owned `String`, then frees it. The
/// text must be valid UTF-8, `libmtp` converts device strings to UTF-8.
pub(crate) unsafe fn consume_strict_string(ptr: *mut libc::c_char) -> Result<String> {
    let bytes = CStr::from_ptr(ptr).to_bytes().to_vec();
    libc::free(ptr as *mut libc::c_void);

    Ok(String::from_utf8(bytes)?)
}

/// Copies a borrowed C string into an owned `String`, replacing invalid
/// UTF-8 sequences. Null pointers map to `None`.
pub(crate) unsafe fn opt_string(ptr: *const libc::c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
    }
}

pub(crate) unsafe fn string_or_empty(ptr: *const libc::c_char) -> String {
    opt_string(ptr).unwrap_or_default()
}
