use std::collections::HashSet;
use std::ffi::{CStr, NulError};
use std::fmt;
use std::string::FromUtf8Error;

use mtp_sys as ffi;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive as _;
use thiserror::Error as DError;

/// Error classes reported by the device, mirroring the native error numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum MtpErrorKind {
    General = 1,
    PtpLayer,
    UsbLayer,
    MemoryAllocation,
    NoDeviceAttached,
    StorageFull,
    Connecting,
    Cancelled,
}

/// One entry of a device error stack, oldest entries come first when
/// collected through [`error_stack`](crate::device::MediaTransfer::error_stack).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    pub(crate) number: u32,
    pub(crate) text: String,
}

impl ErrorEntry {
    /// Returns the raw native error number of this entry.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Classifies this entry, `None` if the number isn't a known class.
    pub fn kind(&self) -> Option<MtpErrorKind> {
        MtpErrorKind::from_u32(self.number)
    }

    /// Returns the human readable text of this entry, may be empty.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.number, self.text)
    }
}

#[derive(Debug, DError)]
pub enum Error {
    #[error("Unknown error!")]
    Unknown,
    #[error("No MTP device found")]
    NoDeviceFound,
    #[error("Another device session is already open")]
    AlreadyConnected,
    #[error("Not connected to any device")]
    NotConnected,
    #[error("Object not found on the device")]
    ObjectNotFound { stack: Vec<ErrorEntry> },
    #[error("Device command failed ({:?}): {}", .kind, .stack.last().map(|e| e.text()).unwrap_or("no detail"))]
    CommandFailed {
        kind: MtpErrorKind,
        stack: Vec<ErrorEntry>,
    },
    #[error("There was an error when converting UTF-8 ({source})")]
    Utf8Error { source: FromUtf8Error },
    #[error("Interior nul byte found in string ({source})")]
    NulError { source: NulError },
    #[error("I/O error ({source})")]
    IoError { source: std::io::Error },
}

impl Error {
    /// Builds an error from a drained stack. The class is taken from the
    /// newest entry carrying a known error number.
    pub(crate) fn from_stack(stack: Vec<ErrorEntry>) -> Self {
        if stack.is_empty() {
            return Self::Unknown;
        }

        let kind = stack
            .iter()
            .rev()
            .find_map(ErrorEntry::kind)
            .unwrap_or(MtpErrorKind::General);

        Self::CommandFailed { kind, stack }
    }
}

impl Default for Error {
    fn default() -> Self {
        Self::Unknown
    }
}

impl From<FromUtf8Error> for Error {
    fn from(source: FromUtf8Error) -> Self {
        Self::Utf8Error { source }
    }
}

impl From<NulError> for Error {
    fn from(source: NulError) -> Self {
        Self::NulError { source }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::IoError { source }
    }
}

/// Copies a native error chain into owned entries, oldest first. Doesn't
/// free nor clear the chain, that's up to the caller. Walks addresses at
/// most once, so a corrupted cyclic chain can't hang the collection.
pub(crate) unsafe fn collect_error_stack(head: *const ffi::LIBMTP_error_t) -> Vec<ErrorEntry> {
    let mut entries = Vec::new();
    let mut visited = HashSet::new();

    let mut current = head;
    while !current.is_null() && visited.insert(current as usize) {
        let text = if (*current).error_text.is_null() {
            String::new()
        } else {
            CStr::from_ptr((*current).error_text)
                .to_string_lossy()
                .into_owned()
        };

        entries.push(ErrorEntry {
            number: (*current).errornumber,
            text,
        });

        current = (*current).next;
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::ptr;

    fn native_entry(number: u32, text: &str, next: *mut ffi::LIBMTP_error_t) -> *mut ffi::LIBMTP_error_t {
        let text = CString::new(text).unwrap();
        Box::into_raw(Box::new(ffi::LIBMTP_error_t {
            errornumber: number,
            error_text: text.into_raw(),
            next,
        }))
    }

    unsafe fn free_entry(node: *mut ffi::LIBMTP_error_t) {
        let node = Box::from_raw(node);
        if !node.error_text.is_null() {
            drop(CString::from_raw(node.error_text));
        }
    }

    #[test]
    fn collects_entries_oldest_first() {
        let newest = native_entry(2, "PTP: protocol error", ptr::null_mut());
        let oldest = native_entry(1, "Get storage failed", newest);

        let stack = unsafe { collect_error_stack(oldest) };
        assert_eq!(stack.len(), 2);
        assert_eq!(stack[0].number(), 1);
        assert_eq!(stack[0].text(), "Get storage failed");
        assert_eq!(stack[1].kind(), Some(MtpErrorKind::PtpLayer));

        unsafe {
            free_entry(oldest);
            free_entry(newest);
        }
    }

    #[test]
    fn collects_nothing_from_a_null_head() {
        let stack = unsafe { collect_error_stack(ptr::null()) };
        assert!(stack.is_empty());
    }

    #[test]
    fn tolerates_null_error_text() {
        let entry = native_entry(5, "", ptr::null_mut());
        unsafe {
            drop(CString::from_raw((*entry).error_text));
            (*entry).error_text = ptr::null_mut();
        }

        let stack = unsafe { collect_error_stack(entry) };
        assert_eq!(stack.len(), 1);
        assert_eq!(stack[0].text(), "");
        assert_eq!(stack[0].kind(), Some(MtpErrorKind::NoDeviceAttached));

        unsafe { free_entry(entry) };
    }

    #[test]
    fn stops_collecting_on_a_cycle() {
        let first = native_entry(1, "first", ptr::null_mut());
        let second = native_entry(2, "second", ptr::null_mut());
        unsafe {
            (*first).next = second;
            (*second).next = first;
        }

        let stack = unsafe { collect_error_stack(first) };
        assert_eq!(stack.len(), 2);

        unsafe {
            free_entry(first);
            free_entry(second);
        }
    }

    #[test]
    fn from_stack_takes_the_newest_known_class() {
        let stack = vec![
            ErrorEntry { number: 2, text: "ptp".into() },
            ErrorEntry { number: 6, text: "storage full".into() },
        ];

        match Error::from_stack(stack) {
            Error::CommandFailed { kind, stack } => {
                assert_eq!(kind, MtpErrorKind::StorageFull);
                assert_eq!(stack.len(), 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn from_stack_without_entries_is_unknown() {
        assert!(matches!(Error::from_stack(Vec::new()), Error::Unknown));
    }

    #[test]
    fn from_stack_falls_back_to_the_general_class() {
        let stack = vec![ErrorEntry { number: 0xdead, text: "?".into() }];

        match Error::from_stack(stack) {
            Error::CommandFailed { kind, .. } => assert_eq!(kind, MtpErrorKind::General),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn command_failed_displays_the_newest_text() {
        let err = Error::from_stack(vec![ErrorEntry {
            number: 1,
            text: "Get storage failed".into(),
        }]);

        assert_eq!(
            err.to_string(),
            "Device command failed (General): Get storage failed"
        );
    }
}
