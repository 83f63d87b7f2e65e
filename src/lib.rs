//! Safe and ergonomic bindings to the `libmtp` C library. Still alpha software,
//! a few of the native calls have no wrapper yet and the API may move between
//! releases, contributions are welcome.
//!
//! The quickest entrypoint is the
//! [`MediaTransfer::connect`](device/struct.MediaTransfer.html#method.connect) shortcut, when
//! more control is needed the [`detect_raw_devices`](device/raw/index.html) function returns a
//! list of [`RawDevice`](device/raw/struct.RawDevice.html)s, i.e. the connected USB devices,
//! opening one of these gives you a [`MediaTransfer`](device/struct.MediaTransfer.html) session
//! with one method per device operation: gather device properties like manufacturer, model,
//! battery level, etc; and list, send, get or delete objects like files, tracks, folders,
//! playlists and albums.
//!
//! The modules to know about:
//! - [`device`](device/index.html): Connect, gather/set properties and run device operations.
//! - [`storage`](storage/index.html): Owned records of storages, files, tracks, folders,
//!   playlists and albums.
//! - [`object`](object/index.html): Object ids and filetypes.
//!
//! Note that only one session can be open at a time, a second connection attempt fails with
//! [`Error::AlreadyConnected`](error/enum.Error.html) until the current session drops.

use error::Error;

pub mod error;
pub mod internals;

pub mod util;

pub mod device;
pub mod object;
pub mod storage;

/// Re-export of `chrono`, the datetime fields of the records use its types.
pub use chrono;

/// Alias used by every fallible operation of this crate.
pub type Result<T> = std::result::Result<T, Error>;
