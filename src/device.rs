/// Detection and opening of raw USB devices.
pub mod raw;

use std::borrow::Cow;
use std::ffi::CString;
use std::fmt::{self, Debug};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use derivative::Derivative;
use mtp_sys as ffi;
use num_derive::ToPrimitive;
use num_traits::ToPrimitive;

use crate::error::{collect_error_stack, Error, ErrorEntry};
use crate::internals::maybe_init;
use crate::object::AsObjectId;
use crate::storage::albums::{self, Album};
use crate::storage::files::{self, File};
use crate::storage::folders::{self, Folder};
use crate::storage::playlists::{self, Playlist, PlaylistMetadata};
use crate::storage::tracks::{self, Track, TrackTags};
use crate::storage::{collect_storages, Parent, Storage};
use crate::util::{consume_strict_string, CallbackReturn};
use crate::Result;

static SESSION_OPEN: AtomicBool = AtomicBool::new(false);

pub(crate) fn acquire_session() -> Result<()> {
    if SESSION_OPEN.swap(true, Ordering::AcqRel) {
        Err(Error::AlreadyConnected)
    } else {
        Ok(())
    }
}

pub(crate) fn release_session() {
    SESSION_OPEN.store(false, Ordering::Release);
}

/// Sort orders accepted when refreshing the storage list of a device.
#[derive(Debug, Clone, Copy, ToPrimitive, Derivative)]
#[derivative(Default)]
pub enum StorageSort {
    #[derivative(Default)]
    NotSorted = 0,
    ByFreeSpace,
    ByMaxSpace,
}

/// Outcome of a storage list refresh.
#[derive(Debug, Clone, Copy)]
pub enum UpdateResult {
    /// Ids and properties were both retrieved.
    Success,
    /// Only the storage ids came back, properties couldn't be fetched.
    OnlyIds,
}

/// Power source reported along a battery query.
#[derive(Debug, Copy, Clone)]
pub enum BatteryLevel {
    /// Running on battery, holds the current level.
    OnBattery(u8),
    /// Plugged to external power, the reported level is zero.
    OnExternalPower,
}

/// Default folder ids the device reported on connection, zero means the
/// device didn't report that folder. These values may be garbage on some
/// devices, it's not recommended to blindly depend on them.
#[derive(Debug, Copy, Clone)]
pub struct DefaultFolders {
    pub music: u32,
    pub playlists: u32,
    pub pictures: u32,
    pub videos: u32,
    pub organizer: u32,
    pub zencast: u32,
    pub albums: u32,
    pub texts: u32,
}

/// An open session with an MTP device, one method per device operation.
/// Only one session can be open at a time, the session closes when this
/// value drops or with [`disconnect`](Self::disconnect).
pub struct MediaTransfer {
    pub(crate) inner: *mut ffi::LIBMTP_mtpdevice_t,
}

impl Drop for MediaTransfer {
    fn drop(&mut self) {
        unsafe {
            ffi::LIBMTP_Release_Device(self.inner);
        }

        release_session();
    }
}

impl Debug for MediaTransfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaTransfer")
            .field("default_folders", &self.default_folders())
            .finish()
    }
}

impl MediaTransfer {
    /// Connects to the first available MTP device with a fresh, uncached
    /// session.
    pub fn connect() -> Result<Self> {
        let raw_devices = raw::detect_raw_devices()?;

        raw_devices
            .into_iter()
            .next()
            .ok_or(Error::NoDeviceFound)?
            .open_uncached()
    }

    /// Connects to the first available MTP device letting `libmtp` cache
    /// object metadata, often faster on devices with big collections.
    pub fn connect_cached() -> Result<Self> {
        maybe_init();
        acquire_session()?;

        let inner = unsafe { ffi::LIBMTP_Get_First_Device() };

        if inner.is_null() {
            release_session();
            return Err(Error::NoDeviceFound);
        }

        let device = MediaTransfer { inner };
        // Opening usually leaves handshake noise on the error stack.
        device.clear_error_stack();
        Ok(device)
    }

    /// Closes this session, equivalent to dropping the value.
    pub fn disconnect(self) {}

    /// Drains the error stack of the device into an error, `None` if the
    /// stack was empty.
    pub(crate) fn latest_error(&self) -> Option<Error> {
        unsafe {
            let stack = collect_error_stack(ffi::LIBMTP_Get_Errorstack(self.inner));
            ffi::LIBMTP_Clear_Errorstack(self.inner);

            if stack.is_empty() {
                None
            } else {
                Some(Error::from_stack(stack))
            }
        }
    }

    /// Drains the error stack into an [`Error::ObjectNotFound`], keeping
    /// whatever diagnostics the failed lookup left behind.
    pub(crate) fn object_not_found(&self) -> Error {
        unsafe {
            let stack = collect_error_stack(ffi::LIBMTP_Get_Errorstack(self.inner));
            ffi::LIBMTP_Clear_Errorstack(self.inner);

            Error::ObjectNotFound { stack }
        }
    }

    /// Copies the current error stack of the device without clearing it,
    /// oldest entries first.
    pub fn error_stack(&self) -> Vec<ErrorEntry> {
        unsafe { collect_error_stack(ffi::LIBMTP_Get_Errorstack(self.inner)) }
    }

    /// Dumps the error stack of the device to stderr, then clears it.
    pub fn dump_error_stack(&self) {
        unsafe {
            ffi::LIBMTP_Dump_Errorstack(self.inner);
            ffi::LIBMTP_Clear_Errorstack(self.inner);
        }
    }

    /// Clears the error stack of the device, pending errors are dropped.
    pub fn clear_error_stack(&self) {
        unsafe {
            ffi::LIBMTP_Clear_Errorstack(self.inner);
        }
    }

    /// Gets the friendly name of this device, e.g. "Kevin's Android".
    pub fn friendly_name(&self) -> Result<String> {
        unsafe {
            let friendly_name = ffi::LIBMTP_Get_Friendlyname(self.inner);

            if friendly_name.is_null() {
                Err(self.latest_error().unwrap_or_default())
            } else {
                consume_strict_string(friendly_name)
            }
        }
    }

    /// Sets the friendly name of this device.
    pub fn set_friendly_name(&self, name: &str) -> Result<()> {
        let name = CString::new(name)?;

        unsafe {
            let res = ffi::LIBMTP_Set_Friendlyname(self.inner, name.as_ptr());

            if res != 0 {
                Err(self.latest_error().unwrap_or_default())
            } else {
                Ok(())
            }
        }
    }

    /// Returns the manufacturer name reported by the device.
    pub fn manufacturer_name(&self) -> Result<String> {
        unsafe {
            let manufacturer = ffi::LIBMTP_Get_Manufacturername(self.inner);

            if manufacturer.is_null() {
                Err(self.latest_error().unwrap_or_default())
            } else {
                consume_strict_string(manufacturer)
            }
        }
    }

    /// Returns the model name reported by the device.
    pub fn model_name(&self) -> Result<String> {
        unsafe {
            let model = ffi::LIBMTP_Get_Modelname(self.inner);

            if model.is_null() {
                Err(self.latest_error().unwrap_or_default())
            } else {
                consume_strict_string(model)
            }
        }
    }

    /// Returns the serial number reported by the device.
    pub fn serial_number(&self) -> Result<String> {
        unsafe {
            let serial = ffi::LIBMTP_Get_Serialnumber(self.inner);

            if serial.is_null() {
                Err(self.latest_error().unwrap_or_default())
            } else {
                consume_strict_string(serial)
            }
        }
    }

    /// Returns the firmware version reported by the device.
    pub fn device_version(&self) -> Result<String> {
        unsafe {
            let version = ffi::LIBMTP_Get_Deviceversion(self.inner);

            if version.is_null() {
                Err(self.latest_error().unwrap_or_default())
            } else {
                consume_strict_string(version)
            }
        }
    }

    /// Retrieves the current and maximum battery level of this device,
    /// may fail on devices not reporting battery levels.
    pub fn battery_level(&self) -> Result<(BatteryLevel, u8)> {
        unsafe {
            let mut max_level = 0;
            let mut cur_level = 0;

            let res = ffi::LIBMTP_Get_Batterylevel(self.inner, &mut max_level, &mut cur_level);

            if res != 0 {
                Err(self.latest_error().unwrap_or_default())
            } else {
                let cur_level = if cur_level == 0 {
                    BatteryLevel::OnExternalPower
                } else {
                    BatteryLevel::OnBattery(cur_level)
                };

                Ok((cur_level, max_level))
            }
        }
    }

    /// Returns the default folder ids the device reported on connection.
    pub fn default_folders(&self) -> DefaultFolders {
        unsafe {
            DefaultFolders {
                music: (*self.inner).default_music_folder,
                playlists: (*self.inner).default_playlist_folder,
                pictures: (*self.inner).default_picture_folder,
                videos: (*self.inner).default_video_folder,
                organizer: (*self.inner).default_organizer_folder,
                zencast: (*self.inner).default_zencast_folder,
                albums: (*self.inner).default_album_folder,
                texts: (*self.inner).default_text_folder,
            }
        }
    }

    /// Dumps out a large chunk of textual information provided from the PTP
    /// protocol and additionally some extra MTP specific information where
    /// applicable.
    pub fn dump_device_info(&self) {
        unsafe {
            ffi::LIBMTP_Dump_Device_Info(self.inner);
        }
    }

    /// Resets the device only if this one supports the `PTP_OC_ResetDevice`
    /// operation code (`0x1010`).
    pub fn reset_device(&self) -> Result<()> {
        unsafe {
            let res = ffi::LIBMTP_Reset_Device(self.inner);

            if res != 0 {
                Err(self.latest_error().unwrap_or_default())
            } else {
                Ok(())
            }
        }
    }

    /// Updates the internal storage list and properties of this device, it
    /// can also optionally sort the list. This operation may success,
    /// partially success (only ids were retrieved) or fail.
    pub fn update_storage(&mut self, sort_by: StorageSort) -> Result<UpdateResult> {
        unsafe {
            let res = ffi::LIBMTP_Get_Storage(self.inner, sort_by.to_i32().unwrap());
            match res {
                0 => Ok(UpdateResult::Success),
                1 => Ok(UpdateResult::OnlyIds),
                _ => Err(self.latest_error().unwrap_or_default()),
            }
        }
    }

    /// Returns snapshots of the storages gathered on the latest
    /// [`update_storage`](Self::update_storage) call, may be empty.
    pub fn storages(&self) -> Vec<Storage> {
        unsafe { collect_storages((*self.inner).storage) }
    }

    /// Returns the first storage of the device, the one space queries
    /// usually refer to.
    pub fn primary_storage(&self) -> Option<Storage> {
        self.storages().into_iter().next()
    }

    /// Gathers every file and folder entry stored in the device, may take
    /// a while on big collections, see
    /// [`files_with_callback`](Self::files_with_callback).
    pub fn files(&self) -> Result<Vec<File>> {
        files::file_listing(self, None::<fn(u64, u64) -> CallbackReturn>)
    }

    /// Same as [`files`](Self::files), reporting progress to `callback`
    /// which may cancel the operation with [`CallbackReturn::Cancel`].
    pub fn files_with_callback<C>(&self, callback: C) -> Result<Vec<File>>
    where
        C: FnMut(u64, u64) -> CallbackReturn,
    {
        files::file_listing(self, Some(callback))
    }

    /// Retrieves the metadata of a single file given its id.
    pub fn file_metadata(&self, file: impl AsObjectId) -> Result<File> {
        files::file_metadata(self, file)
    }

    /// Copies a file stored in the device to a local path.
    pub fn get_file(&self, file: impl AsObjectId, path: impl AsRef<Path>) -> Result<()> {
        files::get_file_to_path(self, file, path, None::<fn(u64, u64) -> CallbackReturn>)
    }

    /// Same as [`get_file`](Self::get_file) reporting progress to
    /// `callback`.
    pub fn get_file_with_callback<C>(
        &self,
        file: impl AsObjectId,
        path: impl AsRef<Path>,
        callback: C,
    ) -> Result<()>
    where
        C: FnMut(u64, u64) -> CallbackReturn,
    {
        files::get_file_to_path(self, file, path, Some(callback))
    }

    /// Sends a local file to the device, stored under `target_name` inside
    /// `parent`. The filetype is guessed from the source file name and the
    /// id of the new object is returned.
    pub fn send_file(
        &self,
        path: impl AsRef<Path>,
        target_name: &str,
        parent: Parent,
    ) -> Result<u32> {
        files::send_file_from_path(
            self,
            0,
            path,
            target_name,
            parent,
            None::<fn(u64, u64) -> CallbackReturn>,
        )
    }

    /// Same as [`send_file`](Self::send_file) reporting progress to
    /// `callback`.
    pub fn send_file_with_callback<C>(
        &self,
        path: impl AsRef<Path>,
        target_name: &str,
        parent: Parent,
        callback: C,
    ) -> Result<u32>
    where
        C: FnMut(u64, u64) -> CallbackReturn,
    {
        files::send_file_from_path(self, 0, path, target_name, parent, Some(callback))
    }

    /// Gathers every track stored in the device, may take a while on big
    /// collections, see [`tracks_with_callback`](Self::tracks_with_callback).
    pub fn tracks(&self) -> Result<Vec<Track>> {
        tracks::track_listing(self, None::<fn(u64, u64) -> CallbackReturn>)
    }

    /// Same as [`tracks`](Self::tracks), reporting progress to `callback`
    /// which may cancel the operation with [`CallbackReturn::Cancel`].
    pub fn tracks_with_callback<C>(&self, callback: C) -> Result<Vec<Track>>
    where
        C: FnMut(u64, u64) -> CallbackReturn,
    {
        tracks::track_listing(self, Some(callback))
    }

    /// Retrieves the metadata of a single track given its id.
    pub fn track_metadata(&self, track: impl AsObjectId) -> Result<Track> {
        tracks::track_metadata(self, track)
    }

    /// Copies a track stored in the device to a local path.
    pub fn get_track(&self, track: impl AsObjectId, path: impl AsRef<Path>) -> Result<()> {
        tracks::get_track_to_path(self, track, path, None::<fn(u64, u64) -> CallbackReturn>)
    }

    /// Same as [`get_track`](Self::get_track) reporting progress to
    /// `callback`.
    pub fn get_track_with_callback<C>(
        &self,
        track: impl AsObjectId,
        path: impl AsRef<Path>,
        callback: C,
    ) -> Result<()>
    where
        C: FnMut(u64, u64) -> CallbackReturn,
    {
        tracks::get_track_to_path(self, track, path, Some(callback))
    }

    /// Sends a local audio file to the device attaching `tags` to the new
    /// track, the id of the new object is returned. The file name and the
    /// filetype fall back to the source file when the tags don't set them.
    pub fn send_track(
        &self,
        path: impl AsRef<Path>,
        tags: &TrackTags,
        parent: Parent,
    ) -> Result<u32> {
        tracks::send_track_from_path(
            self,
            0,
            path,
            tags,
            parent,
            None::<fn(u64, u64) -> CallbackReturn>,
        )
    }

    /// Same as [`send_track`](Self::send_track) reporting progress to
    /// `callback`.
    pub fn send_track_with_callback<C>(
        &self,
        path: impl AsRef<Path>,
        tags: &TrackTags,
        parent: Parent,
        callback: C,
    ) -> Result<u32>
    where
        C: FnMut(u64, u64) -> CallbackReturn,
    {
        tracks::send_track_from_path(self, 0, path, tags, parent, Some(callback))
    }

    /// Gathers the folder tree of the device flattened in depth-first
    /// order, every record tagged with its depth.
    pub fn folders(&self) -> Result<Vec<Folder>> {
        folders::folder_listing(self)
    }

    /// Gathers only the top-level folders of the device.
    pub fn parent_folders(&self) -> Result<Vec<Folder>> {
        folders::parent_folder_listing(self)
    }

    /// Creates a new folder on the device, the device may adjust the
    /// requested name. Returns the id of the new folder together with its
    /// effective name.
    pub fn create_folder<'a>(
        &self,
        name: &'a str,
        parent: Parent,
        storage_id: u32,
    ) -> Result<(u32, Cow<'a, str>)> {
        folders::create_folder(self, name, parent, storage_id)
    }

    /// Gathers every playlist stored in the device.
    pub fn playlists(&self) -> Result<Vec<Playlist>> {
        playlists::playlist_listing(self)
    }

    /// Retrieves a single playlist given its id.
    pub fn playlist(&self, playlist: impl AsObjectId) -> Result<Playlist> {
        playlists::playlist(self, playlist)
    }

    /// Creates a new playlist on the device, returns the id of the new
    /// object.
    pub fn create_playlist(&self, metadata: &PlaylistMetadata<'_>) -> Result<u32> {
        playlists::create_playlist(self, metadata)
    }

    /// Pushes the name and tracks of a locally modified playlist back to
    /// the device.
    pub fn update_playlist(&self, playlist: &Playlist) -> Result<()> {
        playlists::update_playlist(self, playlist)
    }

    /// Gathers every album stored in the device.
    pub fn albums(&self) -> Result<Vec<Album>> {
        albums::album_listing(self)
    }

    /// Retrieves a single album given its id.
    pub fn album(&self, album: impl AsObjectId) -> Result<Album> {
        albums::album(self, album)
    }

    /// Deletes a single object (file, track, playlist, folder...) given
    /// its id. Devices usually refuse to delete non-empty folders.
    pub fn delete_object(&self, object: impl AsObjectId) -> Result<()> {
        let res = unsafe { ffi::LIBMTP_Delete_Object(self.inner, object.as_id()) };

        if res != 0 {
            Err(self.latest_error().unwrap_or_default())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MtpErrorKind;
    use std::mem::ManuallyDrop;

    unsafe fn fake_device() -> *mut ffi::LIBMTP_mtpdevice_t {
        libc::calloc(1, std::mem::size_of::<ffi::LIBMTP_mtpdevice_t>())
            as *mut ffi::LIBMTP_mtpdevice_t
    }

    unsafe fn fake_storage(id: u32) -> *mut ffi::LIBMTP_devicestorage_t {
        let storage = libc::calloc(1, std::mem::size_of::<ffi::LIBMTP_devicestorage_t>())
            as *mut ffi::LIBMTP_devicestorage_t;
        (*storage).id = id;
        storage
    }

    unsafe fn push_error(device: *mut ffi::LIBMTP_mtpdevice_t, number: u32, text: &str) {
        let text = std::ffi::CString::new(text).unwrap();

        let entry =
            libc::malloc(std::mem::size_of::<ffi::LIBMTP_error_t>()) as *mut ffi::LIBMTP_error_t;
        (*entry).errornumber = number;
        (*entry).error_text = libc::strdup(text.as_ptr());
        (*entry).next = std::ptr::null_mut();

        if (*device).errorstack.is_null() {
            (*device).errorstack = entry;
        } else {
            let mut current = (*device).errorstack;
            while !(*current).next.is_null() {
                current = (*current).next;
            }
            (*current).next = entry;
        }
    }

    #[test]
    fn errors_drain_the_device_stack() {
        unsafe {
            let inner = fake_device();
            push_error(inner, 2, "PTP: I/O error");
            push_error(inner, 1, "Get storage failed");

            let device = ManuallyDrop::new(MediaTransfer { inner });

            let copied = device.error_stack();
            assert_eq!(copied.len(), 2);
            assert!(!(*inner).errorstack.is_null());

            match device.latest_error() {
                Some(Error::CommandFailed { kind, stack }) => {
                    assert_eq!(kind, MtpErrorKind::General);
                    assert_eq!(stack.len(), 2);
                    assert_eq!(stack[0].number(), 2);
                    assert_eq!(stack[1].text(), "Get storage failed");
                }
                other => panic!("unexpected error: {:?}", other),
            }

            assert!((*inner).errorstack.is_null());
            assert!(device.latest_error().is_none());

            libc::free(inner as *mut _);
        }
    }

    #[test]
    fn empty_stacks_fall_back_to_unknown() {
        unsafe {
            let inner = fake_device();
            let device = ManuallyDrop::new(MediaTransfer { inner });

            assert!(device.latest_error().is_none());
            assert!(matches!(
                device.latest_error().unwrap_or_default(),
                Error::Unknown
            ));

            libc::free(inner as *mut _);
        }
    }

    #[test]
    fn not_found_lookups_keep_the_drained_stack() {
        unsafe {
            let inner = fake_device();
            push_error(inner, 2, "PTP: could not get object info");

            let device = ManuallyDrop::new(MediaTransfer { inner });

            match device.object_not_found() {
                Error::ObjectNotFound { stack } => {
                    assert_eq!(stack.len(), 1);
                    assert_eq!(stack[0].text(), "PTP: could not get object info");
                }
                other => panic!("unexpected error: {:?}", other),
            }

            assert!((*inner).errorstack.is_null());

            // A silent stack still classifies as not found, just without detail.
            match device.object_not_found() {
                Error::ObjectNotFound { stack } => assert!(stack.is_empty()),
                other => panic!("unexpected error: {:?}", other),
            }

            libc::free(inner as *mut _);
        }
    }

    #[test]
    fn storages_snapshot_the_device_chain() {
        unsafe {
            let inner = fake_device();
            let second = fake_storage(2);
            let first = fake_storage(1);
            (*first).next = second;
            (*inner).storage = first;

            let device = ManuallyDrop::new(MediaTransfer { inner });

            let storages = device.storages();
            assert_eq!(storages.len(), 2);
            assert_eq!(storages[0].id(), 1);
            assert_eq!(storages[1].id(), 2);
            assert_eq!(device.primary_storage().map(|s| s.id()), Some(1));

            libc::free(first as *mut _);
            libc::free(second as *mut _);
            libc::free(inner as *mut _);
        }
    }

    #[test]
    fn devices_without_storage_have_no_primary() {
        unsafe {
            let inner = fake_device();
            let device = ManuallyDrop::new(MediaTransfer { inner });

            assert!(device.storages().is_empty());
            assert!(device.primary_storage().is_none());

            libc::free(inner as *mut _);
        }
    }

    #[test]
    fn empty_listings_are_not_errors() {
        unsafe {
            let inner = fake_device();
            let device = ManuallyDrop::new(MediaTransfer { inner });

            let files = files::collect_files(&device, std::ptr::null_mut()).unwrap();
            assert!(files.is_empty());

            push_error(inner, 5, "No device attached");
            let result = files::collect_files(&device, std::ptr::null_mut());
            assert!(matches!(
                result,
                Err(Error::CommandFailed {
                    kind: MtpErrorKind::NoDeviceAttached,
                    ..
                })
            ));
            assert!((*inner).errorstack.is_null());

            libc::free(inner as *mut _);
        }
    }

    #[test]
    fn only_one_session_can_be_open() {
        acquire_session().unwrap();
        assert!(matches!(acquire_session(), Err(Error::AlreadyConnected)));

        release_session();
        acquire_session().unwrap();
        release_session();
    }
}
