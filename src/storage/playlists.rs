//! Contains relevant items to handle playlist objects stored in the device,
//! playlists are ordered lists of track ids.

use std::collections::HashSet;
use std::ffi::CString;
use std::slice;

use mtp_sys as ffi;

use crate::device::MediaTransfer;
use crate::error::Error;
use crate::object::AsObjectId;
use crate::storage::Parent;
use crate::util::string_or_empty;
use crate::Result;

/// Owned snapshot of a playlist object gathered from the device. Mutate it
/// locally and push the changes with
/// [`update_playlist`](crate::device::MediaTransfer::update_playlist).
#[derive(Debug, Clone)]
pub struct Playlist {
    id: u32,
    parent_id: u32,
    storage_id: u32,
    name: String,
    tracks: Vec<u32>,
}

impl AsObjectId for Playlist {
    fn as_id(&self) -> u32 {
        self.id
    }
}

impl Playlist {
    pub(crate) unsafe fn from_native(native: *const ffi::LIBMTP_playlist_t) -> Self {
        let tracks = if (*native).tracks.is_null() || (*native).no_tracks == 0 {
            Vec::new()
        } else {
            slice::from_raw_parts((*native).tracks, (*native).no_tracks as usize).to_vec()
        };

        Playlist {
            id: (*native).playlist_id,
            parent_id: (*native).parent_id,
            storage_id: (*native).storage_id,
            name: string_or_empty((*native).name),
            tracks,
        }
    }

    /// Returns the id of this playlist.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the id of its parent folder, zero for the root.
    pub fn parent_id(&self) -> u32 {
        self.parent_id
    }

    /// Returns the id of the storage holding this playlist.
    pub fn storage_id(&self) -> u32 {
        self.storage_id
    }

    /// Returns the name of this playlist.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the name of this playlist, only locally.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns the ordered track ids of this playlist.
    pub fn tracks(&self) -> &[u32] {
        &self.tracks
    }

    /// Mutable access to the ordered track ids, only local until pushed.
    pub fn tracks_mut(&mut self) -> &mut Vec<u32> {
        &mut self.tracks
    }
}

/// Describes a playlist to create on the device.
#[derive(Debug, Clone, Default)]
pub struct PlaylistMetadata<'a> {
    pub name: &'a str,
    pub tracks: &'a [u32],
    pub parent: Parent,
    pub storage_id: u32,
}

unsafe fn new_native_playlist(
    playlist_id: u32,
    name: &str,
    tracks: &[u32],
    parent: Parent,
    storage_id: u32,
) -> Result<*mut ffi::LIBMTP_playlist_t> {
    let name = CString::new(name)?;

    let playlist_t = ffi::LIBMTP_new_playlist_t();
    if playlist_t.is_null() {
        return Err(Error::Unknown);
    }

    (*playlist_t).playlist_id = playlist_id;
    (*playlist_t).parent_id = parent.to_id();
    (*playlist_t).storage_id = storage_id;
    (*playlist_t).name = libc::strdup(name.as_ptr());

    // The native destroyer frees the track buffer, so it must come from
    // the C allocator.
    if tracks.is_empty() {
        (*playlist_t).tracks = std::ptr::null_mut();
        (*playlist_t).no_tracks = 0;
    } else {
        let buffer = libc::malloc(tracks.len() * std::mem::size_of::<u32>()) as *mut u32;
        if buffer.is_null() {
            ffi::LIBMTP_destroy_playlist_t(playlist_t);
            return Err(Error::Unknown);
        }

        std::ptr::copy_nonoverlapping(tracks.as_ptr(), buffer, tracks.len());
        (*playlist_t).tracks = buffer;
        (*playlist_t).no_tracks = tracks.len() as u32;
    }

    Ok(playlist_t)
}

unsafe fn collect_playlists(
    mtpdev: &MediaTransfer,
    head: *mut ffi::LIBMTP_playlist_t,
) -> Result<Vec<Playlist>> {
    if head.is_null() {
        return match mtpdev.latest_error() {
            Some(err) => Err(err),
            None => Ok(Vec::new()),
        };
    }

    let mut playlists = Vec::new();
    let mut visited = HashSet::new();

    let mut current = head;
    while !current.is_null() && visited.insert(current as usize) {
        playlists.push(Playlist::from_native(current));

        let next = (*current).next;
        ffi::LIBMTP_destroy_playlist_t(current);
        current = next;
    }

    Ok(playlists)
}

pub(crate) fn playlist_listing(mtpdev: &MediaTransfer) -> Result<Vec<Playlist>> {
    let head = unsafe { ffi::LIBMTP_Get_Playlist_List(mtpdev.inner) };
    unsafe { collect_playlists(mtpdev, head) }
}

pub(crate) fn playlist(mtpdev: &MediaTransfer, playlist: impl AsObjectId) -> Result<Playlist> {
    let native = unsafe { ffi::LIBMTP_Get_Playlist(mtpdev.inner, playlist.as_id()) };

    if native.is_null() {
        Err(mtpdev.object_not_found())
    } else {
        let playlist = unsafe { Playlist::from_native(native) };
        unsafe { ffi::LIBMTP_destroy_playlist_t(native) };
        Ok(playlist)
    }
}

pub(crate) fn create_playlist(
    mtpdev: &MediaTransfer,
    metadata: &PlaylistMetadata<'_>,
) -> Result<u32> {
    let playlist_t = unsafe {
        new_native_playlist(
            0,
            metadata.name,
            metadata.tracks,
            metadata.parent,
            metadata.storage_id,
        )?
    };

    let res = unsafe { ffi::LIBMTP_Create_New_Playlist(mtpdev.inner, playlist_t) };

    // The device fills the assigned id into the record we sent.
    let playlist_id = unsafe { (*playlist_t).playlist_id };
    unsafe { ffi::LIBMTP_destroy_playlist_t(playlist_t) };

    if res != 0 {
        Err(mtpdev.latest_error().unwrap_or_default())
    } else {
        Ok(playlist_id)
    }
}

pub(crate) fn update_playlist(mtpdev: &MediaTransfer, playlist: &Playlist) -> Result<()> {
    let playlist_t = unsafe {
        new_native_playlist(
            playlist.id(),
            playlist.name(),
            playlist.tracks(),
            Parent::Folder(playlist.parent_id()),
            playlist.storage_id(),
        )?
    };

    let res = unsafe { ffi::LIBMTP_Update_Playlist(mtpdev.inner, playlist_t) };
    unsafe { ffi::LIBMTP_destroy_playlist_t(playlist_t) };

    if res != 0 {
        Err(mtpdev.latest_error().unwrap_or_default())
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::ManuallyDrop;
    use std::ptr;

    unsafe fn fake_device() -> ManuallyDrop<MediaTransfer> {
        let inner = libc::calloc(1, std::mem::size_of::<ffi::LIBMTP_mtpdevice_t>())
            as *mut ffi::LIBMTP_mtpdevice_t;
        ManuallyDrop::new(MediaTransfer { inner })
    }

    #[test]
    fn chained_listings_copy_every_record() {
        unsafe {
            let device = fake_device();

            let second = new_native_playlist(31, "Jogging", &[], Parent::Root, 0).unwrap();
            let first = new_native_playlist(30, "Road trip", &[1, 2], Parent::Root, 0).unwrap();
            (*first).next = second;

            let playlists = collect_playlists(&device, first).unwrap();
            assert_eq!(playlists.len(), 2);
            assert_eq!(playlists[0].id(), 30);
            assert_eq!(playlists[0].tracks(), &[1, 2]);
            assert_eq!(playlists[1].name(), "Jogging");

            libc::free(device.inner as *mut _);
        }
    }

    #[test]
    fn cyclic_listings_visit_each_node_once() {
        unsafe {
            let device = fake_device();

            let second = new_native_playlist(31, "b", &[], Parent::Root, 0).unwrap();
            let first = new_native_playlist(30, "a", &[], Parent::Root, 0).unwrap();
            (*first).next = second;
            (*second).next = first;

            let playlists = collect_playlists(&device, first).unwrap();
            assert_eq!(playlists.len(), 2);

            libc::free(device.inner as *mut _);
        }
    }

    #[test]
    fn native_playlists_copy_into_owned_records() {
        let name = CString::new("Road trip").unwrap();
        let mut tracks = [11_u32, 12, 13];

        let native = ffi::LIBMTP_playlist_t {
            playlist_id: 30,
            parent_id: 5,
            storage_id: 65537,
            name: name.as_ptr() as *mut _,
            tracks: tracks.as_mut_ptr(),
            no_tracks: tracks.len() as u32,
            next: ptr::null_mut(),
        };

        let playlist = unsafe { Playlist::from_native(&native) };
        assert_eq!(playlist.id(), 30);
        assert_eq!(playlist.parent_id(), 5);
        assert_eq!(playlist.name(), "Road trip");
        assert_eq!(playlist.tracks(), &[11, 12, 13]);
    }

    #[test]
    fn null_track_buffers_map_to_empty_lists() {
        let name = CString::new("Empty").unwrap();
        let native = ffi::LIBMTP_playlist_t {
            playlist_id: 31,
            parent_id: 0,
            storage_id: 0,
            name: name.as_ptr() as *mut _,
            tracks: ptr::null_mut(),
            no_tracks: 7,
            next: ptr::null_mut(),
        };

        let playlist = unsafe { Playlist::from_native(&native) };
        assert!(playlist.tracks().is_empty());
    }

    #[test]
    fn native_records_survive_a_round_trip() {
        unsafe {
            let playlist_t =
                new_native_playlist(42, "Workout", &[1, 2, 3, 4], Parent::Folder(9), 65537)
                    .unwrap();

            let copied = Playlist::from_native(playlist_t);
            assert_eq!(copied.id(), 42);
            assert_eq!(copied.parent_id(), 9);
            assert_eq!(copied.storage_id(), 65537);
            assert_eq!(copied.name(), "Workout");
            assert_eq!(copied.tracks(), &[1, 2, 3, 4]);

            ffi::LIBMTP_destroy_playlist_t(playlist_t);
        }
    }

    #[test]
    fn empty_track_lists_stay_null() {
        unsafe {
            let playlist_t = new_native_playlist(0, "None", &[], Parent::Root, 0).unwrap();

            assert!((*playlist_t).tracks.is_null());
            assert_eq!((*playlist_t).no_tracks, 0);
            assert_eq!((*playlist_t).parent_id, 0);

            ffi::LIBMTP_destroy_playlist_t(playlist_t);
        }
    }
}
