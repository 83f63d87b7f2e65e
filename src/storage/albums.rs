//! Contains relevant items to handle album objects stored in the device,
//! albums group tracks and carry their own tags.

use std::collections::HashSet;
use std::slice;

use mtp_sys as ffi;

use crate::device::MediaTransfer;
use crate::object::AsObjectId;
use crate::util::{opt_string, string_or_empty};
use crate::Result;

/// Owned snapshot of an album object gathered from the device.
#[derive(Debug, Clone)]
pub struct Album {
    id: u32,
    parent_id: u32,
    storage_id: u32,
    name: String,
    artist: Option<String>,
    composer: Option<String>,
    genre: Option<String>,
    tracks: Vec<u32>,
}

impl AsObjectId for Album {
    fn as_id(&self) -> u32 {
        self.id
    }
}

impl Album {
    pub(crate) unsafe fn from_native(native: *const ffi::LIBMTP_album_t) -> Self {
        let tracks = if (*native).tracks.is_null() || (*native).no_tracks == 0 {
            Vec::new()
        } else {
            slice::from_raw_parts((*native).tracks, (*native).no_tracks as usize).to_vec()
        };

        Album {
            id: (*native).album_id,
            parent_id: (*native).parent_id,
            storage_id: (*native).storage_id,
            name: string_or_empty((*native).name),
            artist: opt_string((*native).artist),
            composer: opt_string((*native).composer),
            genre: opt_string((*native).genre),
            tracks,
        }
    }

    /// Returns the id of this album.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the id of its parent folder, zero for the root.
    pub fn parent_id(&self) -> u32 {
        self.parent_id
    }

    /// Returns the id of the storage holding this album.
    pub fn storage_id(&self) -> u32 {
        self.storage_id
    }

    /// Returns the name of this album.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the artist tag of this album.
    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref()
    }

    /// Returns the composer tag of this album.
    pub fn composer(&self) -> Option<&str> {
        self.composer.as_deref()
    }

    /// Returns the genre tag of this album.
    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    /// Returns the track ids grouped under this album.
    pub fn tracks(&self) -> &[u32] {
        &self.tracks
    }
}

unsafe fn collect_albums(
    mtpdev: &MediaTransfer,
    head: *mut ffi::LIBMTP_album_t,
) -> Result<Vec<Album>> {
    if head.is_null() {
        return match mtpdev.latest_error() {
            Some(err) => Err(err),
            None => Ok(Vec::new()),
        };
    }

    let mut albums = Vec::new();
    let mut visited = HashSet::new();

    let mut current = head;
    while !current.is_null() && visited.insert(current as usize) {
        albums.push(Album::from_native(current));

        let next = (*current).next;
        ffi::LIBMTP_destroy_album_t(current);
        current = next;
    }

    Ok(albums)
}

pub(crate) fn album_listing(mtpdev: &MediaTransfer) -> Result<Vec<Album>> {
    let head = unsafe { ffi::LIBMTP_Get_Album_List(mtpdev.inner) };
    unsafe { collect_albums(mtpdev, head) }
}

pub(crate) fn album(mtpdev: &MediaTransfer, album: impl AsObjectId) -> Result<Album> {
    let native = unsafe { ffi::LIBMTP_Get_Album(mtpdev.inner, album.as_id()) };

    if native.is_null() {
        Err(mtpdev.object_not_found())
    } else {
        let album = unsafe { Album::from_native(native) };
        unsafe { ffi::LIBMTP_destroy_album_t(native) };
        Ok(album)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::mem::ManuallyDrop;
    use std::ptr;

    unsafe fn fake_device() -> ManuallyDrop<MediaTransfer> {
        let inner = libc::calloc(1, std::mem::size_of::<ffi::LIBMTP_mtpdevice_t>())
            as *mut ffi::LIBMTP_mtpdevice_t;
        ManuallyDrop::new(MediaTransfer { inner })
    }

    unsafe fn native_album(id: u32, name: &str) -> *mut ffi::LIBMTP_album_t {
        let name = CString::new(name).unwrap();

        let album_t = ffi::LIBMTP_new_album_t();
        (*album_t).album_id = id;
        (*album_t).name = libc::strdup(name.as_ptr());
        album_t
    }

    #[test]
    fn chained_listings_copy_every_record() {
        unsafe {
            let device = fake_device();

            let second = native_album(41, "Wave");
            let first = native_album(40, "Elis & Tom");
            (*first).next = second;

            let albums = collect_albums(&device, first).unwrap();
            assert_eq!(albums.len(), 2);
            assert_eq!(albums[0].id(), 40);
            assert_eq!(albums[1].name(), "Wave");

            libc::free(device.inner as *mut _);
        }
    }

    #[test]
    fn cyclic_listings_visit_each_node_once() {
        unsafe {
            let device = fake_device();

            let second = native_album(41, "b");
            let first = native_album(40, "a");
            (*first).next = second;
            (*second).next = first;

            let albums = collect_albums(&device, first).unwrap();
            assert_eq!(albums.len(), 2);

            libc::free(device.inner as *mut _);
        }
    }

    #[test]
    fn native_albums_copy_into_owned_records() {
        let name = CString::new("Elis & Tom").unwrap();
        let artist = CString::new("Elis Regina").unwrap();
        let mut tracks = [7_u32, 8];

        let native = ffi::LIBMTP_album_t {
            album_id: 40,
            parent_id: 6,
            storage_id: 65537,
            name: name.as_ptr() as *mut _,
            artist: artist.as_ptr() as *mut _,
            composer: ptr::null_mut(),
            genre: ptr::null_mut(),
            tracks: tracks.as_mut_ptr(),
            no_tracks: tracks.len() as u32,
            next: ptr::null_mut(),
        };

        let album = unsafe { Album::from_native(&native) };
        assert_eq!(album.id(), 40);
        assert_eq!(album.name(), "Elis & Tom");
        assert_eq!(album.artist(), Some("Elis Regina"));
        assert_eq!(album.composer(), None);
        assert_eq!(album.genre(), None);
        assert_eq!(album.tracks(), &[7, 8]);
    }

    #[test]
    fn empty_albums_have_no_tracks() {
        let name = CString::new("Empty").unwrap();
        let native = ffi::LIBMTP_album_t {
            album_id: 41,
            parent_id: 0,
            storage_id: 0,
            name: name.as_ptr() as *mut _,
            artist: ptr::null_mut(),
            composer: ptr::null_mut(),
            genre: ptr::null_mut(),
            tracks: ptr::null_mut(),
            no_tracks: 0,
            next: ptr::null_mut(),
        };

        let album = unsafe { Album::from_native(&native) };
        assert!(album.tracks().is_empty());
        assert_eq!(album.artist(), None);
    }
}
