//! Contains relevant items to handle track objects stored in the device,
//! tracks are files with audio metadata attached.

use std::collections::HashSet;
use std::ffi::CString;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use mtp_sys as ffi;

use crate::device::MediaTransfer;
use crate::error::Error;
use crate::object::{filetypes::Filetype, AsObjectId};
use crate::util::{
    datetime_to_epoch, epoch_to_datetime, opt_string, path_to_cstring, progress_func_handler,
    string_or_empty, CallbackReturn,
};
use crate::Result;

use super::Parent;

/// Owned snapshot of a track object gathered from the device, tags the
/// device didn't report are `None`.
#[derive(Debug, Clone)]
pub struct Track {
    id: u32,
    parent_id: u32,
    storage_id: u32,
    title: Option<String>,
    artist: Option<String>,
    composer: Option<String>,
    genre: Option<String>,
    album: Option<String>,
    date: Option<String>,
    name: String,
    track_number: u16,
    duration: u32,
    sample_rate: u32,
    channels: u16,
    wave_codec: u32,
    bitrate: u32,
    bitrate_type: u16,
    rating: u16,
    use_count: u32,
    size: u64,
    modification_date: DateTime<Utc>,
    ftype: Filetype,
}

impl AsObjectId for Track {
    fn as_id(&self) -> u32 {
        self.id
    }
}

impl Track {
    pub(crate) unsafe fn from_native(native: *const ffi::LIBMTP_track_t) -> Self {
        Track {
            id: (*native).item_id,
            parent_id: (*native).parent_id,
            storage_id: (*native).storage_id,
            title: opt_string((*native).title),
            artist: opt_string((*native).artist),
            composer: opt_string((*native).composer),
            genre: opt_string((*native).genre),
            album: opt_string((*native).album),
            date: opt_string((*native).date),
            name: string_or_empty((*native).filename),
            track_number: (*native).tracknumber,
            duration: (*native).duration,
            sample_rate: (*native).samplerate,
            channels: (*native).nochannels,
            wave_codec: (*native).wavecodec,
            bitrate: (*native).bitrate,
            bitrate_type: (*native).bitratetype,
            rating: (*native).rating,
            use_count: (*native).usecount,
            size: (*native).filesize,
            modification_date: epoch_to_datetime((*native).modificationdate),
            ftype: Filetype::from_native((*native).filetype),
        }
    }

    /// Returns the id of this track.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the id of its parent folder, zero for the root.
    pub fn parent_id(&self) -> u32 {
        self.parent_id
    }

    /// Returns the id of the storage holding this track.
    pub fn storage_id(&self) -> u32 {
        self.storage_id
    }

    /// Returns the title tag of this track.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the artist tag of this track.
    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref()
    }

    /// Returns the composer tag of this track.
    pub fn composer(&self) -> Option<&str> {
        self.composer.as_deref()
    }

    /// Returns the genre tag of this track.
    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    /// Returns the album tag of this track.
    pub fn album(&self) -> Option<&str> {
        self.album.as_deref()
    }

    /// Returns the date tag of this track, as the device reported it.
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    /// Returns the file name of this track.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the track number inside its album, zero when unset.
    pub fn track_number(&self) -> u16 {
        self.track_number
    }

    /// Returns the duration of this track in milliseconds.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Returns the sample rate of this track in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns the number of channels of this track.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Returns the wave codec of this track, if it's a wave file.
    pub fn wave_codec(&self) -> u32 {
        self.wave_codec
    }

    /// Returns the bitrate of this track in kbps.
    pub fn bitrate(&self) -> u32 {
        self.bitrate
    }

    /// Returns the bitrate type, 1 for constant, 2 for variable, 3 for free.
    pub fn bitrate_type(&self) -> u16 {
        self.bitrate_type
    }

    /// Returns the user rating of this track, 0 to 100.
    pub fn rating(&self) -> u16 {
        self.rating
    }

    /// Returns the use count of this track.
    pub fn use_count(&self) -> u32 {
        self.use_count
    }

    /// Returns the size of this track in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the modification date of this track in UTC.
    pub fn modification_date(&self) -> DateTime<Utc> {
        self.modification_date
    }

    /// Returns the type of this track.
    pub fn ftype(&self) -> Filetype {
        self.ftype
    }
}

/// Tags attached to a track when sending it to the device, unset strings
/// are simply not reported. The file name and filetype fall back to the
/// source file when unset.
#[derive(Debug, Clone, Default)]
pub struct TrackTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub composer: Option<String>,
    pub genre: Option<String>,
    pub album: Option<String>,
    pub date: Option<String>,
    pub file_name: Option<String>,
    pub track_number: u16,
    pub duration: u32,
    pub sample_rate: u32,
    pub channels: u16,
    pub wave_codec: u32,
    pub bitrate: u32,
    pub bitrate_type: u16,
    pub rating: u16,
    pub use_count: u32,
    pub file_type: Option<Filetype>,
}

fn opt_cstring(value: Option<&str>) -> Result<Option<CString>> {
    Ok(value.map(CString::new).transpose()?)
}

fn resolved_file_name(tags: &TrackTags, path: &Path) -> String {
    tags.file_name.clone().unwrap_or_else(|| {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    })
}

fn resolved_filetype(tags: &TrackTags, path: &Path) -> Filetype {
    tags.file_type.unwrap_or_else(|| Filetype::from_path(path))
}

unsafe fn strdup_opt(value: &Option<CString>) -> *mut libc::c_char {
    match value {
        Some(value) => libc::strdup(value.as_ptr()),
        None => std::ptr::null_mut(),
    }
}

unsafe fn new_native_track(
    tags: &TrackTags,
    file_name: &str,
    file_size: u64,
    modification_date: DateTime<Utc>,
    file_type: Filetype,
    parent: Parent,
    storage_id: u32,
) -> Result<*mut ffi::LIBMTP_track_t> {
    let title = opt_cstring(tags.title.as_deref())?;
    let artist = opt_cstring(tags.artist.as_deref())?;
    let composer = opt_cstring(tags.composer.as_deref())?;
    let genre = opt_cstring(tags.genre.as_deref())?;
    let album = opt_cstring(tags.album.as_deref())?;
    let date = opt_cstring(tags.date.as_deref())?;
    let name = CString::new(file_name)?;

    let track_t = ffi::LIBMTP_new_track_t();
    if track_t.is_null() {
        return Err(Error::Unknown);
    }

    (*track_t).title = strdup_opt(&title);
    (*track_t).artist = strdup_opt(&artist);
    (*track_t).composer = strdup_opt(&composer);
    (*track_t).genre = strdup_opt(&genre);
    (*track_t).album = strdup_opt(&album);
    (*track_t).date = strdup_opt(&date);
    (*track_t).filename = libc::strdup(name.as_ptr());
    (*track_t).tracknumber = tags.track_number;
    (*track_t).duration = tags.duration;
    (*track_t).samplerate = tags.sample_rate;
    (*track_t).nochannels = tags.channels;
    (*track_t).wavecodec = tags.wave_codec;
    (*track_t).bitrate = tags.bitrate;
    (*track_t).bitratetype = tags.bitrate_type;
    (*track_t).rating = tags.rating;
    (*track_t).usecount = tags.use_count;
    (*track_t).filesize = file_size;
    (*track_t).modificationdate = datetime_to_epoch(modification_date);
    (*track_t).filetype = file_type.to_native();
    (*track_t).parent_id = parent.to_id();
    (*track_t).storage_id = storage_id;

    Ok(track_t)
}

unsafe fn collect_tracks(
    mtpdev: &MediaTransfer,
    head: *mut ffi::LIBMTP_track_t,
) -> Result<Vec<Track>> {
    if head.is_null() {
        return match mtpdev.latest_error() {
            Some(err) => Err(err),
            None => Ok(Vec::new()),
        };
    }

    let mut tracks = Vec::new();
    let mut visited = HashSet::new();

    let mut current = head;
    while !current.is_null() && visited.insert(current as usize) {
        tracks.push(Track::from_native(current));

        let next = (*current).next;
        ffi::LIBMTP_destroy_track_t(current);
        current = next;
    }

    Ok(tracks)
}

pub(crate) fn track_listing<C>(mtpdev: &MediaTransfer, callback: Option<C>) -> Result<Vec<Track>>
where
    C: FnMut(u64, u64) -> CallbackReturn,
{
    let head = if let Some(mut callback) = callback {
        let mut callback: &mut dyn FnMut(u64, u64) -> CallbackReturn = &mut callback;
        let callback = &mut callback;
        let callback = callback as *mut _ as *mut libc::c_void as *const _;

        unsafe {
            ffi::LIBMTP_Get_Tracklisting_With_Callback(
                mtpdev.inner,
                Some(progress_func_handler),
                callback,
            )
        }
    } else {
        unsafe { ffi::LIBMTP_Get_Tracklisting_With_Callback(mtpdev.inner, None, std::ptr::null()) }
    };

    unsafe { collect_tracks(mtpdev, head) }
}

pub(crate) fn track_metadata(mtpdev: &MediaTransfer, track: impl AsObjectId) -> Result<Track> {
    let metadata = unsafe { ffi::LIBMTP_Get_Trackmetadata(mtpdev.inner, track.as_id()) };

    if metadata.is_null() {
        Err(mtpdev.object_not_found())
    } else {
        let track = unsafe { Track::from_native(metadata) };
        unsafe { ffi::LIBMTP_destroy_track_t(metadata) };
        Ok(track)
    }
}

pub(crate) fn get_track_to_path<C>(
    mtpdev: &MediaTransfer,
    track: impl AsObjectId,
    path: impl AsRef<Path>,
    callback: Option<C>,
) -> Result<()>
where
    C: FnMut(u64, u64) -> CallbackReturn,
{
    let path = path_to_cstring(path.as_ref())?;

    let res = if let Some(mut callback) = callback {
        let mut callback: &mut dyn FnMut(u64, u64) -> CallbackReturn = &mut callback;
        let callback = &mut callback;
        let callback = callback as *mut _ as *mut libc::c_void as *const _;

        unsafe {
            ffi::LIBMTP_Get_Track_To_File(
                mtpdev.inner,
                track.as_id(),
                path.as_ptr(),
                Some(progress_func_handler),
                callback,
            )
        }
    } else {
        unsafe {
            ffi::LIBMTP_Get_Track_To_File(
                mtpdev.inner,
                track.as_id(),
                path.as_ptr(),
                None,
                std::ptr::null(),
            )
        }
    };

    if res != 0 {
        Err(mtpdev.latest_error().unwrap_or_default())
    } else {
        Ok(())
    }
}

pub(crate) fn send_track_from_path<C>(
    mtpdev: &MediaTransfer,
    storage_id: u32,
    path: impl AsRef<Path>,
    tags: &TrackTags,
    parent: Parent,
    callback: Option<C>,
) -> Result<u32>
where
    C: FnMut(u64, u64) -> CallbackReturn,
{
    let path = path.as_ref();
    let metadata = fs::metadata(path)?;

    let file_name = resolved_file_name(tags, path);
    let file_type = resolved_filetype(tags, path);
    let modification_date = metadata
        .modified()
        .map(DateTime::from)
        .unwrap_or_else(|_| Utc::now());

    let path = path_to_cstring(path)?;
    let track_t = unsafe {
        new_native_track(
            tags,
            &file_name,
            metadata.len(),
            modification_date,
            file_type,
            parent,
            storage_id,
        )?
    };

    let res = if let Some(mut callback) = callback {
        let mut callback: &mut dyn FnMut(u64, u64) -> CallbackReturn = &mut callback;
        let callback = &mut callback;
        let callback = callback as *mut _ as *mut libc::c_void as *const _;

        unsafe {
            ffi::LIBMTP_Send_Track_From_File(
                mtpdev.inner,
                path.as_ptr(),
                track_t,
                Some(progress_func_handler),
                callback,
            )
        }
    } else {
        unsafe {
            ffi::LIBMTP_Send_Track_From_File(
                mtpdev.inner,
                path.as_ptr(),
                track_t,
                None,
                std::ptr::null(),
            )
        }
    };

    // The device fills the assigned id into the record we sent.
    let item_id = unsafe { (*track_t).item_id };
    unsafe { ffi::LIBMTP_destroy_track_t(track_t) };

    if res != 0 {
        Err(mtpdev.latest_error().unwrap_or_default())
    } else {
        Ok(item_id)
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

    unsafe fn native_track(id: u32, name: &str) -> *mut ffi::LIBMTP_track_t {
        let name = CString::new(name).unwrap();

        let track_t = ffi::LIBMTP_new_track_t();
        (*track_t).item_id = id;
        (*track_t).filename = libc::strdup(name.as_ptr());
        track_t
    }

    #[test]
    fn chained_listings_copy_every_record() {
        unsafe {
            let device = fake_device();

            let second = native_track(8, "b.flac");
            let first = native_track(7, "a.flac");
            (*first).next = second;

            let tracks = collect_tracks(&device, first).unwrap();
            assert_eq!(tracks.len(), 2);
            assert_eq!(tracks[0].id(), 7);
            assert_eq!(tracks[1].name(), "b.flac");

            libc::free(device.inner as *mut _);
        }
    }

    #[test]
    fn cyclic_listings_visit_each_node_once() {
        unsafe {
            let device = fake_device();

            let second = native_track(8, "b.flac");
            let first = native_track(7, "a.flac");
            (*first).next = second;
            (*second).next = first;

            let tracks = collect_tracks(&device, first).unwrap();
            assert_eq!(tracks.len(), 2);

            libc::free(device.inner as *mut _);
        }
    }

    #[test]
    fn native_tracks_copy_into_owned_records() {
        let title = CString::new("Aquarela").unwrap();
        let artist = CString::new("Toquinho").unwrap();
        let name = CString::new("aquarela.mp3").unwrap();

        let native = ffi::LIBMTP_track_t {
            item_id: 20,
            parent_id: 3,
            storage_id: 65537,
            title: title.as_ptr() as *mut _,
            artist: artist.as_ptr() as *mut _,
            composer: ptr::null_mut(),
            genre: ptr::null_mut(),
            album: ptr::null_mut(),
            date: ptr::null_mut(),
            filename: name.as_ptr() as *mut _,
            tracknumber: 4,
            duration: 217_000,
            samplerate: 44_100,
            nochannels: 2,
            wavecodec: 0,
            bitrate: 320,
            bitratetype: 1,
            rating: 80,
            usecount: 3,
            filesize: 8_000_000,
            modificationdate: 1_600_000_000,
            filetype: ffi::LIBMTP_FILETYPE_MP3,
            next: ptr::null_mut(),
        };

        let track = unsafe { Track::from_native(&native) };
        assert_eq!(track.id(), 20);
        assert_eq!(track.title(), Some("Aquarela"));
        assert_eq!(track.artist(), Some("Toquinho"));
        assert_eq!(track.composer(), None);
        assert_eq!(track.album(), None);
        assert_eq!(track.name(), "aquarela.mp3");
        assert_eq!(track.track_number(), 4);
        assert_eq!(track.duration(), 217_000);
        assert_eq!(track.sample_rate(), 44_100);
        assert_eq!(track.channels(), 2);
        assert_eq!(track.bitrate(), 320);
        assert_eq!(track.rating(), 80);
        assert_eq!(track.size(), 8_000_000);
        assert_eq!(track.ftype(), Filetype::Mp3);
    }

    #[test]
    fn default_tags_are_all_unset() {
        let tags = TrackTags::default();
        assert_eq!(tags.title, None);
        assert_eq!(tags.file_name, None);
        assert_eq!(tags.file_type, None);
        assert_eq!(tags.track_number, 0);
        assert_eq!(tags.duration, 0);
    }

    #[test]
    fn unset_tags_fall_back_to_the_source_file() {
        let tags = TrackTags::default();
        let path = Path::new("/music/song.mp3");

        assert_eq!(resolved_file_name(&tags, path), "song.mp3");
        assert_eq!(resolved_filetype(&tags, path), Filetype::Mp3);
    }

    #[test]
    fn explicit_tags_win_over_the_source_file() {
        let tags = TrackTags {
            file_name: Some("renamed.flac".into()),
            file_type: Some(Filetype::Flac),
            ..Default::default()
        };
        let path = Path::new("/music/song.mp3");

        assert_eq!(resolved_file_name(&tags, path), "renamed.flac");
        assert_eq!(resolved_filetype(&tags, path), Filetype::Flac);
    }

    #[test]
    fn native_send_records_carry_the_tags() {
        let tags = TrackTags {
            title: Some("Wave".into()),
            artist: Some("Tom Jobim".into()),
            album: Some("Wave".into()),
            track_number: 1,
            duration: 172_000,
            ..Default::default()
        };

        unsafe {
            let track_t = new_native_track(
                &tags,
                "wave.flac",
                9_999,
                epoch_to_datetime(1_500_000_000),
                Filetype::Flac,
                Parent::Root,
                0,
            )
            .unwrap();

            let copied = Track::from_native(track_t);
            assert_eq!(copied.title(), Some("Wave"));
            assert_eq!(copied.artist(), Some("Tom Jobim"));
            assert_eq!(copied.composer(), None);
            assert_eq!(copied.name(), "wave.flac");
            assert_eq!(copied.track_number(), 1);
            assert_eq!(copied.size(), 9_999);
            assert_eq!(copied.ftype(), Filetype::Flac);
            assert_eq!(copied.parent_id(), 0);

            ffi::LIBMTP_destroy_track_t(track_t);
        }
    }

    #[test]
    fn tags_with_interior_nul_are_rejected() {
        let tags = TrackTags {
            title: Some("bad\0title".into()),
            ..Default::default()
        };

        let result = unsafe {
            new_native_track(
                &tags,
                "x.mp3",
                0,
                epoch_to_datetime(0),
                Filetype::Mp3,
                Parent::Root,
                0,
            )
        };

        assert!(matches!(result, Err(Error::NulError { .. })));
    }
}
