#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

//! Hand-maintained declarations for the subset of the `libmtp` C API (1.1
//! series) used by the high-level crate. Layouts and constants must be kept
//! in sync with `libmtp.h`.

use libc::{c_char, c_int, c_void};

pub type time_t = libc::time_t;

/// Virtual parent id meaning "files and folders at the root level".
pub const LIBMTP_FILES_AND_FOLDERS_ROOT: u32 = 0xffff_ffff;

pub const LIBMTP_DEBUG_NONE: u32 = 0x00;
pub const LIBMTP_DEBUG_PTP: u32 = 0x01;
pub const LIBMTP_DEBUG_PLST: u32 = 0x02;
pub const LIBMTP_DEBUG_USB: u32 = 0x04;
pub const LIBMTP_DEBUG_DATA: u32 = 0x08;
pub const LIBMTP_DEBUG_ALL: u32 = 0xff;

pub type LIBMTP_error_number_t = u32;
pub const LIBMTP_ERROR_NONE: LIBMTP_error_number_t = 0;
pub const LIBMTP_ERROR_GENERAL: LIBMTP_error_number_t = 1;
pub const LIBMTP_ERROR_PTP_LAYER: LIBMTP_error_number_t = 2;
pub const LIBMTP_ERROR_USB_LAYER: LIBMTP_error_number_t = 3;
pub const LIBMTP_ERROR_MEMORY_ALLOCATION: LIBMTP_error_number_t = 4;
pub const LIBMTP_ERROR_NO_DEVICE_ATTACHED: LIBMTP_error_number_t = 5;
pub const LIBMTP_ERROR_STORAGE_FULL: LIBMTP_error_number_t = 6;
pub const LIBMTP_ERROR_CONNECTING: LIBMTP_error_number_t = 7;
pub const LIBMTP_ERROR_CANCELLED: LIBMTP_error_number_t = 8;

pub type LIBMTP_filetype_t = u32;
pub const LIBMTP_FILETYPE_FOLDER: LIBMTP_filetype_t = 0;
pub const LIBMTP_FILETYPE_WAV: LIBMTP_filetype_t = 1;
pub const LIBMTP_FILETYPE_MP3: LIBMTP_filetype_t = 2;
pub const LIBMTP_FILETYPE_WMA: LIBMTP_filetype_t = 3;
pub const LIBMTP_FILETYPE_OGG: LIBMTP_filetype_t = 4;
pub const LIBMTP_FILETYPE_AUDIBLE: LIBMTP_filetype_t = 5;
pub const LIBMTP_FILETYPE_MP4: LIBMTP_filetype_t = 6;
pub const LIBMTP_FILETYPE_UNDEF_AUDIO: LIBMTP_filetype_t = 7;
pub const LIBMTP_FILETYPE_WMV: LIBMTP_filetype_t = 8;
pub const LIBMTP_FILETYPE_AVI: LIBMTP_filetype_t = 9;
pub const LIBMTP_FILETYPE_MPEG: LIBMTP_filetype_t = 10;
pub const LIBMTP_FILETYPE_ASF: LIBMTP_filetype_t = 11;
pub const LIBMTP_FILETYPE_QT: LIBMTP_filetype_t = 12;
pub const LIBMTP_FILETYPE_UNDEF_VIDEO: LIBMTP_filetype_t = 13;
pub const LIBMTP_FILETYPE_JPEG: LIBMTP_filetype_t = 14;
pub const LIBMTP_FILETYPE_JFIF: LIBMTP_filetype_t = 15;
pub const LIBMTP_FILETYPE_TIFF: LIBMTP_filetype_t = 16;
pub const LIBMTP_FILETYPE_BMP: LIBMTP_filetype_t = 17;
pub const LIBMTP_FILETYPE_GIF: LIBMTP_filetype_t = 18;
pub const LIBMTP_FILETYPE_PICT: LIBMTP_filetype_t = 19;
pub const LIBMTP_FILETYPE_PNG: LIBMTP_filetype_t = 20;
pub const LIBMTP_FILETYPE_VCALENDAR1: LIBMTP_filetype_t = 21;
pub const LIBMTP_FILETYPE_VCALENDAR2: LIBMTP_filetype_t = 22;
pub const LIBMTP_FILETYPE_VCARD2: LIBMTP_filetype_t = 23;
pub const LIBMTP_FILETYPE_VCARD3: LIBMTP_filetype_t = 24;
pub const LIBMTP_FILETYPE_WINDOWSIMAGEFORMAT: LIBMTP_filetype_t = 25;
pub const LIBMTP_FILETYPE_WINEXEC: LIBMTP_filetype_t = 26;
pub const LIBMTP_FILETYPE_TEXT: LIBMTP_filetype_t = 27;
pub const LIBMTP_FILETYPE_HTML: LIBMTP_filetype_t = 28;
pub const LIBMTP_FILETYPE_FIRMWARE: LIBMTP_filetype_t = 29;
pub const LIBMTP_FILETYPE_AAC: LIBMTP_filetype_t = 30;
pub const LIBMTP_FILETYPE_MEDIACARD: LIBMTP_filetype_t = 31;
pub const LIBMTP_FILETYPE_FLAC: LIBMTP_filetype_t = 32;
pub const LIBMTP_FILETYPE_MP2: LIBMTP_filetype_t = 33;
pub const LIBMTP_FILETYPE_M4A: LIBMTP_filetype_t = 34;
pub const LIBMTP_FILETYPE_DOC: LIBMTP_filetype_t = 35;
pub const LIBMTP_FILETYPE_XML: LIBMTP_filetype_t = 36;
pub const LIBMTP_FILETYPE_XLS: LIBMTP_filetype_t = 37;
pub const LIBMTP_FILETYPE_PPT: LIBMTP_filetype_t = 38;
pub const LIBMTP_FILETYPE_MHT: LIBMTP_filetype_t = 39;
pub const LIBMTP_FILETYPE_JP2: LIBMTP_filetype_t = 40;
pub const LIBMTP_FILETYPE_JPX: LIBMTP_filetype_t = 41;
pub const LIBMTP_FILETYPE_ALBUM: LIBMTP_filetype_t = 42;
pub const LIBMTP_FILETYPE_PLAYLIST: LIBMTP_filetype_t = 43;
pub const LIBMTP_FILETYPE_UNKNOWN: LIBMTP_filetype_t = 44;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct LIBMTP_device_entry_t {
    pub vendor: *mut c_char,
    pub vendor_id: u16,
    pub product: *mut c_char,
    pub product_id: u16,
    pub device_flags: u32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct LIBMTP_raw_device_t {
    pub device_entry: LIBMTP_device_entry_t,
    pub bus_location: u32,
    pub devnum: u8,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct LIBMTP_error_t {
    pub errornumber: LIBMTP_error_number_t,
    pub error_text: *mut c_char,
    pub next: *mut LIBMTP_error_t,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct LIBMTP_device_extension_t {
    pub name: *mut c_char,
    pub major: c_int,
    pub minor: c_int,
    pub next: *mut LIBMTP_device_extension_t,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct LIBMTP_devicestorage_t {
    pub id: u32,
    pub StorageType: u16,
    pub FilesystemType: u16,
    pub AccessCapability: u16,
    pub MaxCapacity: u64,
    pub FreeSpaceInBytes: u64,
    pub FreeSpaceInObjects: u64,
    pub StorageDescription: *mut c_char,
    pub VolumeIdentifier: *mut c_char,
    pub next: *mut LIBMTP_devicestorage_t,
    pub prev: *mut LIBMTP_devicestorage_t,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct LIBMTP_mtpdevice_t {
    pub object_bitsize: u8,
    pub params: *mut c_void,
    pub usbinfo: *mut c_void,
    pub storage: *mut LIBMTP_devicestorage_t,
    pub errorstack: *mut LIBMTP_error_t,
    pub maximum_battery_level: u8,
    pub default_music_folder: u32,
    pub default_playlist_folder: u32,
    pub default_picture_folder: u32,
    pub default_video_folder: u32,
    pub default_organizer_folder: u32,
    pub default_zencast_folder: u32,
    pub default_album_folder: u32,
    pub default_text_folder: u32,
    pub cd: *mut c_void,
    pub extensions: *mut LIBMTP_device_extension_t,
    pub cached: c_int,
    pub next: *mut LIBMTP_mtpdevice_t,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct LIBMTP_file_t {
    pub item_id: u32,
    pub parent_id: u32,
    pub storage_id: u32,
    pub filename: *mut c_char,
    pub filesize: u64,
    pub modificationdate: time_t,
    pub filetype: LIBMTP_filetype_t,
    pub next: *mut LIBMTP_file_t,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct LIBMTP_track_t {
    pub item_id: u32,
    pub parent_id: u32,
    pub storage_id: u32,
    pub title: *mut c_char,
    pub artist: *mut c_char,
    pub composer: *mut c_char,
    pub genre: *mut c_char,
    pub album: *mut c_char,
    pub date: *mut c_char,
    pub filename: *mut c_char,
    pub tracknumber: u16,
    pub duration: u32,
    pub samplerate: u32,
    pub nochannels: u16,
    pub wavecodec: u32,
    pub bitrate: u32,
    pub bitratetype: u16,
    pub rating: u16,
    pub usecount: u32,
    pub filesize: u64,
    pub modificationdate: time_t,
    pub filetype: LIBMTP_filetype_t,
    pub next: *mut LIBMTP_track_t,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct LIBMTP_playlist_t {
    pub playlist_id: u32,
    pub parent_id: u32,
    pub storage_id: u32,
    pub name: *mut c_char,
    pub tracks: *mut u32,
    pub no_tracks: u32,
    pub next: *mut LIBMTP_playlist_t,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct LIBMTP_album_t {
    pub album_id: u32,
    pub parent_id: u32,
    pub storage_id: u32,
    pub name: *mut c_char,
    pub artist: *mut c_char,
    pub composer: *mut c_char,
    pub genre: *mut c_char,
    pub tracks: *mut u32,
    pub no_tracks: u32,
    pub next: *mut LIBMTP_album_t,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct LIBMTP_folder_t {
    pub folder_id: u32,
    pub parent_id: u32,
    pub storage_id: u32,
    pub name: *mut c_char,
    pub sibling: *mut LIBMTP_folder_t,
    pub child: *mut LIBMTP_folder_t,
}

pub type LIBMTP_progressfunc_t =
    Option<unsafe extern "C" fn(sent: u64, total: u64, data: *const c_void) -> c_int>;

extern "C" {
    pub fn LIBMTP_Init();
    pub fn LIBMTP_Set_Debug(level: c_int);

    pub fn LIBMTP_Get_Supported_Devices_List(
        devices: *mut *mut LIBMTP_device_entry_t,
        numdevs: *mut c_int,
    ) -> c_int;
    pub fn LIBMTP_Detect_Raw_Devices(
        devices: *mut *mut LIBMTP_raw_device_t,
        numdevs: *mut c_int,
    ) -> LIBMTP_error_number_t;
    pub fn LIBMTP_Check_Specific_Device(busno: c_int, devno: c_int) -> c_int;
    pub fn LIBMTP_Open_Raw_Device(rawdevice: *mut LIBMTP_raw_device_t)
        -> *mut LIBMTP_mtpdevice_t;
    pub fn LIBMTP_Open_Raw_Device_Uncached(
        rawdevice: *mut LIBMTP_raw_device_t,
    ) -> *mut LIBMTP_mtpdevice_t;
    pub fn LIBMTP_Get_First_Device() -> *mut LIBMTP_mtpdevice_t;
    pub fn LIBMTP_Release_Device(device: *mut LIBMTP_mtpdevice_t);
    pub fn LIBMTP_Reset_Device(device: *mut LIBMTP_mtpdevice_t) -> c_int;
    pub fn LIBMTP_Dump_Device_Info(device: *mut LIBMTP_mtpdevice_t);

    pub fn LIBMTP_Get_Friendlyname(device: *mut LIBMTP_mtpdevice_t) -> *mut c_char;
    pub fn LIBMTP_Set_Friendlyname(
        device: *mut LIBMTP_mtpdevice_t,
        friendlyname: *const c_char,
    ) -> c_int;
    pub fn LIBMTP_Get_Serialnumber(device: *mut LIBMTP_mtpdevice_t) -> *mut c_char;
    pub fn LIBMTP_Get_Manufacturername(device: *mut LIBMTP_mtpdevice_t) -> *mut c_char;
    pub fn LIBMTP_Get_Modelname(device: *mut LIBMTP_mtpdevice_t) -> *mut c_char;
    pub fn LIBMTP_Get_Deviceversion(device: *mut LIBMTP_mtpdevice_t) -> *mut c_char;
    pub fn LIBMTP_Get_Batterylevel(
        device: *mut LIBMTP_mtpdevice_t,
        maximum_level: *mut u8,
        current_level: *mut u8,
    ) -> c_int;

    pub fn LIBMTP_Get_Errorstack(device: *mut LIBMTP_mtpdevice_t) -> *mut LIBMTP_error_t;
    pub fn LIBMTP_Clear_Errorstack(device: *mut LIBMTP_mtpdevice_t);
    pub fn LIBMTP_Dump_Errorstack(device: *mut LIBMTP_mtpdevice_t);

    pub fn LIBMTP_Get_Storage(device: *mut LIBMTP_mtpdevice_t, sortby: c_int) -> c_int;

    pub fn LIBMTP_new_file_t() -> *mut LIBMTP_file_t;
    pub fn LIBMTP_destroy_file_t(file: *mut LIBMTP_file_t);
    pub fn LIBMTP_Get_Filelisting_With_Callback(
        device: *mut LIBMTP_mtpdevice_t,
        callback: LIBMTP_progressfunc_t,
        data: *const c_void,
    ) -> *mut LIBMTP_file_t;
    pub fn LIBMTP_Get_Filemetadata(
        device: *mut LIBMTP_mtpdevice_t,
        fileid: u32,
    ) -> *mut LIBMTP_file_t;
    pub fn LIBMTP_Get_File_To_File(
        device: *mut LIBMTP_mtpdevice_t,
        fileid: u32,
        path: *const c_char,
        callback: LIBMTP_progressfunc_t,
        data: *const c_void,
    ) -> c_int;
    pub fn LIBMTP_Send_File_From_File(
        device: *mut LIBMTP_mtpdevice_t,
        path: *const c_char,
        filedata: *mut LIBMTP_file_t,
        callback: LIBMTP_progressfunc_t,
        data: *const c_void,
    ) -> c_int;
    pub fn LIBMTP_Get_Filetype_Description(filetype: LIBMTP_filetype_t) -> *const c_char;

    pub fn LIBMTP_new_track_t() -> *mut LIBMTP_track_t;
    pub fn LIBMTP_destroy_track_t(track: *mut LIBMTP_track_t);
    pub fn LIBMTP_Get_Tracklisting_With_Callback(
        device: *mut LIBMTP_mtpdevice_t,
        callback: LIBMTP_progressfunc_t,
        data: *const c_void,
    ) -> *mut LIBMTP_track_t;
    pub fn LIBMTP_Get_Trackmetadata(
        device: *mut LIBMTP_mtpdevice_t,
        trackid: u32,
    ) -> *mut LIBMTP_track_t;
    pub fn LIBMTP_Get_Track_To_File(
        device: *mut LIBMTP_mtpdevice_t,
        trackid: u32,
        path: *const c_char,
        callback: LIBMTP_progressfunc_t,
        data: *const c_void,
    ) -> c_int;
    pub fn LIBMTP_Send_Track_From_File(
        device: *mut LIBMTP_mtpdevice_t,
        path: *const c_char,
        trackdata: *mut LIBMTP_track_t,
        callback: LIBMTP_progressfunc_t,
        data: *const c_void,
    ) -> c_int;

    pub fn LIBMTP_new_folder_t() -> *mut LIBMTP_folder_t;
    pub fn LIBMTP_destroy_folder_t(folder: *mut LIBMTP_folder_t);
    pub fn LIBMTP_Get_Folder_List(device: *mut LIBMTP_mtpdevice_t) -> *mut LIBMTP_folder_t;
    pub fn LIBMTP_Find_Folder(
        folderlist: *mut LIBMTP_folder_t,
        folder_id: u32,
    ) -> *mut LIBMTP_folder_t;
    pub fn LIBMTP_Create_Folder(
        device: *mut LIBMTP_mtpdevice_t,
        name: *mut c_char,
        parent_id: u32,
        storage_id: u32,
    ) -> u32;

    pub fn LIBMTP_new_playlist_t() -> *mut LIBMTP_playlist_t;
    pub fn LIBMTP_destroy_playlist_t(playlist: *mut LIBMTP_playlist_t);
    pub fn LIBMTP_Get_Playlist_List(device: *mut LIBMTP_mtpdevice_t) -> *mut LIBMTP_playlist_t;
    pub fn LIBMTP_Get_Playlist(
        device: *mut LIBMTP_mtpdevice_t,
        playlist_id: u32,
    ) -> *mut LIBMTP_playlist_t;
    pub fn LIBMTP_Create_New_Playlist(
        device: *mut LIBMTP_mtpdevice_t,
        metadata: *mut LIBMTP_playlist_t,
    ) -> c_int;
    pub fn LIBMTP_Update_Playlist(
        device: *mut LIBMTP_mtpdevice_t,
        metadata: *mut LIBMTP_playlist_t,
    ) -> c_int;

    pub fn LIBMTP_new_album_t() -> *mut LIBMTP_album_t;
    pub fn LIBMTP_destroy_album_t(album: *mut LIBMTP_album_t);
    pub fn LIBMTP_Get_Album_List(device: *mut LIBMTP_mtpdevice_t) -> *mut LIBMTP_album_t;
    pub fn LIBMTP_Get_Album(device: *mut LIBMTP_mtpdevice_t, album_id: u32)
        -> *mut LIBMTP_album_t;

    pub fn LIBMTP_Delete_Object(device: *mut LIBMTP_mtpdevice_t, object_id: u32) -> c_int;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init() {
        unsafe {
            LIBMTP_Init();
        }
    }
}
