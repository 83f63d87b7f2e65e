//! Contains all the filetypes that `libmtp` claims to support and can handle.
//! Note that some devices may not support some filetypes.

use mtp_sys as ffi;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use std::ffi::CStr;
use std::fmt::{self, Display};
use std::path::Path;

/// Enumeration that holds the supported filetypes, this enum implements `Display`
/// with the description of the file type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum Filetype {
    Folder = 0,
    Wav,
    Mp3,
    Wma,
    Ogg,
    Audible,
    Mp4,
    UndefAudio,
    Wmv,
    Avi,
    Mpeg,
    Asf,
    Qt,
    UndefVideo,
    Jpeg,
    Jfif,
    Tiff,
    Bmp,
    Gif,
    Pict,
    Png,
    VCalendar1,
    VCalendar2,
    VCard2,
    VCard3,
    WindowsImageFormat,
    WinExec,
    Text,
    Html,
    Firmware,
    Aac,
    MediaCard,
    Flac,
    Mp2,
    M4a,
    Doc,
    Xml,
    Xls,
    Ppt,
    Mht,
    Jp2,
    Jpx,
    Album,
    Playlist,
    Unknown,
}

impl Filetype {
    /// Guesses the filetype from the extension of a file name, names without
    /// a known extension map to [`Filetype::Unknown`].
    pub fn from_filename(filename: &str) -> Self {
        let extension = filename
            .rsplit('.')
            .next()
            .unwrap_or(filename)
            .to_lowercase();

        match extension.as_str() {
            "wav" | "wave" => Filetype::Wav,
            "mp3" => Filetype::Mp3,
            "wma" => Filetype::Wma,
            "ogg" => Filetype::Ogg,
            "mp4" => Filetype::Mp4,
            "wmv" => Filetype::Wmv,
            "avi" => Filetype::Avi,
            "mpeg" | "mpg" => Filetype::Mpeg,
            "asf" => Filetype::Asf,
            "qt" | "mov" => Filetype::Qt,
            "jpeg" | "jpg" => Filetype::Jpeg,
            "jfif" => Filetype::Jfif,
            "tif" | "tiff" => Filetype::Tiff,
            "bmp" => Filetype::Bmp,
            "gif" => Filetype::Gif,
            "pic" | "pict" => Filetype::Pict,
            "png" => Filetype::Png,
            "wmf" => Filetype::WindowsImageFormat,
            "ics" => Filetype::VCalendar2,
            "exe" | "com" | "bat" | "dll" | "sys" => Filetype::WinExec,
            "aac" => Filetype::Aac,
            "mp2" => Filetype::Mp2,
            "flac" => Filetype::Flac,
            "m4a" => Filetype::M4a,
            "doc" => Filetype::Doc,
            "xml" => Filetype::Xml,
            "xls" => Filetype::Xls,
            "ppt" => Filetype::Ppt,
            "mht" => Filetype::Mht,
            "jp2" => Filetype::Jp2,
            "jpx" => Filetype::Jpx,
            _ => Filetype::Unknown,
        }
    }

    /// Guesses the filetype from the file name of a path.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().file_name() {
            Some(name) => Self::from_filename(&name.to_string_lossy()),
            None => Filetype::Unknown,
        }
    }

    pub(crate) fn from_native(ftype: ffi::LIBMTP_filetype_t) -> Self {
        FromPrimitive::from_u32(ftype).unwrap_or(Filetype::Unknown)
    }

    pub(crate) fn to_native(self) -> ffi::LIBMTP_filetype_t {
        self.to_u32().expect("Unexpected Filetype variant")
    }
}

impl Display for Filetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ftype = self.to_u32().unwrap();

        unsafe {
            let desc = ffi::LIBMTP_Get_Filetype_Description(ftype);
            let cstr = CStr::from_ptr(desc);

            write!(f, "{}", cstr.to_str().unwrap())
        }
    }
}
