//! Contains relevant items to handle file objects stored in the device,
//! note that folders also show up in file listings, typed as
//! [`Filetype::Folder`].

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
    datetime_to_epoch, epoch_to_datetime, path_to_cstring, progress_func_handler, string_or_empty,
    CallbackReturn,
};
use crate::Result;

use super::Parent;

/// Owned snapshot of a file object gathered from the device.
#[derive(Debug, Clone)]
pub struct File {
    id: u32,
    parent_id: u32,
    storage_id: u32,
    name: String,
    size: u64,
    modification_date: DateTime<Utc>,
    ftype: Filetype,
}

impl AsObjectId for File {
    fn as_id(&self) -> u32 {
        self.id
    }
}

impl File {
    pub(crate) unsafe fn from_native(native: *const ffi::LIBMTP_file_t) -> Self {
        File {
            id: (*native).item_id,
            parent_id: (*native).parent_id,
            storage_id: (*native).storage_id,
            name: string_or_empty((*native).filename),
            size: (*native).filesize,
            modification_date: epoch_to_datetime((*native).modificationdate),
            ftype: Filetype::from_native((*native).filetype),
        }
    }

    /// Returns the id of this file.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the id of its parent folder, zero for the root.
    pub fn parent_id(&self) -> u32 {
        self.parent_id
    }

    /// Returns the id of the storage holding this file.
    pub fn storage_id(&self) -> u32 {
        self.storage_id
    }

    /// Returns the file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the size of this file in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the modification date of this file in UTC.
    pub fn modification_date(&self) -> DateTime<Utc> {
        self.modification_date
    }

    /// Returns the file type.
    pub fn ftype(&self) -> Filetype {
        self.ftype
    }
}

/// Metadata handed to the device when sending a local file.
pub(crate) struct FileMetadata<'a> {
    pub file_size: u64,
    pub file_name: &'a str,
    pub file_type: Filetype,
    pub modification_date: DateTime<Utc>,
}

/// Derives the send metadata from a local file, the filetype is guessed
/// from the source name even when the target name differs.
fn local_file_metadata<'a>(path: &Path, target_name: &'a str) -> Result<FileMetadata<'a>> {
    let metadata = fs::metadata(path)?;

    Ok(FileMetadata {
        file_size: metadata.len(),
        file_name: target_name,
        file_type: Filetype::from_path(path),
        modification_date: metadata
            .modified()
            .map(DateTime::from)
            .unwrap_or_else(|_| Utc::now()),
    })
}

unsafe fn new_native_file(
    metadata: FileMetadata<'_>,
    parent: Parent,
    storage_id: u32,
) -> Result<*mut ffi::LIBMTP_file_t> {
    let name = CString::new(metadata.file_name)?;

    let file_t = ffi::LIBMTP_new_file_t();
    if file_t.is_null() {
        return Err(Error::Unknown);
    }

    (*file_t).filename = libc::strdup(name.as_ptr());
    (*file_t).filesize = metadata.file_size;
    (*file_t).filetype = metadata.file_type.to_native();
    (*file_t).modificationdate = datetime_to_epoch(metadata.modification_date);
    (*file_t).parent_id = parent.to_id();
    (*file_t).storage_id = storage_id;

    Ok(file_t)
}

/// Copies a freshly gathered file chain into owned records, destroying the
/// chain along the way. A null head is only an error if the device left
/// something on its error stack.
pub(crate) unsafe fn collect_files(
    mtpdev: &MediaTransfer,
    head: *mut ffi::LIBMTP_file_t,
) -> Result<Vec<File>> {
    if head.is_null() {
        return match mtpdev.latest_error() {
            Some(err) => Err(err),
            None => Ok(Vec::new()),
        };
    }

    let mut files = Vec::new();
    let mut visited = HashSet::new();

    let mut current = head;
    while !current.is_null() && visited.insert(current as usize) {
        files.push(File::from_native(current));

        let next = (*current).next;
        ffi::LIBMTP_destroy_file_t(current);
        current = next;
    }

    Ok(files)
}

pub(crate) fn file_listing<C>(mtpdev: &MediaTransfer, callback: Option<C>) -> Result<Vec<File>>
where
    C: FnMut(u64, u64) -> CallbackReturn,
{
    let head = if let Some(mut callback) = callback {
        let mut callback: &mut dyn FnMut(u64, u64) -> CallbackReturn = &mut callback;
        let callback = &mut callback;
        let callback = callback as *mut _ as *mut libc::c_void as *const _;

        unsafe {
            ffi::LIBMTP_Get_Filelisting_With_Callback(
                mtpdev.inner,
                Some(progress_func_handler),
                callback,
            )
        }
    } else {
        unsafe { ffi::LIBMTP_Get_Filelisting_With_Callback(mtpdev.inner, None, std::ptr::null()) }
    };

    unsafe { collect_files(mtpdev, head) }
}

pub(crate) fn file_metadata(mtpdev: &MediaTransfer, file: impl AsObjectId) -> Result<File> {
    let metadata = unsafe { ffi::LIBMTP_Get_Filemetadata(mtpdev.inner, file.as_id()) };

    if metadata.is_null() {
        Err(mtpdev.object_not_found())
    } else {
        let file = unsafe { File::from_native(metadata) };
        unsafe { ffi::LIBMTP_destroy_file_t(metadata) };
        Ok(file)
    }
}

pub(crate) fn get_file_to_path<C>(
    mtpdev: &MediaTransfer,
    file: impl AsObjectId,
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
            ffi::LIBMTP_Get_File_To_File(
                mtpdev.inner,
                file.as_id(),
                path.as_ptr(),
                Some(progress_func_handler),
                callback,
            )
        }
    } else {
        unsafe {
            ffi::LIBMTP_Get_File_To_File(
                mtpdev.inner,
                file.as_id(),
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

pub(crate) fn send_file_from_path<C>(
    mtpdev: &MediaTransfer,
    storage_id: u32,
    path: impl AsRef<Path>,
    target_name: &str,
    parent: Parent,
    callback: Option<C>,
) -> Result<u32>
where
    C: FnMut(u64, u64) -> CallbackReturn,
{
    let path = path.as_ref();
    let metadata = local_file_metadata(path, target_name)?;

    let path = path_to_cstring(path)?;
    let file_t = unsafe { new_native_file(metadata, parent, storage_id)? };

    let res = if let Some(mut callback) = callback {
        let mut callback: &mut dyn FnMut(u64, u64) -> CallbackReturn = &mut callback;
        let callback = &mut callback;
        let callback = callback as *mut _ as *mut libc::c_void as *const _;

        unsafe {
            ffi::LIBMTP_Send_File_From_File(
                mtpdev.inner,
                path.as_ptr(),
                file_t,
                Some(progress_func_handler),
                callback,
            )
        }
    } else {
        unsafe {
            ffi::LIBMTP_Send_File_From_File(
                mtpdev.inner,
                path.as_ptr(),
                file_t,
                None,
                std::ptr::null(),
            )
        }
    };

    // The device fills the assigned id into the record we sent.
    let item_id = unsafe { (*file_t).item_id };
    unsafe { ffi::LIBMTP_destroy_file_t(file_t) };

    if res != 0 {
        Err(mtpdev.latest_error().unwrap_or_default())
    } else {
        Ok(item_id)
    }
}
