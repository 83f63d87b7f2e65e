//! Contains relevant items to handle folder objects stored in the device,
//! folders form a tree below each storage root.

use std::borrow::Cow;
use std::collections::HashSet;
use std::ffi::{CStr, CString};

use mtp_sys as ffi;

use crate::device::MediaTransfer;
use crate::object::AsObjectId;
use crate::storage::Parent;
use crate::util::string_or_empty;
use crate::Result;

/// Owned snapshot of a folder object, gathered by flattening the folder
/// tree of the device in depth-first order. The depth tells how many
/// parents are above this folder, zero for top-level folders.
#[derive(Debug, Clone)]
pub struct Folder {
    id: u32,
    parent_id: u32,
    storage_id: u32,
    name: String,
    depth: u32,
}

impl AsObjectId for Folder {
    fn as_id(&self) -> u32 {
        self.id
    }
}

impl Folder {
    pub(crate) unsafe fn from_native(native: *const ffi::LIBMTP_folder_t, depth: u32) -> Self {
        Folder {
            id: (*native).folder_id,
            parent_id: (*native).parent_id,
            storage_id: (*native).storage_id,
            name: string_or_empty((*native).name),
            depth,
        }
    }

    /// Returns the id of this folder.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the id of its parent folder, zero for top-level folders.
    pub fn parent_id(&self) -> u32 {
        self.parent_id
    }

    /// Returns the id of the storage it belongs to.
    pub fn storage_id(&self) -> u32 {
        self.storage_id
    }

    /// Returns the name of this folder.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the depth of this folder in the tree it was gathered from.
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

/// Flattens a native folder tree in depth-first order, siblings after the
/// children of their predecessor. Returns `false` when an already visited
/// node shows up again, every node is still recorded exactly once.
unsafe fn flatten_tree(
    head: *mut ffi::LIBMTP_folder_t,
    depth: u32,
    folders: &mut Vec<Folder>,
    visited: &mut HashSet<usize>,
) -> bool {
    let mut current = head;
    while !current.is_null() {
        if !visited.insert(current as usize) {
            return false;
        }

        folders.push(Folder::from_native(current, depth));

        if !flatten_tree((*current).child, depth + 1, folders, visited) {
            return false;
        }

        current = (*current).sibling;
    }

    true
}

pub(crate) unsafe fn collect_folder_tree(
    mtpdev: &MediaTransfer,
    head: *mut ffi::LIBMTP_folder_t,
) -> Result<Vec<Folder>> {
    if head.is_null() {
        return match mtpdev.latest_error() {
            Some(err) => Err(err),
            None => Ok(Vec::new()),
        };
    }

    let mut folders = Vec::new();
    let mut visited = HashSet::new();

    // A corrupted cyclic tree is leaked on purpose, the native destroyer
    // recurses over siblings and children and would never terminate.
    let clean = flatten_tree(head, 0, &mut folders, &mut visited);
    if clean {
        ffi::LIBMTP_destroy_folder_t(head);
    }

    Ok(folders)
}

pub(crate) fn folder_listing(mtpdev: &MediaTransfer) -> Result<Vec<Folder>> {
    let head = unsafe { ffi::LIBMTP_Get_Folder_List(mtpdev.inner) };
    unsafe { collect_folder_tree(mtpdev, head) }
}

pub(crate) fn parent_folder_listing(mtpdev: &MediaTransfer) -> Result<Vec<Folder>> {
    let folders = folder_listing(mtpdev)?;
    Ok(folders
        .into_iter()
        .filter(|folder| folder.depth() == 0)
        .collect())
}

pub(crate) fn create_folder<'a>(
    mtpdev: &MediaTransfer,
    name: &'a str,
    parent: Parent,
    storage_id: u32,
) -> Result<(u32, Cow<'a, str>)> {
    let name_cstr = CString::new(name)?;

    let name_in_c = unsafe { libc::strdup(name_cstr.as_ptr()) };
    let folder_id =
        unsafe { ffi::LIBMTP_Create_Folder(mtpdev.inner, name_in_c, parent.to_id(), storage_id) };

    // The device may adjust the name we asked for, libmtp then swaps the
    // string behind `name_in_c`.
    let name_from_c = unsafe { CStr::from_ptr(name_in_c).to_string_lossy() };

    let name = if name_from_c == name {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(name_from_c.into_owned())
    };

    unsafe {
        // Starting from here `name_from_c` is INVALID! Note that `name` is
        // perfectly valid since it borrows the original `name` or owns a
        // copy taken before this free.
        libc::free(name_in_c as *mut _);
    }

    if folder_id == 0 {
        Err(mtpdev.latest_error().unwrap_or_default())
    } else {
        Ok((folder_id, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    fn native_folder(id: u32, name: &str) -> *mut ffi::LIBMTP_folder_t {
        let name = CString::new(name).unwrap();
        Box::into_raw(Box::new(ffi::LIBMTP_folder_t {
            folder_id: id,
            parent_id: 0,
            storage_id: 65537,
            name: name.into_raw(),
            sibling: ptr::null_mut(),
            child: ptr::null_mut(),
        }))
    }

    unsafe fn free_folder(node: *mut ffi::LIBMTP_folder_t) {
        let node = Box::from_raw(node);
        drop(CString::from_raw(node.name));
    }

    #[test]
    fn trees_flatten_depth_first() {
        let music = native_folder(1, "Music");
        let rock = native_folder(2, "Rock");
        let jazz = native_folder(3, "Jazz");
        let live = native_folder(4, "Live");
        let pictures = native_folder(5, "Pictures");

        unsafe {
            (*music).child = rock;
            (*rock).sibling = jazz;
            (*rock).child = live;
            (*music).sibling = pictures;
        }

        let mut folders = Vec::new();
        let mut visited = HashSet::new();
        let clean = unsafe { flatten_tree(music, 0, &mut folders, &mut visited) };

        assert!(clean);

        let flat: Vec<_> = folders
            .iter()
            .map(|f| (f.id(), f.name().to_string(), f.depth()))
            .collect();

        assert_eq!(
            flat,
            vec![
                (1, "Music".to_string(), 0),
                (2, "Rock".to_string(), 1),
                (4, "Live".to_string(), 2),
                (3, "Jazz".to_string(), 1),
                (5, "Pictures".to_string(), 0),
            ]
        );

        unsafe {
            free_folder(music);
            free_folder(rock);
            free_folder(jazz);
            free_folder(live);
            free_folder(pictures);
        }
    }

    #[test]
    fn sibling_cycles_end_the_walk() {
        let first = native_folder(1, "a");
        let second = native_folder(2, "b");

        unsafe {
            (*first).sibling = second;
            (*second).sibling = first;
        }

        let mut folders = Vec::new();
        let mut visited = HashSet::new();
        let clean = unsafe { flatten_tree(first, 0, &mut folders, &mut visited) };

        assert!(!clean);
        assert_eq!(folders.len(), 2);

        unsafe {
            free_folder(first);
            free_folder(second);
        }
    }

    #[test]
    fn child_cycles_end_the_walk() {
        let parent = native_folder(1, "parent");
        let child = native_folder(2, "child");

        unsafe {
            (*parent).child = child;
            (*child).child = parent;
        }

        let mut folders = Vec::new();
        let mut visited = HashSet::new();
        let clean = unsafe { flatten_tree(parent, 0, &mut folders, &mut visited) };

        assert!(!clean);
        assert_eq!(folders.len(), 2);
        assert_eq!(folders[1].depth(), 1);

        unsafe {
            free_folder(parent);
            free_folder(child);
        }
    }
}
