//! Module with abstractions over the storage related functionality of a
//! device, from storage descriptors to the objects they contain.

pub mod albums;
pub mod files;
pub mod folders;
pub mod playlists;
pub mod tracks;

use std::collections::HashSet;

use derivative::Derivative;
use mtp_sys as ffi;

use crate::util::opt_string;

/// Parent an object hangs from, the top of the hierarchy is the storage root.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Derivative)]
#[derivative(Default)]
pub enum Parent {
    #[derivative(Default)]
    Root,
    Folder(u32),
}

impl Parent {
    pub(crate) fn to_id(self) -> u32 {
        match self {
            Parent::Root => 0,
            Parent::Folder(id) => id,
        }
    }
}

/// Storage descriptor of some MTP device, a snapshot taken on the latest
/// [`update_storage`](crate::device::MediaTransfer::update_storage) call,
/// note that at any time anything can happen with the device and one of
/// these descriptors *may become outdated*.
#[derive(Debug, Clone)]
pub struct Storage {
    id: u32,
    storage_type: u16,
    filesystem_type: u16,
    access_capability: u16,
    maximum_capacity: u64,
    free_space_in_bytes: u64,
    free_space_in_objects: u64,
    description: Option<String>,
    volume_identifier: Option<String>,
}

impl Storage {
    pub(crate) unsafe fn from_native(native: *const ffi::LIBMTP_devicestorage_t) -> Self {
        Storage {
            id: (*native).id,
            storage_type: (*native).StorageType,
            filesystem_type: (*native).FilesystemType,
            access_capability: (*native).AccessCapability,
            maximum_capacity: (*native).MaxCapacity,
            free_space_in_bytes: (*native).FreeSpaceInBytes,
            free_space_in_objects: (*native).FreeSpaceInObjects,
            description: opt_string((*native).StorageDescription),
            volume_identifier: opt_string((*native).VolumeIdentifier),
        }
    }

    /// Returns the id of this storage.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the raw PTP storage type.
    pub fn storage_type(&self) -> u16 {
        self.storage_type
    }

    /// Returns the raw PTP filesystem type.
    pub fn filesystem_type(&self) -> u16 {
        self.filesystem_type
    }

    /// Returns the raw PTP access capability.
    pub fn access_capability(&self) -> u16 {
        self.access_capability
    }

    /// Returns the total capacity of this storage in bytes.
    pub fn maximum_capacity(&self) -> u64 {
        self.maximum_capacity
    }

    /// Returns the free space of this storage in bytes.
    pub fn free_space_in_bytes(&self) -> u64 {
        self.free_space_in_bytes
    }

    /// Returns the free space of this storage in objects.
    pub fn free_space_in_objects(&self) -> u64 {
        self.free_space_in_objects
    }

    /// Returns the description of this storage, if the device reported one.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the volume identifier of this storage, if the device
    /// reported one.
    pub fn volume_identifier(&self) -> Option<&str> {
        self.volume_identifier.as_deref()
    }

    /// Returns the occupied space of this storage in bytes, derived from
    /// the capacity and the free space.
    pub fn used_space(&self) -> u64 {
        self.maximum_capacity.saturating_sub(self.free_space_in_bytes)
    }

    /// Returns the occupied space as a percentage of the capacity, storages
    /// reporting a zero capacity yield `0.0`.
    pub fn used_percent(&self) -> f64 {
        if self.maximum_capacity == 0 {
            0.0
        } else {
            self.used_space() as f64 * 100.0 / self.maximum_capacity as f64
        }
    }
}

/// Copies the storage chain owned by the device into owned descriptors,
/// without freeing it. Addresses are walked at most once.
pub(crate) unsafe fn collect_storages(head: *const ffi::LIBMTP_devicestorage_t) -> Vec<Storage> {
    let mut storages = Vec::new();
    let mut visited = HashSet::new();

    let mut current = head;
    while !current.is_null() && visited.insert(current as usize) {
        storages.push(Storage::from_native(current));
        current = (*current).next;
    }

    storages
}
