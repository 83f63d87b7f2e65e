/// File type catalog and filename-based inference.
pub mod filetypes;

/// Types that carry the id of an object stored on an MTP device, used on
/// operations that accept either a plain id or a full record.
pub trait AsObjectId {
    fn as_id(&self) -> u32;
}

impl AsObjectId for u32 {
    fn as_id(&self) -> u32 {
        *self
    }
}

impl<T> AsObjectId for &'_ T
where
    T: AsObjectId,
{
    fn as_id(&self) -> u32 {
        (**self).as_id()
    }
}
