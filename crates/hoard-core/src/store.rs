//! The indexed container abstraction every backing store implements.

use crate::error::StorageError;
use crate::kind::StorageKind;

/// `size` logically positioned slots of one element type.
///
/// `size` is fixed at creation. `get` and `set` are defined for
/// `0 <= index < size` and return [`StorageError::IndexOutOfBounds`]
/// otherwise.
///
/// Both accessors take `&mut self`: several backends keep marshalling scratch
/// inside the store, so a store instance is owned by one worker at a time.
/// Callers fanning work out across threads check
/// [`IndexedStore::access_with_one_thread`] and hand each worker its own
/// [`IndexedStore::duplicate`].
pub trait IndexedStore<T>: Send {
    /// Number of slots.
    fn size(&self) -> u64;

    /// Strategy that produced this store.
    fn storage_kind(&self) -> StorageKind;

    /// Whether the store holds shared scratch state and must not be used by
    /// more than one thread without duplicating it first.
    fn access_with_one_thread(&self) -> bool;

    /// Copy slot `index` into `out`.
    fn get(&mut self, index: u64, out: &mut T) -> Result<(), StorageError>;

    /// Overwrite slot `index` with `value`.
    fn set(&mut self, index: u64, value: &T) -> Result<(), StorageError>;

    /// Independent deep copy with identical contents and the same storage kind.
    fn duplicate(&self) -> Result<Box<dyn IndexedStore<T>>, StorageError>;
}

/// A boxed container as handed out by the allocation dispatcher.
pub type Container<T> = Box<dyn IndexedStore<T>>;

/// Validate `index` against `size`.
pub fn check_index(index: u64, size: u64) -> Result<(), StorageError> {
    if index < size {
        Ok(())
    } else {
        Err(StorageError::IndexOutOfBounds {
            index: i64::try_from(index).unwrap_or(i64::MAX),
            size,
        })
    }
}
