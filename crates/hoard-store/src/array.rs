//! Contiguous array-backed store.
//!
//! An [`ArrayStore`] holds every element in one `Vec<Unit>` of length
//! `size × unit_count`. It is the fastest tier and the first one the
//! dispatcher tries. It has a hard ceiling (see
//! [`StorageConfig::array_ceiling`]) and never retries on its own.

use std::marker::PhantomData;
use std::mem;

use hoard_core::{check_index, Element, IndexedStore, StorageError, StorageKind, Unit};

use crate::config::StorageConfig;

/// Allocate `len` default units, reporting allocator failure as
/// [`StorageError::OutOfMemory`] instead of aborting.
pub(crate) fn alloc_units<U: Unit>(len: usize) -> Result<Vec<U>, StorageError> {
    let mut units = Vec::new();
    units
        .try_reserve_exact(len)
        .map_err(|_| StorageError::OutOfMemory {
            requested_bytes: len as u128 * mem::size_of::<U>() as u128,
        })?;
    units.resize(len, U::default());
    Ok(units)
}

/// Reject values whose unit count differs from the container's.
pub(crate) fn check_footprint<T: Element>(
    index: u64,
    value: &T,
    unit_count: usize,
) -> Result<(), StorageError> {
    let actual = value.unit_count();
    if actual == unit_count {
        Ok(())
    } else {
        Err(StorageError::SizeMismatch {
            index,
            expected: unit_count as u64,
            actual: actual as u64,
        })
    }
}

/// Elements packed into a single contiguous unit buffer.
pub struct ArrayStore<T: Element> {
    units: Vec<T::Unit>,
    size: u64,
    unit_count: usize,
    _element: PhantomData<fn() -> T>,
}

impl<T: Element> ArrayStore<T> {
    /// Allocate `n` zero-valued slots shaped like `prototype`.
    ///
    /// Fails with [`StorageError::Oversized`] when `n × unit_count` exceeds
    /// the array ceiling and with [`StorageError::OutOfMemory`] when the
    /// allocator refuses the buffer.
    pub fn allocate(prototype: &T, n: u64, config: &StorageConfig) -> Result<Self, StorageError> {
        let unit_count = prototype.unit_count();
        let requested_units = n as u128 * unit_count as u128;
        let ceiling = config.array_ceiling::<T::Unit>();
        if requested_units > ceiling as u128 {
            return Err(StorageError::Oversized {
                requested_units,
                ceiling,
            });
        }
        let units = alloc_units(requested_units as usize)?;
        Ok(Self {
            units,
            size: n,
            unit_count,
            _element: PhantomData,
        })
    }

    /// Units per element.
    pub fn unit_count(&self) -> usize {
        self.unit_count
    }

    /// The raw unit buffer.
    pub fn as_units(&self) -> &[T::Unit] {
        &self.units
    }

    /// Memory used by the unit buffer in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.units.len() * mem::size_of::<T::Unit>()
    }
}

impl<T: Element> Clone for ArrayStore<T> {
    fn clone(&self) -> Self {
        Self {
            units: self.units.clone(),
            size: self.size,
            unit_count: self.unit_count,
            _element: PhantomData,
        }
    }
}

impl<T: Element> IndexedStore<T> for ArrayStore<T> {
    fn size(&self) -> u64 {
        self.size
    }

    fn storage_kind(&self) -> StorageKind {
        StorageKind::Array
    }

    fn access_with_one_thread(&self) -> bool {
        false
    }

    fn get(&mut self, index: u64, out: &mut T) -> Result<(), StorageError> {
        check_index(index, self.size)?;
        out.from_units(&self.units, index as usize * self.unit_count);
        Ok(())
    }

    fn set(&mut self, index: u64, value: &T) -> Result<(), StorageError> {
        check_index(index, self.size)?;
        check_footprint(index, value, self.unit_count)?;
        value.to_units(&mut self.units, index as usize * self.unit_count);
        Ok(())
    }

    fn duplicate(&self) -> Result<Box<dyn IndexedStore<T>>, StorageError> {
        Ok(Box::new(self.clone()))
    }
}
