//! Sparse store for default-dominated data.
//!
//! A [`SparseStore`] keeps one default value plus a map holding only the
//! slots whose value differs from it. Writing the default back into a slot
//! removes its entry, so [`SparseStore::stored_count`] is always exactly the
//! number of non-default slots.
//!
//! Sparsity is a semantic choice rather than a capacity workaround, so the
//! dispatcher only builds sparse stores on an explicit
//! [`StorageStrategy::Sparse`](hoard_core::StorageStrategy::Sparse) request.

use hoard_core::{check_index, Element, IndexedStore, StorageError, StorageKind};
use indexmap::IndexMap;

use crate::array::check_footprint;

/// Default value plus a map of deviating slots.
pub struct SparseStore<T: Element> {
    default: T,
    /// Slot → value for every slot whose value differs from `default`.
    entries: IndexMap<u64, T>,
    size: u64,
    unit_count: usize,
}

impl<T: Element> SparseStore<T> {
    /// Create `n` slots all holding `prototype.construct()`.
    pub fn new(prototype: &T, n: u64) -> Self {
        Self {
            default: prototype.construct(),
            entries: IndexMap::new(),
            size: n,
            unit_count: prototype.unit_count(),
        }
    }

    /// The value unmapped slots read as.
    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Number of slots currently holding a non-default value.
    pub fn stored_count(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over non-default slots in first-write order.
    pub fn entries(&self) -> impl Iterator<Item = (u64, &T)> {
        self.entries.iter().map(|(&index, value)| (index, value))
    }
}

impl<T: Element> IndexedStore<T> for SparseStore<T> {
    fn size(&self) -> u64 {
        self.size
    }

    fn storage_kind(&self) -> StorageKind {
        StorageKind::Sparse
    }

    fn access_with_one_thread(&self) -> bool {
        false
    }

    fn get(&mut self, index: u64, out: &mut T) -> Result<(), StorageError> {
        check_index(index, self.size)?;
        let value = self.entries.get(&index).unwrap_or(&self.default);
        *out = T::construct_from(value);
        Ok(())
    }

    fn set(&mut self, index: u64, value: &T) -> Result<(), StorageError> {
        check_index(index, self.size)?;
        check_footprint(index, value, self.unit_count)?;
        if *value == self.default {
            self.entries.swap_remove(&index);
        } else if let Some(slot) = self.entries.get_mut(&index) {
            *slot = T::construct_from(value);
        } else {
            self.entries.insert(index, T::construct_from(value));
        }
        Ok(())
    }

    fn duplicate(&self) -> Result<Box<dyn IndexedStore<T>>, StorageError> {
        Ok(Box::new(Self {
            default: T::construct_from(&self.default),
            entries: self
                .entries
                .iter()
                .map(|(&index, value)| (index, T::construct_from(value)))
                .collect(),
            size: self.size,
            unit_count: self.unit_count,
        }))
    }
}
