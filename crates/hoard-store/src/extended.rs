//! Chunked in-memory store for requests the array tier cannot satisfy.
//!
//! An [`ExtendedStore`] splits the logical array across a list of chunks,
//! each at most `extended_chunk_units` long, so no single buffer has to hit
//! the contiguous-array ceiling. Elements never straddle a chunk boundary:
//! a chunk holds a whole number of elements, and an element wider than the
//! configured chunk size gets a chunk of its own.

use std::marker::PhantomData;
use std::mem;

use hoard_core::{check_index, Element, IndexedStore, StorageError, StorageKind};
use tracing::debug;

use crate::array::{alloc_units, check_footprint};
use crate::config::{platform_ceiling, StorageConfig};

/// Elements spread over a list of fixed-capacity chunks.
pub struct ExtendedStore<T: Element> {
    chunks: Vec<Vec<T::Unit>>,
    /// Elements per full chunk; the last chunk may hold fewer.
    elements_per_chunk: u64,
    size: u64,
    unit_count: usize,
    _element: PhantomData<fn() -> T>,
}

impl<T: Element> ExtendedStore<T> {
    /// Allocate `n` zero-valued slots shaped like `prototype`.
    ///
    /// Fails with [`StorageError::Oversized`] if the request needs more than
    /// `max_extended_chunks` chunks, and with [`StorageError::OutOfMemory`]
    /// if any chunk allocation fails. Chunks already allocated are released.
    pub fn allocate(prototype: &T, n: u64, config: &StorageConfig) -> Result<Self, StorageError> {
        let unit_count = prototype.unit_count();
        let elements_per_chunk = match unit_count as u64 {
            0 => n.max(1),
            uc => (config.extended_chunk_units / uc).max(1),
        };
        let chunk_units = elements_per_chunk as u128 * unit_count as u128;
        let chunk_count = n.div_ceil(elements_per_chunk);
        let requested_units = n as u128 * unit_count as u128;

        if chunk_count > config.max_extended_chunks as u64
            || chunk_units > platform_ceiling::<T::Unit>() as u128
        {
            let ceiling = (config.max_extended_chunks as u128 * chunk_units).min(u64::MAX as u128);
            return Err(StorageError::Oversized {
                requested_units,
                ceiling: ceiling as u64,
            });
        }

        let mut chunks = Vec::new();
        chunks
            .try_reserve_exact(chunk_count as usize)
            .map_err(|_| StorageError::OutOfMemory {
                requested_bytes: chunk_count as u128 * mem::size_of::<Vec<T::Unit>>() as u128,
            })?;
        let mut remaining = n;
        while remaining > 0 {
            let elements = remaining.min(elements_per_chunk);
            chunks.push(alloc_units(elements as usize * unit_count)?);
            remaining -= elements;
        }

        debug!(
            elements = n,
            unit_count,
            chunks = chunks.len(),
            elements_per_chunk,
            "extended store allocated"
        );
        Ok(Self {
            chunks,
            elements_per_chunk,
            size: n,
            unit_count,
            _element: PhantomData,
        })
    }

    /// Units per element.
    pub fn unit_count(&self) -> usize {
        self.unit_count
    }

    /// Number of chunks backing the store.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Elements held by each full chunk.
    pub fn elements_per_chunk(&self) -> u64 {
        self.elements_per_chunk
    }

    /// Memory used by all chunks in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.chunks
            .iter()
            .map(|c| c.len() * mem::size_of::<T::Unit>())
            .sum()
    }

    /// Chunk number and unit offset within that chunk for `index`.
    fn locate(&self, index: u64) -> (usize, usize) {
        let chunk = index / self.elements_per_chunk;
        let within = index % self.elements_per_chunk;
        (chunk as usize, within as usize * self.unit_count)
    }
}

impl<T: Element> Clone for ExtendedStore<T> {
    fn clone(&self) -> Self {
        Self {
            chunks: self.chunks.clone(),
            elements_per_chunk: self.elements_per_chunk,
            size: self.size,
            unit_count: self.unit_count,
            _element: PhantomData,
        }
    }
}

impl<T: Element> IndexedStore<T> for ExtendedStore<T> {
    fn size(&self) -> u64 {
        self.size
    }

    fn storage_kind(&self) -> StorageKind {
        StorageKind::Extended
    }

    fn access_with_one_thread(&self) -> bool {
        false
    }

    fn get(&mut self, index: u64, out: &mut T) -> Result<(), StorageError> {
        check_index(index, self.size)?;
        let (chunk, offset) = self.locate(index);
        out.from_units(&self.chunks[chunk], offset);
        Ok(())
    }

    fn set(&mut self, index: u64, value: &T) -> Result<(), StorageError> {
        check_index(index, self.size)?;
        check_footprint(index, value, self.unit_count)?;
        let (chunk, offset) = self.locate(index);
        value.to_units(&mut self.chunks[chunk], offset);
        Ok(())
    }

    fn duplicate(&self) -> Result<Box<dyn IndexedStore<T>>, StorageError> {
        Ok(Box::new(self.clone()))
    }
}
