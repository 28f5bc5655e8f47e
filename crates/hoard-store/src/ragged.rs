//! Ragged stores: variable-length byte records behind an offset index.
//!
//! A [`RaggedStore`] holds `size` records of differing byte lengths. Record
//! bytes live back to back in a flat byte pool; a second container holds one
//! cumulative end offset per slot, so slot `i` occupies
//! `offset[i - 1]..offset[i]` of the pool (with `offset[-1] = 0`).
//!
//! Both containers are allocated through the [`Storage`] dispatcher and so
//! fall back to extended or virtual tiers like any other container.
//!
//! # Building and rewriting
//!
//! [`RaggedStore::place`] is the only operation that grows the offset index.
//! It assumes every slot before `index` has already been placed and derives
//! the record's start from `offset[index - 1]`. That precondition is **not
//! checked**: placing out of left-to-right order silently produces
//! overlapping records and wrong offsets.
//!
//! [`IndexedStore::set`] rewrites a record in place and may not change its
//! length, because the offset index is not rebuilt; a value with a different
//! byte count fails with [`StorageError::SizeMismatch`].
//!
//! # Threading
//!
//! The store marshals through an internal scratch buffer, so
//! [`IndexedStore::access_with_one_thread`] is always `true`. Give each
//! worker its own [`RaggedStore::try_clone`].

use std::marker::PhantomData;

use hoard_core::{
    check_index, ByteMember, Container, IndexedStore, RaggedElement, StorageError, StorageKind,
    U64Member,
};
use smallvec::SmallVec;
use tracing::trace;

use crate::storage::Storage;

/// Variable-length records in a byte pool addressed by cumulative offsets.
pub struct RaggedStore<T: RaggedElement> {
    /// `offsets[i]` is the pool position one past the end of record `i`.
    offsets: Container<U64Member>,
    pool: Container<ByteMember>,
    /// Reused for every record; grows to the largest record seen.
    scratch: SmallVec<[u8; 64]>,
    /// Furthest pool position any placed record reaches.
    high_water: u64,
    size: u64,
    _element: PhantomData<fn() -> T>,
}

fn to_len(n: u64, what: &str) -> Result<i64, StorageError> {
    i64::try_from(n).map_err(|_| StorageError::invalid(format!("{what} {n} exceeds i64::MAX")))
}

impl<T: RaggedElement> RaggedStore<T> {
    /// General byte-ragged store: `n` slots over a pool of exactly
    /// `total_bytes` bytes.
    pub fn bytes(
        storage: &Storage,
        _prototype: &T,
        n: u64,
        total_bytes: u64,
    ) -> Result<Self, StorageError> {
        Self::with_pool(storage, n, total_bytes)
    }

    /// Store for count-prefixed numeric records such as
    /// [`FloatRun`](hoard_core::FloatRun): `n` slots holding
    /// `total_elements` 4-byte values overall, each record carrying a 4-byte
    /// count prefix. The pool is sized `4·n + 4·total_elements` bytes.
    pub fn prefixed(
        storage: &Storage,
        _prototype: &T,
        n: u64,
        total_elements: u64,
    ) -> Result<Self, StorageError> {
        let pool_bytes = n
            .checked_add(total_elements)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| {
                StorageError::invalid(format!(
                    "pool for {n} records of {total_elements} elements overflows u64"
                ))
            })?;
        Self::with_pool(storage, n, pool_bytes)
    }

    fn with_pool(storage: &Storage, n: u64, pool_bytes: u64) -> Result<Self, StorageError> {
        let offsets = storage.allocate(&U64Member::default(), to_len(n, "record count")?)?;
        let pool = storage.allocate(&ByteMember::default(), to_len(pool_bytes, "pool size")?)?;
        Ok(Self {
            offsets,
            pool,
            scratch: SmallVec::new(),
            high_water: 0,
            size: n,
            _element: PhantomData,
        })
    }

    /// Append-style write of `value` into slot `index`.
    ///
    /// The record starts where slot `index - 1` ends and `offset[index]` is
    /// set to its end. Callers must place slots in strictly increasing order
    /// starting at 0; this is not verified.
    ///
    /// A record that would run past the end of the pool fails with
    /// [`StorageError::IndexOutOfBounds`] before any byte is written.
    pub fn place(&mut self, index: u64, value: &T) -> Result<(), StorageError> {
        check_index(index, self.size)?;
        let start = self.start_of(index)?;
        let end = start + value.byte_count() as u64;
        let pool_size = self.pool.size();
        if end > pool_size {
            return Err(StorageError::IndexOutOfBounds {
                index: i64::try_from(end - 1).unwrap_or(i64::MAX),
                size: pool_size,
            });
        }
        self.write_record(start, value)?;
        self.offsets.set(index, &U64Member(end))?;
        self.high_water = self.high_water.max(end);
        trace!(index, start, end, "ragged record placed");
        Ok(())
    }

    /// Byte capacity of the pool.
    pub fn pool_bytes(&self) -> u64 {
        self.pool.size()
    }

    /// Furthest pool position reached by any placed record.
    pub fn used_bytes(&self) -> u64 {
        self.high_water
    }

    /// Current byte footprint recorded for slot `index`.
    pub fn record_len(&mut self, index: u64) -> Result<u64, StorageError> {
        check_index(index, self.size)?;
        let (_, len) = self.span(index)?;
        Ok(len)
    }

    /// Storage kinds of the offset index and the pool, in that order.
    pub fn backing_kinds(&self) -> (StorageKind, StorageKind) {
        (self.offsets.storage_kind(), self.pool.storage_kind())
    }

    /// Independent deep copy that keeps the concrete type, for per-worker use.
    pub fn try_clone(&self) -> Result<Self, StorageError> {
        Ok(Self {
            offsets: self.offsets.duplicate()?,
            pool: self.pool.duplicate()?,
            scratch: SmallVec::new(),
            high_water: self.high_water,
            size: self.size,
            _element: PhantomData,
        })
    }

    fn start_of(&mut self, index: u64) -> Result<u64, StorageError> {
        if index == 0 {
            return Ok(0);
        }
        let mut prev = U64Member::default();
        self.offsets.get(index - 1, &mut prev)?;
        Ok(prev.0)
    }

    /// Start and length of slot `index`. Slots that were never placed (end
    /// below start) read as zero-length.
    fn span(&mut self, index: u64) -> Result<(u64, u64), StorageError> {
        let start = self.start_of(index)?;
        let mut end = U64Member::default();
        self.offsets.get(index, &mut end)?;
        Ok((start, end.0.saturating_sub(start)))
    }

    fn write_record(&mut self, start: u64, value: &T) -> Result<(), StorageError> {
        let len = value.byte_count();
        self.scratch.clear();
        self.scratch.resize(len, 0);
        value.to_record(&mut self.scratch);
        for (k, &b) in self.scratch.iter().enumerate() {
            self.pool.set(start + k as u64, &ByteMember(b))?;
        }
        Ok(())
    }
}

impl<T: RaggedElement> IndexedStore<T> for RaggedStore<T> {
    fn size(&self) -> u64 {
        self.size
    }

    fn storage_kind(&self) -> StorageKind {
        StorageKind::Ragged
    }

    fn access_with_one_thread(&self) -> bool {
        true
    }

    fn get(&mut self, index: u64, out: &mut T) -> Result<(), StorageError> {
        check_index(index, self.size)?;
        let (start, len) = self.span(index)?;
        self.scratch.clear();
        let mut cell = ByteMember::default();
        for k in 0..len {
            self.pool.get(start + k, &mut cell)?;
            self.scratch.push(cell.0);
        }
        out.from_record(&self.scratch);
        Ok(())
    }

    fn set(&mut self, index: u64, value: &T) -> Result<(), StorageError> {
        check_index(index, self.size)?;
        let (start, len) = self.span(index)?;
        let actual = value.byte_count() as u64;
        if actual != len {
            return Err(StorageError::SizeMismatch {
                index,
                expected: len,
                actual,
            });
        }
        self.write_record(start, value)
    }

    fn duplicate(&self) -> Result<Box<dyn IndexedStore<T>>, StorageError> {
        Ok(Box::new(self.try_clone()?))
    }
}
