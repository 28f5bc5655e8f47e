//! Positioned read/write handle over one container.
//!
//! A [`Cursor`] walks a store forward or backward, reading each slot into a
//! single scratch value it owns. Position ranges over `-1..=size`, with `-1`
//! meaning "before first" and `size` meaning "after last"; neither is a valid
//! slot.
//!
//! Moves are unchecked. Guard them with [`Cursor::has_next`] or
//! [`Cursor::has_prev`]; a cursor moved past its bounds fails on the next
//! [`Cursor::get`] or [`Cursor::put`] with
//! [`StorageError::IndexOutOfBounds`].

use hoard_core::{Allocatable, IndexedStore, StorageError};

/// Sequential accessor borrowing a store and owning one scratch element.
pub struct Cursor<'a, T, S: IndexedStore<T> + ?Sized> {
    scratch: T,
    source: &'a mut S,
    position: i64,
}

impl<'a, T: Allocatable, S: IndexedStore<T> + ?Sized> Cursor<'a, T, S> {
    /// Create a cursor positioned before the first slot.
    pub fn new(prototype: &T, source: &'a mut S) -> Self {
        Self {
            scratch: prototype.construct(),
            source,
            position: -1,
        }
    }
}

impl<'a, T, S: IndexedStore<T> + ?Sized> Cursor<'a, T, S> {
    fn size(&self) -> i64 {
        i64::try_from(self.source.size()).unwrap_or(i64::MAX)
    }

    fn in_range(&self, position: Option<i64>) -> bool {
        matches!(position, Some(p) if p >= 0 && p < self.size())
    }

    /// Current position, `-1` through `size`.
    pub fn position(&self) -> i64 {
        self.position
    }

    /// Rewind to before the first slot.
    pub fn before_first(&mut self) {
        self.position = -1;
    }

    /// Move past the last slot.
    pub fn after_last(&mut self) {
        self.position = self.size();
    }

    /// Whether one step forward lands on a valid slot.
    pub fn has_next(&self) -> bool {
        self.has_next_by(1)
    }

    /// Whether `k` steps forward land on a valid slot.
    pub fn has_next_by(&self, k: i64) -> bool {
        self.in_range(self.position.checked_add(k))
    }

    /// Whether one step back lands on a valid slot.
    pub fn has_prev(&self) -> bool {
        self.has_prev_by(1)
    }

    /// Whether `k` steps back land on a valid slot.
    pub fn has_prev_by(&self, k: i64) -> bool {
        self.in_range(self.position.checked_sub(k))
    }

    /// Step forward one slot. Unchecked.
    pub fn fwd(&mut self) {
        self.fwd_by(1);
    }

    /// Step forward `k` slots. Unchecked.
    pub fn fwd_by(&mut self, k: i64) {
        self.position = self.position.saturating_add(k);
    }

    /// Step back one slot. Unchecked.
    pub fn back(&mut self) {
        self.back_by(1);
    }

    /// Step back `k` slots. Unchecked.
    pub fn back_by(&mut self, k: i64) {
        self.position = self.position.saturating_sub(k);
    }

    fn index(&self) -> Result<u64, StorageError> {
        u64::try_from(self.position).map_err(|_| StorageError::IndexOutOfBounds {
            index: self.position,
            size: self.source.size(),
        })
    }

    /// Read the current slot into the scratch value and borrow it.
    pub fn get(&mut self) -> Result<&T, StorageError> {
        let index = self.index()?;
        self.source.get(index, &mut self.scratch)?;
        Ok(&self.scratch)
    }

    /// Write the scratch value to the current slot.
    pub fn put(&mut self) -> Result<(), StorageError> {
        let index = self.index()?;
        self.source.set(index, &self.scratch)
    }

    /// Read the current slot into a caller-owned value.
    pub fn get_into(&mut self, out: &mut T) -> Result<(), StorageError> {
        let index = self.index()?;
        self.source.get(index, out)
    }

    /// Write a caller-owned value to the current slot.
    pub fn put_from(&mut self, value: &T) -> Result<(), StorageError> {
        let index = self.index()?;
        self.source.set(index, value)
    }

    /// The scratch value as last read or edited.
    pub fn scratch(&self) -> &T {
        &self.scratch
    }

    /// Mutable access to the scratch value, for editing before [`Cursor::put`].
    pub fn scratch_mut(&mut self) -> &mut T {
        &mut self.scratch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Storage;
    use hoard_test_utils::Rgba;

    fn filled(n: i64) -> hoard_core::Container<Rgba> {
        let storage = Storage::default();
        let mut c = storage.allocate(&Rgba::default(), n).unwrap();
        for i in 0..n as u64 {
            c.set(i, &Rgba::new(i as u8, 0, 0, 255)).unwrap();
        }
        c
    }

    #[test]
    fn fresh_cursor_is_before_first() {
        let mut c = filled(3);
        let cursor = Cursor::new(&Rgba::default(), c.as_mut());
        assert_eq!(cursor.position(), -1);
        assert!(!cursor.has_prev());
        assert!(cursor.has_next());
    }

    #[test]
    fn forward_walk_visits_every_slot() {
        let mut c = filled(4);
        let mut cursor = Cursor::new(&Rgba::default(), c.as_mut());
        let mut seen = Vec::new();
        while cursor.has_next() {
            cursor.fwd();
            seen.push(cursor.get().unwrap().r);
        }
        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert!(!cursor.has_next());
        assert_eq!(cursor.position(), 3);
        cursor.fwd();
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn backward_walk_from_after_last() {
        let mut c = filled(3);
        let mut cursor = Cursor::new(&Rgba::default(), c.as_mut());
        cursor.after_last();
        assert_eq!(cursor.position(), 3);
        let mut seen = Vec::new();
        while cursor.has_prev() {
            cursor.back();
            seen.push(cursor.get().unwrap().r);
        }
        assert_eq!(seen, vec![2, 1, 0]);
    }

    #[test]
    fn stepped_predicates() {
        let mut c = filled(5);
        let mut cursor = Cursor::new(&Rgba::default(), c.as_mut());
        assert!(cursor.has_next_by(5));
        assert!(!cursor.has_next_by(6));
        cursor.fwd_by(4);
        assert_eq!(cursor.position(), 3);
        assert!(cursor.has_prev_by(3));
        assert!(!cursor.has_prev_by(4));
        assert!(cursor.has_next_by(1));
        assert!(!cursor.has_next_by(2));
        assert!(!cursor.has_next_by(i64::MAX));
    }

    #[test]
    fn put_writes_the_scratch_value() {
        let mut c = filled(2);
        {
            let mut cursor = Cursor::new(&Rgba::default(), c.as_mut());
            cursor.fwd();
            cursor.get().unwrap();
            cursor.scratch_mut().g = 99;
            cursor.put().unwrap();
            cursor.fwd();
            cursor.put_from(&Rgba::new(7, 7, 7, 7)).unwrap();
        }
        let mut out = Rgba::default();
        c.get(0, &mut out).unwrap();
        assert_eq!(out, Rgba::new(0, 99, 0, 255));
        c.get(1, &mut out).unwrap();
        assert_eq!(out, Rgba::new(7, 7, 7, 7));
    }

    #[test]
    fn unchecked_moves_surface_as_index_errors() {
        let mut c = filled(2);
        let mut cursor = Cursor::new(&Rgba::default(), c.as_mut());
        assert!(matches!(
            cursor.get(),
            Err(StorageError::IndexOutOfBounds { index: -1, size: 2 })
        ));
        cursor.after_last();
        let mut out = Rgba::default();
        assert!(matches!(
            cursor.get_into(&mut out),
            Err(StorageError::IndexOutOfBounds { index: 2, size: 2 })
        ));
        cursor.back_by(10);
        assert!(cursor.put().is_err());
    }

    #[test]
    fn empty_store_has_nothing_either_way() {
        let mut c = filled(0);
        let mut cursor = Cursor::new(&Rgba::default(), c.as_mut());
        assert!(!cursor.has_next());
        assert!(!cursor.has_prev());
        cursor.after_last();
        assert_eq!(cursor.position(), 0);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn forward_walk_reaches_size(n in 0i64..64) {
                let mut c = filled(n);
                let mut cursor = Cursor::new(&Rgba::default(), c.as_mut());
                prop_assert!(!cursor.has_prev());
                prop_assert_eq!(cursor.has_next(), n > 0);
                for _ in 0..n {
                    prop_assert!(cursor.has_next());
                    cursor.fwd();
                }
                prop_assert!(!cursor.has_next());
                cursor.fwd();
                prop_assert_eq!(cursor.position(), n);
            }

            #[test]
            fn predicates_match_resulting_position(
                n in 0i64..32,
                start in -1i64..33,
                k in 0i64..40,
            ) {
                let mut c = filled(n);
                let mut cursor = Cursor::new(&Rgba::default(), c.as_mut());
                let start = start.min(n);
                cursor.fwd_by(start + 1);
                prop_assert_eq!(cursor.position(), start);
                let ahead = start + k;
                let behind = start - k;
                prop_assert_eq!(cursor.has_next_by(k), (0..n).contains(&ahead));
                prop_assert_eq!(cursor.has_prev_by(k), (0..n).contains(&behind));
            }
        }
    }
}
