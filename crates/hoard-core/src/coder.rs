//! Marshalling contracts between element types and flat buffers.
//!
//! [`Coder`] is the fixed-footprint contract used by array-like stores: an
//! element reports how many primitive units it occupies and copies itself
//! to or from a unit slice at an offset. [`RecordCoder`] is the
//! variable-footprint byte contract used by ragged stores.

use crate::unit::Unit;

/// Fixed-footprint marshalling into a primitive unit buffer.
///
/// Implementations must satisfy the round-trip law: after
/// `x.to_units(buf, off)`, calling `y.from_units(buf, off)` leaves `y == x`.
/// Coders are pure; they hold no state between calls.
pub trait Coder {
    /// The unit family this element marshals into.
    type Unit: Unit;

    /// Number of units one instance occupies.
    ///
    /// Constant for a given element shape. Stores read it once from the
    /// prototype and reject values whose count differs.
    fn unit_count(&self) -> usize;

    /// Write `self` into `buf[offset..offset + unit_count()]`.
    fn to_units(&self, buf: &mut [Self::Unit], offset: usize);

    /// Overwrite `self` from `buf[offset..offset + unit_count()]`.
    fn from_units(&mut self, buf: &[Self::Unit], offset: usize);
}

/// Variable-footprint marshalling into a byte record.
///
/// Ragged stores size each slot from the record length of the value first
/// placed there; later writes to the slot must keep the same length.
pub trait RecordCoder {
    /// Length in bytes of this value's record.
    fn byte_count(&self) -> usize;

    /// Write the record into `out`, which is exactly `byte_count()` bytes long.
    fn to_record(&self, out: &mut [u8]);

    /// Overwrite `self` from a record previously written by [`RecordCoder::to_record`].
    fn from_record(&mut self, record: &[u8]);
}
