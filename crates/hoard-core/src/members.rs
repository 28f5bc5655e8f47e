//! Element types the storage layer itself stores.
//!
//! [`ByteMember`] and [`U64Member`] back the pool and offset index of ragged
//! stores. [`ByteRun`] and [`FloatRun`] are the two ragged record shapes: raw
//! bytes, and a `u32` element count followed by little-endian `f32` payload.

use crate::coder::{Coder, RecordCoder};
use crate::element::Allocatable;

/// One unsigned byte, stored as a single byte unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ByteMember(pub u8);

impl Allocatable for ByteMember {
    fn construct(&self) -> Self {
        Self(0)
    }

    fn construct_from(other: &Self) -> Self {
        *other
    }
}

impl Coder for ByteMember {
    type Unit = u8;

    fn unit_count(&self) -> usize {
        1
    }

    fn to_units(&self, buf: &mut [u8], offset: usize) {
        buf[offset] = self.0;
    }

    fn from_units(&mut self, buf: &[u8], offset: usize) {
        self.0 = buf[offset];
    }
}

/// One unsigned 64-bit integer, stored as a single long unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct U64Member(pub u64);

impl Allocatable for U64Member {
    fn construct(&self) -> Self {
        Self(0)
    }

    fn construct_from(other: &Self) -> Self {
        *other
    }
}

impl Coder for U64Member {
    type Unit = i64;

    fn unit_count(&self) -> usize {
        1
    }

    fn to_units(&self, buf: &mut [i64], offset: usize) {
        buf[offset] = self.0 as i64;
    }

    fn from_units(&mut self, buf: &[i64], offset: usize) {
        self.0 = buf[offset] as u64;
    }
}

/// A variable-length run of raw bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ByteRun(pub Vec<u8>);

impl Allocatable for ByteRun {
    fn construct(&self) -> Self {
        Self(Vec::new())
    }

    fn construct_from(other: &Self) -> Self {
        other.clone()
    }
}

impl RecordCoder for ByteRun {
    fn byte_count(&self) -> usize {
        self.0.len()
    }

    fn to_record(&self, out: &mut [u8]) {
        out.copy_from_slice(&self.0);
    }

    fn from_record(&mut self, record: &[u8]) {
        self.0.clear();
        self.0.extend_from_slice(record);
    }
}

/// A variable-length run of `f32` values with a `u32` count prefix.
///
/// Record layout: `count: u32 LE` then `count` little-endian `f32`s, so a
/// run of `k` values occupies `4 + 4k` bytes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FloatRun(pub Vec<f32>);

impl FloatRun {
    /// Bytes used by the count prefix.
    pub const PREFIX_BYTES: usize = 4;
}

impl Allocatable for FloatRun {
    fn construct(&self) -> Self {
        Self(Vec::new())
    }

    fn construct_from(other: &Self) -> Self {
        other.clone()
    }
}

impl RecordCoder for FloatRun {
    fn byte_count(&self) -> usize {
        Self::PREFIX_BYTES + 4 * self.0.len()
    }

    fn to_record(&self, out: &mut [u8]) {
        out[..4].copy_from_slice(&(self.0.len() as u32).to_le_bytes());
        for (chunk, v) in out[4..].chunks_exact_mut(4).zip(&self.0) {
            chunk.copy_from_slice(&v.to_le_bytes());
        }
    }

    fn from_record(&mut self, record: &[u8]) {
        self.0.clear();
        let Some(prefix) = record.get(..4) else {
            // Empty or truncated records (never-placed slots) read as empty runs.
            return;
        };
        let mut raw = [0u8; 4];
        raw.copy_from_slice(prefix);
        let count = u32::from_le_bytes(raw) as usize;
        self.0.extend(
            record[4..]
                .chunks_exact(4)
                .take(count)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]])),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u64_member_survives_sign_bit() {
        let v = U64Member(u64::MAX - 5);
        let mut buf = [0i64; 3];
        v.to_units(&mut buf, 2);
        let mut back = U64Member::default();
        back.from_units(&buf, 2);
        assert_eq!(back, v);
    }

    #[test]
    fn byte_member_marshals_at_offset() {
        let mut buf = [0u8; 4];
        ByteMember(0x7F).to_units(&mut buf, 3);
        assert_eq!(buf, [0, 0, 0, 0x7F]);
    }

    #[test]
    fn float_run_record_layout() {
        let run = FloatRun(vec![1.5, -2.0]);
        assert_eq!(run.byte_count(), 12);
        let mut rec = vec![0u8; run.byte_count()];
        run.to_record(&mut rec);
        assert_eq!(&rec[..4], &2u32.to_le_bytes());
        assert_eq!(&rec[4..8], &1.5f32.to_le_bytes());

        let mut back = FloatRun::default();
        back.from_record(&rec);
        assert_eq!(back, run);
    }

    #[test]
    fn empty_record_reads_as_empty_run() {
        let mut run = FloatRun(vec![9.0]);
        run.from_record(&[]);
        assert!(run.0.is_empty());
    }

    #[test]
    fn byte_run_round_trip() {
        let run = ByteRun(b"ragged".to_vec());
        let mut rec = vec![0u8; run.byte_count()];
        run.to_record(&mut rec);
        let mut back = ByteRun::default();
        back.from_record(&rec);
        assert_eq!(back, run);
        assert_eq!(ByteRun::construct_from(&run), run);
        assert!(run.construct().0.is_empty());
    }
}
