//! Error type shared by every backing store and the allocation dispatcher.
//!
//! Variants fall into three groups:
//!
//! - caller errors detected before any allocation (`InvalidArgument`,
//!   `MisalignedInput`) and never retried;
//! - tier-local allocation failures (`Oversized`, `OutOfMemory`) that the
//!   dispatcher recovers from by falling back to the next tier;
//! - access errors surfaced synchronously at the call site (`SizeMismatch`,
//!   `IndexOutOfBounds`, `CorruptUnit`, `Io`).

use std::error::Error;
use std::fmt;
use std::io;

/// Errors produced by the storage layer.
#[derive(Debug)]
pub enum StorageError {
    /// Negative size, unrecognised strategy, or an otherwise unusable argument.
    InvalidArgument {
        /// Human-readable description of the rejected argument.
        reason: String,
    },
    /// The request exceeds the tier's addressing ceiling.
    Oversized {
        /// Total units requested (`elements × unit_count`).
        requested_units: u128,
        /// Largest unit count the tier can address.
        ceiling: u64,
    },
    /// The allocator could not provide the backing memory.
    OutOfMemory {
        /// Size of the failed allocation in bytes.
        requested_bytes: u128,
    },
    /// A `set` offered a value whose footprint differs from the slot's:
    /// bytes for ragged records, units for fixed-footprint stores.
    SizeMismatch {
        /// Slot being written.
        index: u64,
        /// Footprint the slot holds.
        expected: u64,
        /// Footprint of the value offered.
        actual: u64,
    },
    /// Bulk-load input whose length is not a multiple of the unit count.
    MisalignedInput {
        /// Number of raw units supplied.
        len: usize,
        /// Units per element reported by the prototype.
        unit_count: usize,
    },
    /// `get`/`set` outside `0..size`.
    IndexOutOfBounds {
        /// The offending position (may be a cursor sentinel such as `-1`).
        index: i64,
        /// Size of the container.
        size: u64,
    },
    /// Bytes read back from secondary storage do not decode to a unit.
    CorruptUnit {
        /// Description of the decode failure.
        detail: String,
    },
    /// Secondary storage I/O failed.
    Io(io::Error),
}

impl StorageError {
    /// Whether the dispatcher may recover from this error by trying the next tier.
    pub fn is_tier_failure(&self) -> bool {
        matches!(self, Self::Oversized { .. } | Self::OutOfMemory { .. })
    }

    /// Shorthand for [`StorageError::InvalidArgument`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
            Self::Oversized {
                requested_units,
                ceiling,
            } => {
                write!(
                    f,
                    "allocation too large: requested {requested_units} units, \
                     ceiling {ceiling} units"
                )
            }
            Self::OutOfMemory { requested_bytes } => {
                write!(f, "out of memory allocating {requested_bytes} bytes")
            }
            Self::SizeMismatch {
                index,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "size mismatch at slot {index}: slot holds {expected}, value has {actual}"
                )
            }
            Self::MisalignedInput { len, unit_count } => {
                write!(
                    f,
                    "misaligned input: {len} units is not a multiple of \
                     {unit_count} units per element"
                )
            }
            Self::IndexOutOfBounds { index, size } => {
                write!(f, "index {index} out of bounds for size {size}")
            }
            Self::CorruptUnit { detail } => write!(f, "corrupt unit: {detail}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
