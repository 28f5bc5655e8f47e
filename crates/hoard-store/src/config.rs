//! Storage configuration parameters.

use std::mem;
use std::path::PathBuf;

use hoard_core::{StorageError, Unit};

/// Configuration for the allocation dispatcher and its tiers.
///
/// Validated by [`Storage::new`](crate::Storage::new); immutable afterwards.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Array-tier ceiling in units.
    ///
    /// Default: `isize::MAX`, i.e. the platform limit. The effective ceiling
    /// for a unit family is additionally capped so the buffer never exceeds
    /// `isize::MAX` bytes.
    pub max_array_units: u64,

    /// Units per chunk in the extended tier.
    ///
    /// Default: 16_777_216. Must be non-zero. Elements never straddle a
    /// chunk boundary; an element wider than a chunk gets a chunk to itself.
    pub extended_chunk_units: u64,

    /// Maximum number of chunks the extended tier may allocate.
    ///
    /// Default: 65_536. Must be non-zero.
    pub max_extended_chunks: u32,

    /// Directory for virtual-store backing files.
    ///
    /// `None` uses the system temporary directory.
    pub virtual_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Default array-tier ceiling: the platform's addressing limit.
    pub const DEFAULT_MAX_ARRAY_UNITS: u64 = isize::MAX as u64;

    /// Default extended-tier chunk size: 16M units.
    pub const DEFAULT_EXTENDED_CHUNK_UNITS: u64 = 16_777_216;

    /// Default extended-tier chunk ceiling.
    pub const DEFAULT_MAX_EXTENDED_CHUNKS: u32 = 65_536;

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            max_array_units: Self::DEFAULT_MAX_ARRAY_UNITS,
            extended_chunk_units: Self::DEFAULT_EXTENDED_CHUNK_UNITS,
            max_extended_chunks: Self::DEFAULT_MAX_EXTENDED_CHUNKS,
            virtual_dir: None,
        }
    }

    /// Check every field against its documented constraints.
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.extended_chunk_units == 0 {
            return Err(StorageError::invalid("extended_chunk_units must be non-zero"));
        }
        if self.max_extended_chunks == 0 {
            return Err(StorageError::invalid("max_extended_chunks must be non-zero"));
        }
        if let Some(dir) = &self.virtual_dir {
            if !dir.is_dir() {
                return Err(StorageError::invalid(format!(
                    "virtual_dir {} is not a directory",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Largest number of `U` units one contiguous buffer may hold.
    pub fn array_ceiling<U: Unit>(&self) -> u64 {
        self.max_array_units.min(platform_ceiling::<U>())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Most `U` units a single `Vec` can hold without exceeding `isize::MAX` bytes.
pub(crate) fn platform_ceiling<U: Unit>() -> u64 {
    (isize::MAX as u64) / (mem::size_of::<U>().max(1) as u64)
}
