//! The allocation dispatcher.
//!
//! [`Storage`] turns "`n` elements shaped like this prototype" into a
//! container, choosing the backing tier:
//!
//! ```text
//! allocate(proto, n)              allocate_with(strategy, proto, n)
//!        │                            │
//!        │      ┌──── Array ──────────┤
//!        ▼      ▼                     ├── Sparse ──▶ SparseStore
//!   ArrayStore ─(Oversized/OOM)─▶ ExtendedStore ─(Oversized/OOM)─▶ VirtualStore
//!                                     └── Virtual ─▶ VirtualStore
//! ```
//!
//! Each tier returns a `Result`; the dispatcher matches on tier failures
//! ([`StorageError::is_tier_failure`]) and moves on, so fallback is visible to
//! callers only through [`IndexedStore::storage_kind`]. Caller errors
//! (negative sizes, misaligned bulk input) are rejected before any tier runs.

use bigdecimal::BigDecimal;
use hoard_core::{Coder, Container, Element, IndexedStore, StorageError, StorageStrategy};
use num_bigint::BigInt;
use tracing::{debug, warn};

use crate::array::{alloc_units, check_footprint, ArrayStore};
use crate::config::{platform_ceiling, StorageConfig};
use crate::extended::ExtendedStore;
use crate::sparse::SparseStore;
use crate::virtual_file::VirtualStore;

/// Allocation dispatcher over the backing-store tiers.
#[derive(Clone, Debug, Default)]
pub struct Storage {
    config: StorageConfig,
}

fn checked_len(n: i64) -> Result<u64, StorageError> {
    u64::try_from(n)
        .map_err(|_| StorageError::invalid(format!("element count must be non-negative, got {n}")))
}

impl Storage {
    /// Create a dispatcher after validating `config`.
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Allocate `n` zero-valued slots, fastest tier first.
    ///
    /// Tries the array tier, then the extended tier, then unconditionally the
    /// virtual tier. Fails with [`StorageError::InvalidArgument`] for `n < 0`.
    pub fn allocate<T: Element>(
        &self,
        prototype: &T,
        n: i64,
    ) -> Result<Container<T>, StorageError> {
        let n = checked_len(n)?;
        self.in_memory_first(prototype, n)
    }

    /// Allocate `n` zero-valued slots with a caller-chosen strategy.
    ///
    /// `Array` keeps the in-memory-if-at-all-possible semantics of
    /// [`Storage::allocate`], falling back to extended and then virtual.
    pub fn allocate_with<T: Element>(
        &self,
        strategy: StorageStrategy,
        prototype: &T,
        n: i64,
    ) -> Result<Container<T>, StorageError> {
        let n = checked_len(n)?;
        match strategy {
            StorageStrategy::Array => self.in_memory_first(prototype, n),
            StorageStrategy::Sparse => Ok(Box::new(SparseStore::new(prototype, n))),
            StorageStrategy::Virtual => {
                Ok(Box::new(VirtualStore::create(prototype, n, &self.config)?))
            }
        }
    }

    fn in_memory_first<T: Element>(
        &self,
        prototype: &T,
        n: u64,
    ) -> Result<Container<T>, StorageError> {
        let unit_count = prototype.unit_count();
        match ArrayStore::allocate(prototype, n, &self.config) {
            Ok(store) => {
                debug!(tier = "array", elements = n, unit_count, "allocated");
                return Ok(Box::new(store));
            }
            Err(e) if e.is_tier_failure() => {
                debug!(
                    tier = "array",
                    elements = n,
                    unit_count,
                    error = %e,
                    "tier failed, trying extended"
                );
            }
            Err(e) => return Err(e),
        }
        match ExtendedStore::allocate(prototype, n, &self.config) {
            Ok(store) => {
                debug!(tier = "extended", elements = n, unit_count, "allocated");
                return Ok(Box::new(store));
            }
            Err(e) if e.is_tier_failure() => {
                warn!(
                    tier = "extended",
                    elements = n,
                    unit_count,
                    error = %e,
                    "in-memory tiers exhausted, falling back to virtual"
                );
            }
            Err(e) => return Err(e),
        }
        let store = VirtualStore::create(prototype, n, &self.config)?;
        debug!(tier = "virtual", elements = n, unit_count, "allocated");
        Ok(Box::new(store))
    }

    /// Allocate a container and fill it from already-marshalled units.
    ///
    /// `raw.len()` must be a multiple of the prototype's unit count
    /// ([`StorageError::MisalignedInput`] otherwise); the container holds
    /// `raw.len() / unit_count` elements and is allocated with
    /// [`Storage::allocate`].
    pub fn allocate_from_units<T: Element>(
        &self,
        prototype: &T,
        raw: &[T::Unit],
    ) -> Result<Container<T>, StorageError> {
        let unit_count = prototype.unit_count();
        if unit_count == 0 {
            return Err(StorageError::invalid(
                "cannot bulk-load elements that occupy zero units",
            ));
        }
        if raw.len() % unit_count != 0 {
            return Err(StorageError::MisalignedInput {
                len: raw.len(),
                unit_count,
            });
        }
        let n = raw.len() / unit_count;
        let mut container = self.allocate(prototype, n as i64)?;
        let mut value = prototype.construct();
        for i in 0..n {
            value.from_units(raw, i * unit_count);
            container.set(i as u64, &value)?;
        }
        Ok(container)
    }

    /// Bulk-load from byte units.
    pub fn from_bytes<T>(&self, prototype: &T, raw: &[u8]) -> Result<Container<T>, StorageError>
    where
        T: Element + Coder<Unit = u8>,
    {
        self.allocate_from_units(prototype, raw)
    }

    /// Bulk-load from short units.
    pub fn from_shorts<T>(&self, prototype: &T, raw: &[i16]) -> Result<Container<T>, StorageError>
    where
        T: Element + Coder<Unit = i16>,
    {
        self.allocate_from_units(prototype, raw)
    }

    /// Bulk-load from int units.
    pub fn from_ints<T>(&self, prototype: &T, raw: &[i32]) -> Result<Container<T>, StorageError>
    where
        T: Element + Coder<Unit = i32>,
    {
        self.allocate_from_units(prototype, raw)
    }

    /// Bulk-load from long units.
    pub fn from_longs<T>(&self, prototype: &T, raw: &[i64]) -> Result<Container<T>, StorageError>
    where
        T: Element + Coder<Unit = i64>,
    {
        self.allocate_from_units(prototype, raw)
    }

    /// Bulk-load from bool units.
    pub fn from_bools<T>(&self, prototype: &T, raw: &[bool]) -> Result<Container<T>, StorageError>
    where
        T: Element + Coder<Unit = bool>,
    {
        self.allocate_from_units(prototype, raw)
    }

    /// Bulk-load from char units.
    pub fn from_chars<T>(&self, prototype: &T, raw: &[char]) -> Result<Container<T>, StorageError>
    where
        T: Element + Coder<Unit = char>,
    {
        self.allocate_from_units(prototype, raw)
    }

    /// Bulk-load from string units.
    pub fn from_strings<T>(
        &self,
        prototype: &T,
        raw: &[String],
    ) -> Result<Container<T>, StorageError>
    where
        T: Element + Coder<Unit = String>,
    {
        self.allocate_from_units(prototype, raw)
    }

    /// Bulk-load from big-integer units.
    pub fn from_big_integers<T>(
        &self,
        prototype: &T,
        raw: &[BigInt],
    ) -> Result<Container<T>, StorageError>
    where
        T: Element + Coder<Unit = BigInt>,
    {
        self.allocate_from_units(prototype, raw)
    }

    /// Bulk-load from big-decimal units.
    pub fn from_big_decimals<T>(
        &self,
        prototype: &T,
        raw: &[BigDecimal],
    ) -> Result<Container<T>, StorageError>
    where
        T: Element + Coder<Unit = BigDecimal>,
    {
        self.allocate_from_units(prototype, raw)
    }

    /// Flatten a container back into marshalled units.
    ///
    /// The inverse of [`Storage::allocate_from_units`]: the result holds
    /// `size × unit_count` units in slot order. The output is bounded only by
    /// the platform limit, not by `max_array_units`, so containers that fell
    /// back to another tier export like any other.
    pub fn export_units<T: Element>(
        &self,
        container: &mut dyn IndexedStore<T>,
        prototype: &T,
    ) -> Result<Vec<T::Unit>, StorageError> {
        let unit_count = prototype.unit_count();
        let total = container.size() as u128 * unit_count as u128;
        let ceiling = platform_ceiling::<T::Unit>();
        if total > ceiling as u128 {
            return Err(StorageError::Oversized {
                requested_units: total,
                ceiling,
            });
        }
        let mut units = alloc_units(total as usize)?;
        let mut value = prototype.construct();
        for i in 0..container.size() {
            container.get(i, &mut value)?;
            check_footprint(i, &value, unit_count)?;
            value.to_units(&mut units, i as usize * unit_count);
        }
        Ok(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoard_core::StorageKind;
    use hoard_test_utils::{Complex, Rgba};

    fn tiny(max_array_units: u64, chunk_units: u64, max_chunks: u32) -> Storage {
        Storage::new(StorageConfig {
            max_array_units,
            extended_chunk_units: chunk_units,
            max_extended_chunks: max_chunks,
            virtual_dir: None,
        })
        .unwrap()
    }

    #[test]
    fn negative_size_is_rejected_before_any_tier() {
        let storage = Storage::default();
        assert!(matches!(
            storage.allocate(&Rgba::default(), -1),
            Err(StorageError::InvalidArgument { .. })
        ));
        for strategy in StorageStrategy::ALL {
            assert!(matches!(
                storage.allocate_with(strategy, &Rgba::default(), -5),
                Err(StorageError::InvalidArgument { .. })
            ));
        }
    }

    #[test]
    fn automatic_allocation_prefers_array() {
        let c = Storage::default().allocate(&Rgba::default(), 10).unwrap();
        assert_eq!(c.storage_kind(), StorageKind::Array);
        assert_eq!(c.size(), 10);
    }

    #[test]
    fn oversized_array_falls_back_to_extended() {
        let storage = tiny(16, 8, 100);
        let c = storage.allocate(&Rgba::default(), 5).unwrap();
        assert_eq!(c.storage_kind(), StorageKind::Extended);
        assert_eq!(c.size(), 5);
    }

    #[test]
    fn exhausted_extended_falls_back_to_virtual() {
        let storage = tiny(16, 8, 2);
        let c = storage.allocate(&Rgba::default(), 5).unwrap();
        assert_eq!(c.storage_kind(), StorageKind::Virtual);
    }

    #[test]
    fn explicit_array_strategy_keeps_fallback() {
        let storage = tiny(16, 8, 100);
        let c = storage
            .allocate_with(StorageStrategy::Array, &Rgba::default(), 5)
            .unwrap();
        assert_eq!(c.storage_kind(), StorageKind::Extended);
    }

    #[test]
    fn explicit_strategies_pick_their_store() {
        let storage = Storage::default();
        let sparse = storage
            .allocate_with(StorageStrategy::Sparse, &Complex::default(), 100)
            .unwrap();
        assert_eq!(sparse.storage_kind(), StorageKind::Sparse);
        let virt = storage
            .allocate_with(StorageStrategy::Virtual, &Complex::default(), 100)
            .unwrap();
        assert_eq!(virt.storage_kind(), StorageKind::Virtual);
    }

    #[test]
    fn bulk_load_rejects_misaligned_input() {
        let storage = Storage::default();
        assert!(matches!(
            storage.from_bytes(&Rgba::default(), &[0u8; 10]),
            Err(StorageError::MisalignedInput {
                len: 10,
                unit_count: 4
            })
        ));
    }

    #[test]
    fn bulk_load_then_export_reproduces_units() {
        let storage = Storage::default();
        let raw: Vec<u8> = (0..12).collect();
        let mut c = storage.from_bytes(&Rgba::default(), &raw).unwrap();
        assert_eq!(c.size(), 3);
        let mut out = Rgba::default();
        c.get(1, &mut out).unwrap();
        assert_eq!(out, Rgba::new(4, 5, 6, 7));
        assert_eq!(storage.export_units(c.as_mut(), &Rgba::default()).unwrap(), raw);
    }

    #[test]
    fn export_ignores_array_tier_ceiling() {
        let storage = tiny(4, 8, 100);
        let raw: Vec<u8> = (0..12).collect();
        let mut c = storage.from_bytes(&Rgba::default(), &raw).unwrap();
        assert_eq!(c.storage_kind(), StorageKind::Extended);
        assert_eq!(storage.export_units(c.as_mut(), &Rgba::default()).unwrap(), raw);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = Storage::new(StorageConfig {
            extended_chunk_units: 0,
            ..StorageConfig::new()
        });
        assert!(result.is_err());
    }
}
