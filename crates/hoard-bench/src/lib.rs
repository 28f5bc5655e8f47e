//! Benchmark profiles for the hoard indexed storage layer.
//!
//! Each profile is a [`Storage`] dispatcher configured so that a request of
//! [`PROFILE_UNITS`] units lands on a specific tier:
//!
//! - [`array_profile`]: default limits, stays in one contiguous buffer
//! - [`extended_profile`]: array ceiling below the request, 64K-unit chunks
//! - [`virtual_profile`]: both in-memory tiers too small, file-backed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use hoard_core::StorageKind;
use hoard_store::{Storage, StorageConfig};

/// Units requested by the tiered profiles.
pub const PROFILE_UNITS: u64 = 1 << 20;

/// Dispatcher with default limits.
pub fn array_profile() -> Storage {
    Storage::default()
}

/// Dispatcher whose array tier rejects [`PROFILE_UNITS`]-sized requests.
pub fn extended_profile() -> Storage {
    build(StorageConfig {
        max_array_units: PROFILE_UNITS / 2,
        extended_chunk_units: 1 << 16,
        ..StorageConfig::new()
    })
}

/// Dispatcher whose in-memory tiers both reject [`PROFILE_UNITS`]-sized
/// requests.
pub fn virtual_profile() -> Storage {
    build(StorageConfig {
        max_array_units: PROFILE_UNITS / 2,
        extended_chunk_units: 1 << 16,
        max_extended_chunks: 4,
        ..StorageConfig::new()
    })
}

/// All three profiles with the tier each one is expected to produce.
pub fn tiered_profiles() -> [(StorageKind, Storage); 3] {
    [
        (StorageKind::Array, array_profile()),
        (StorageKind::Extended, extended_profile()),
        (StorageKind::Virtual, virtual_profile()),
    ]
}

fn build(config: StorageConfig) -> Storage {
    match Storage::new(config) {
        Ok(storage) => storage,
        Err(e) => panic!("benchmark profile config is invalid: {e}"),
    }
}
