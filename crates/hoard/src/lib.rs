//! Hoard: generic indexed storage for arbitrarily-typed records.
//!
//! This is the top-level facade crate that re-exports the public API from the
//! hoard sub-crates. For most users, adding `hoard` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use hoard::prelude::*;
//!
//! // A 2-D point marshalled as two int units.
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct Xy { x: i32, y: i32 }
//!
//! impl Allocatable for Xy {
//!     fn construct(&self) -> Self { Xy::default() }
//!     fn construct_from(other: &Self) -> Self { other.clone() }
//! }
//!
//! impl Coder for Xy {
//!     type Unit = i32;
//!     fn unit_count(&self) -> usize { 2 }
//!     fn to_units(&self, buf: &mut [i32], offset: usize) {
//!         buf[offset] = self.x;
//!         buf[offset + 1] = self.y;
//!     }
//!     fn from_units(&mut self, buf: &[i32], offset: usize) {
//!         self.x = buf[offset];
//!         self.y = buf[offset + 1];
//!     }
//! }
//!
//! let storage = Storage::default();
//! let mut points = storage.from_ints(&Xy::default(), &[1, 2, 3, 4, 5, 6]).unwrap();
//! assert_eq!(points.size(), 3);
//! assert_eq!(points.storage_kind(), StorageKind::Array);
//!
//! let mut cursor = Cursor::new(&Xy::default(), points.as_mut());
//! let mut xs = Vec::new();
//! while cursor.has_next() {
//!     cursor.fwd();
//!     xs.push(cursor.get().unwrap().x);
//! }
//! assert_eq!(xs, vec![1, 3, 5]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `hoard-core` | Unit families, coder and allocatable contracts, `IndexedStore`, errors |
//! | [`store`] | `hoard-store` | Backing stores, the `Storage` dispatcher, `Cursor`, `StorageConfig` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core contracts and types (`hoard-core`).
///
/// Element types implement [`types::Allocatable`] plus either
/// [`types::Coder`] (fixed footprint) or [`types::RecordCoder`] (ragged).
pub use hoard_core as types;

/// Backing stores and the allocation dispatcher (`hoard-store`).
///
/// [`store::Storage`] picks a tier; [`store::RaggedStore`] holds
/// variable-length records; [`store::Cursor`] walks any container.
pub use hoard_store as store;

/// Common imports for typical hoard usage.
///
/// ```rust
/// use hoard::prelude::*;
/// ```
pub mod prelude {
    // Contracts
    pub use hoard_core::{Allocatable, Coder, Element, RaggedElement, RecordCoder, Unit};

    // Containers
    pub use hoard_core::{Container, IndexedStore, StorageKind, StorageStrategy};

    // Errors
    pub use hoard_core::StorageError;

    // Stores and dispatch
    pub use hoard_store::{Cursor, RaggedStore, Storage, StorageConfig};
}
