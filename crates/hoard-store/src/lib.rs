//! Tiered backing stores for the hoard indexed storage layer.
//!
//! Every store implements [`IndexedStore`](hoard_core::IndexedStore): a
//! fixed number of slots, each holding one element marshalled through its
//! coder. The [`Storage`] dispatcher picks the backing tier.
//!
//! # Architecture
//!
//! ```text
//! Storage (dispatcher, StorageConfig)
//! ├── ArrayStore     one contiguous Vec<Unit>
//! ├── ExtendedStore  chunk list, elements never straddle chunks
//! ├── VirtualStore   file on secondary storage (positional or logged)
//! ├── SparseStore    default value + IndexMap of deviating slots
//! └── RaggedStore    offset index + byte pool, both dispatcher-allocated
//!
//! Cursor ── borrows any store, owns one scratch element
//! ```
//!
//! # Tier fallback
//!
//! [`Storage::allocate`] tries array, then extended, then virtual. A tier
//! that cannot hold the request fails with
//! [`StorageError::Oversized`](hoard_core::StorageError::Oversized) or
//! [`StorageError::OutOfMemory`](hoard_core::StorageError::OutOfMemory) and
//! the dispatcher moves on. The resulting tier is observable only through
//! [`IndexedStore::storage_kind`](hoard_core::IndexedStore::storage_kind).
//!
//! # Threading
//!
//! Stores are `Send` but carry no locks. Callers must check
//! [`IndexedStore::access_with_one_thread`](hoard_core::IndexedStore::access_with_one_thread)
//! and `duplicate()` a store once per worker when it reports `true`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod array;
pub mod config;
pub mod cursor;
pub mod extended;
pub mod ragged;
pub mod sparse;
pub mod storage;
pub mod virtual_file;

pub use array::ArrayStore;
pub use config::StorageConfig;
pub use cursor::Cursor;
pub use extended::ExtendedStore;
pub use ragged::RaggedStore;
pub use sparse::SparseStore;
pub use storage::Storage;
pub use virtual_file::VirtualStore;
