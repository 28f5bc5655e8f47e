//! Core contracts for the hoard storage layer.
//!
//! This is the leaf crate of the workspace. It defines the primitive unit
//! families, the marshalling ([`Coder`], [`RecordCoder`]) and allocation
//! ([`Allocatable`]) contracts element types implement, the storage-kind and
//! strategy tags, the shared [`StorageError`], and the [`IndexedStore`]
//! trait every backing store implements.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod coder;
pub mod element;
pub mod error;
pub mod kind;
pub mod members;
pub mod store;
pub mod unit;

pub use coder::{Coder, RecordCoder};
pub use element::{Allocatable, Element, RaggedElement};
pub use error::StorageError;
pub use kind::{StorageKind, StorageStrategy};
pub use members::{ByteMember, ByteRun, FloatRun, U64Member};
pub use store::{check_index, Container, IndexedStore};
pub use unit::{Unit, UnitKind};
