//! The allocatable contract and the element bounds stores require.

use crate::coder::{Coder, RecordCoder};

/// Element types that can produce fresh and copied instances of themselves.
///
/// Stores never store the prototype passed to them; they call
/// [`Allocatable::construct`] on it to obtain scratch and default values.
/// Construction goes through an instance so shape-carrying elements (a point
/// of a given dimension, say) hand out values of the same shape.
pub trait Allocatable: Sized {
    /// A zero-valued instance shaped like `self`.
    fn construct(&self) -> Self;

    /// A deep copy of `other`.
    fn construct_from(other: &Self) -> Self;
}

/// Bound for elements storable in fixed-footprint stores.
///
/// `PartialEq` is needed by the sparse store, which drops slots that are
/// written back to the default value.
pub trait Element: Allocatable + Coder + PartialEq + Send + 'static {}

impl<T> Element for T where T: Allocatable + Coder + PartialEq + Send + 'static {}

/// Bound for elements storable in ragged stores.
pub trait RaggedElement: Allocatable + RecordCoder + Send + 'static {}

impl<T> RaggedElement for T where T: Allocatable + RecordCoder + Send + 'static {}
