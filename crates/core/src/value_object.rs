//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; they are defined entirely by their
//! attribute values. A monetary amount is the canonical example: two amounts of
//! `150.50` are the same amount regardless of where they came from.

/// Marker trait for value objects.
///
/// Implementors are immutable and compared by value. To "change" one, build a
/// new instance. Constructors are expected to normalize their input so that
/// equal values always have equal representations.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
