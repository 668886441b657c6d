//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. A
/// policy statement is a value object: two statements with the same effect,
/// actions, and resources are interchangeable. A role is an entity: two roles
/// with the same name are still distinct rows.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
