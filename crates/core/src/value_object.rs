//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. Prices, spot quotes,
/// premium tiers and SKUs are value objects; nothing in the pricing path has
/// identity or a lifecycle.
///
/// The trait requires:
/// - **Clone**: values are copied freely between catalog, pricing and orders
/// - **PartialEq**: compared by their attribute values
/// - **Debug**: shows up in logs and test failures
///
/// ```
/// use bullion_core::{Money, ValueObject};
/// use rust_decimal::Decimal;
///
/// fn same<T: ValueObject>(a: &T, b: &T) -> bool {
///     a == b
/// }
///
/// let a = Money::new(Decimal::new(2200, 2));
/// let b = Money::new(Decimal::new(22, 0));
/// assert!(same(&a, &b)); // Equal by value, not representation
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
