//! `bullion-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the shared error model, the value-object marker and the `Money` type used
//! by catalog, pricing and orders.

pub mod error;
pub mod money;
pub mod value_object;

pub use error::DomainError;
pub use money::Money;
pub use value_object::ValueObject;
