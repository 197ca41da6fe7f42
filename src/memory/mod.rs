//! Variable storage for the interpreter
//!
//! - [`store`]: the [`store::VariableStore`] mapping names to unbounded
//!   non-negative integers
//!
//! Values are [`BigUint`]s, so a negative value cannot be written and
//! arithmetic never wraps at machine-word boundaries.
//!
//! [`BigUint`]: num_bigint::BigUint

pub mod store;

pub use store::{Bindings, VariableStore};
