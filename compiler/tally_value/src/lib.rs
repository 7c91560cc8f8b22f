//! Tally Value - the dynamically-typed value model.
//!
//! # Architecture
//!
//! - `DataValue` / `ValueKind`: the closed value union and its factories
//! - coercion views (`as_long`, `as_double`, `as_string`, `as_list`,
//!   `as_dictionary`, `as_result`)
//! - `evaluate_binary` / `evaluate_unary`: enum-dispatched arithmetic
//! - `DataType`: variant tags used by function signatures
//! - `EvalError` / `EvalResult`: the error type shared by every Tally crate

mod data_type;
pub mod errors;
mod operators;
mod unary_operators;
mod value;

pub use data_type::DataType;
pub use errors::{ErrorCategory, EvalError, EvalErrorKind, EvalNote, EvalResult};
pub use operators::{evaluate_binary, MAX_STRING_LEN};
pub use unary_operators::evaluate_unary;
pub use value::{DataValue, Dictionary, Heap, RollResult, ValueKind};

#[cfg(test)]
mod tests;
