//! Tally IR - Parse-tree vocabulary.
//!
//! This crate contains the data structures the front end produces and the
//! evaluator consumes:
//! - `Span` for source locations
//! - `BinaryOp` / `UnaryOp`
//! - `RollExpression`: a dice notation with its verbose and sum flags
//! - `Node` / `Script`: the evaluator tree
//!
//! Nothing here evaluates anything; the evaluator lives in `tally_eval`.

mod node;
mod operators;
mod roll;
mod span;

pub use node::{AssignTarget, Literal, Node, Script};
pub use operators::{BinaryOp, UnaryOp};
pub use roll::{RollDeclaration, RollExpression};
pub use span::Span;
