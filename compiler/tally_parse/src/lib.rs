//! Tally Parse - front end for dice scripts.
//!
//! Turns script text into a `tally_ir::Script`:
//! - `lexer`: logos-based tokenizer
//! - `parser`: recursive descent over the token list
//!
//! Statements are separated by `;` or newlines. Each bare dice word or
//! braced roll becomes a `Roll` node backed by a declaration named
//! `roll1`, `roll2`, ... in source order.

mod error;
mod lexer;
mod parser;

pub use error::ParseError;
pub use parser::parse;

#[cfg(test)]
mod tests;
