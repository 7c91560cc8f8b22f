//! Tally Eval - dice, functions and the tree evaluator.
//!
//! # Architecture
//!
//! - `random`: the shared random source
//! - `dice`: notation patterns, `StandardDice`, `ExtensionDice`, `DiceRoller`
//! - `functions`: signatures, built-ins, the function registry, permissions
//! - `extension`: the engine contract and atomic batch registration
//! - `registry`: functions plus dice behind one shared lock
//! - `context`: `ScriptContext` (one session) and its `SymbolTable`
//! - `exec`: `ScriptContext::evaluate` and function calls
//!
//! # Sharing
//!
//! Registries and the random source are never global. Each context holds
//! shared handles (`SharedScriptRegistry`, `SharedRandom`), so independent
//! registries can coexist and sessions on different threads can share one.

pub mod context;
pub mod dice;
mod exec;
pub mod extension;
pub mod functions;
pub mod random;
pub mod registry;
mod shared;

pub use context::{MissingSymbolPolicy, ScriptContext, ScriptContextBuilder, SymbolTable};
pub use dice::{Dice, DicePattern, DiceRoller, ExtensionDice, StandardDice};
pub use extension::{
    register_extensions, ExportBatch, ExtensionCallable, ExtensionEngine, ExtensionHandle,
    ExtensionScript, RegistrationSummary,
};
pub use functions::{FunctionDefinition, FunctionRegistry, Parameter, PermissionLevel, ScriptFunction};
pub use random::{RandomSource, SharedRandom};
pub use registry::{Registry, SharedScriptRegistry};

#[cfg(test)]
mod tests;
