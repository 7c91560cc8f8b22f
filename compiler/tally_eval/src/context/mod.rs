//! Evaluation sessions.
//!
//! A `ScriptContext` owns one session's symbol table and holds shared
//! handles to the registry and the random source. Several contexts may
//! share one registry across threads; each context itself is used by one
//! thread at a time.

mod symbols;

pub use symbols::SymbolTable;

use tally_ir::RollExpression;
use tally_value::errors::{undefined_property, undefined_roll, undefined_variable};
use tally_value::{DataValue, EvalError, EvalResult};

use crate::dice::roll_expression;
use crate::functions::PermissionLevel;
use crate::random::{RandomSource, SharedRandom};
use crate::registry::SharedScriptRegistry;

/// What reading an unset variable, property or roll yields.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum MissingSymbolPolicy {
    /// A `NotFound` error.
    #[default]
    Error,
    /// This value instead.
    Default(DataValue),
}

impl MissingSymbolPolicy {
    fn resolve(
        &self,
        found: Option<&DataValue>,
        missing: impl FnOnce() -> EvalError,
    ) -> EvalResult {
        match (found, self) {
            (Some(value), _) => Ok(value.clone()),
            (None, MissingSymbolPolicy::Default(value)) => Ok(value.clone()),
            (None, MissingSymbolPolicy::Error) => Err(missing()),
        }
    }
}

pub struct ScriptContext {
    symbols: SymbolTable,
    registry: SharedScriptRegistry,
    random: SharedRandom,
    permission: PermissionLevel,
    missing_symbols: MissingSymbolPolicy,
    call_depth: u32,
}

impl ScriptContext {
    /// A context with default settings over `registry`.
    pub fn new(registry: SharedScriptRegistry) -> Self {
        ScriptContextBuilder::new(registry).build()
    }

    pub fn builder(registry: SharedScriptRegistry) -> ScriptContextBuilder {
        ScriptContextBuilder::new(registry)
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    pub fn registry(&self) -> &SharedScriptRegistry {
        &self.registry
    }

    pub fn random(&self) -> &SharedRandom {
        &self.random
    }

    pub fn permission(&self) -> PermissionLevel {
        self.permission
    }

    pub fn set_permission(&mut self, permission: PermissionLevel) {
        self.permission = permission;
    }

    pub fn missing_symbol_policy(&self) -> &MissingSymbolPolicy {
        &self.missing_symbols
    }

    /// Number of `nested_call` bodies in progress.
    pub fn call_depth(&self) -> u32 {
        self.call_depth
    }

    /// Run `body` one call level deeper. Scripts cannot see or change the
    /// depth, so extensions can bound their own recursion with it.
    pub fn nested_call(&mut self, body: impl FnOnce(&mut Self) -> EvalResult) -> EvalResult {
        self.call_depth = self.call_depth.saturating_add(1);
        let result = body(self);
        self.call_depth = self.call_depth.saturating_sub(1);
        result
    }

    // Symbol reads with the missing-symbol policy applied

    pub fn variable(&self, name: &str) -> EvalResult {
        self.missing_symbols
            .resolve(self.symbols.variable(name), || undefined_variable(name))
    }

    pub fn property(&self, name: &str) -> EvalResult {
        self.missing_symbols
            .resolve(self.symbols.property(name), || undefined_property(name))
    }

    pub fn roll_result(&self, name: &str) -> EvalResult {
        self.missing_symbols
            .resolve(self.symbols.roll_result(name), || undefined_roll(name))
    }

    /// Value of roll `name`: rolls a declared expression on first use,
    /// otherwise returns the recorded result.
    pub fn resolve_roll(&mut self, name: &str) -> EvalResult {
        match self.symbols.take_pending_roll(name) {
            Some(expression) => self.roll(&expression),
            None => self.roll_result(name),
        }
    }

    /// Roll `expression` with the registry's dice.
    pub fn roll(&mut self, expression: &RollExpression) -> EvalResult {
        roll_expression(self, expression)
    }
}

impl std::fmt::Debug for ScriptContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptContext")
            .field("symbols", &self.symbols)
            .field("permission", &self.permission)
            .field("missing_symbols", &self.missing_symbols)
            .field("call_depth", &self.call_depth)
            .finish_non_exhaustive()
    }
}

/// Builder for `ScriptContext`.
#[derive(Clone, Debug)]
pub struct ScriptContextBuilder {
    registry: SharedScriptRegistry,
    random: Option<SharedRandom>,
    permission: PermissionLevel,
    missing_symbols: MissingSymbolPolicy,
}

impl ScriptContextBuilder {
    pub fn new(registry: SharedScriptRegistry) -> Self {
        ScriptContextBuilder {
            registry,
            random: None,
            permission: PermissionLevel::default(),
            missing_symbols: MissingSymbolPolicy::default(),
        }
    }

    /// Share `random` instead of seeding a fresh source from the OS.
    #[must_use]
    pub fn random(mut self, random: SharedRandom) -> Self {
        self.random = Some(random);
        self
    }

    #[must_use]
    pub fn permission(mut self, permission: PermissionLevel) -> Self {
        self.permission = permission;
        self
    }

    #[must_use]
    pub fn missing_symbol_policy(mut self, policy: MissingSymbolPolicy) -> Self {
        self.missing_symbols = policy;
        self
    }

    pub fn build(self) -> ScriptContext {
        ScriptContext {
            symbols: SymbolTable::new(),
            registry: self.registry,
            random: self
                .random
                .unwrap_or_else(|| RandomSource::from_os_rng().shared()),
            permission: self.permission,
            missing_symbols: self.missing_symbols,
            call_depth: 0,
        }
    }
}
