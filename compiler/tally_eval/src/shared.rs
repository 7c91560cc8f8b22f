//! Handles through which sessions share the registry and the random source.
//!
//! Lookups made during evaluation clone what they need out of the registry
//! and release the lock before running it, so an extension callable never
//! runs while the registry is locked.

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tally_ir::RollExpression;

use crate::dice::Dice;
use crate::functions::{PermissionLevel, ScriptFunction};
use crate::random::RandomSource;
use crate::registry::Registry;

/// Shared handle to a `Registry`. Clones refer to the same registry.
#[derive(Clone)]
pub struct SharedScriptRegistry(Arc<RwLock<Registry>>);

impl SharedScriptRegistry {
    pub(crate) fn new(registry: Registry) -> Self {
        SharedScriptRegistry(Arc::new(RwLock::new(registry)))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.0.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.0.write()
    }

    /// Run `update` under the write lock. Readers see the registry before
    /// or after it, never part way.
    pub fn update<R>(&self, update: impl FnOnce(&mut Registry) -> R) -> R {
        update(&mut self.0.write())
    }

    /// A copy of the current registry, detached from this handle.
    pub fn snapshot(&self) -> Registry {
        self.0.read().clone()
    }

    /// The dice that would roll `expression`.
    pub fn dice_for(&self, expression: &RollExpression) -> Option<Dice> {
        self.0.read().dice().find(expression).cloned()
    }

    /// Function `name` as a call resolves it, with the level a caller needs.
    pub fn function_for_call(&self, name: &str) -> Option<(ScriptFunction, PermissionLevel)> {
        let registry = self.0.read();
        let functions = registry.functions();
        let function = functions.resolve(name)?.clone();
        let required = functions.permission(name).unwrap_or_default();
        Some((function, required))
    }
}

impl fmt::Debug for SharedScriptRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.0.read();
        f.debug_struct("SharedScriptRegistry")
            .field("builtin_functions", &registry.functions().builtin_functions().count())
            .field("user_functions", &registry.functions().user_functions().count())
            .field("user_dice", &registry.dice().user_dice().len())
            .finish()
    }
}

/// Shared handle to the random source. The source locks its own generator
/// per draw.
#[derive(Clone, Debug)]
pub struct SharedRandom(Arc<RandomSource>);

impl SharedRandom {
    pub(crate) fn new(random: RandomSource) -> Self {
        SharedRandom(Arc::new(random))
    }
}

impl std::ops::Deref for SharedRandom {
    type Target = RandomSource;

    fn deref(&self) -> &RandomSource {
        &self.0
    }
}
