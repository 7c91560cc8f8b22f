//! Shared fixtures for evaluator tests.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

mod registry_tests;

use crate::{RandomSource, Registry, ScriptContext, SharedScriptRegistry};

pub(crate) fn registry() -> SharedScriptRegistry {
    Registry::with_builtins().unwrap().shared()
}

/// A context over a fresh registry with a seeded random source.
pub(crate) fn context() -> ScriptContext {
    context_on(&registry())
}

pub(crate) fn context_on(registry: &SharedScriptRegistry) -> ScriptContext {
    ScriptContext::builder(registry.clone())
        .random(RandomSource::seeded(0x5eed).shared())
        .build()
}
