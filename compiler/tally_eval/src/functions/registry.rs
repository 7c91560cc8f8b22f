//! Built-in and user function tables.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tally_value::errors::{builtin_function_shadowed, duplicate_function, undefined_function};
use tally_value::EvalError;

use super::{builtins, PermissionLevel, ScriptFunction};

/// Function lookup for one registry.
///
/// Built-ins are fixed at construction. User functions come and go through
/// extension registration and never share a name with a built-in or with
/// each other. Listings iterate in name order.
#[derive(Clone, Debug, Default)]
pub struct FunctionRegistry {
    builtins: BTreeMap<String, ScriptFunction>,
    user: BTreeMap<String, ScriptFunction>,
    builtin_permissions: FxHashMap<String, PermissionLevel>,
    /// Permissions of user functions plus overrides of built-in levels.
    user_permissions: FxHashMap<String, PermissionLevel>,
}

impl FunctionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the built-in function list.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (function, permission) in builtins::builtin_functions() {
            registry.add_builtin(function, permission);
        }
        registry
    }

    fn add_builtin(&mut self, function: ScriptFunction, permission: PermissionLevel) {
        let name = function.name().to_string();
        self.builtin_permissions.insert(name.clone(), permission);
        self.builtins.insert(name, function);
    }

    pub fn builtin_function(&self, name: &str) -> Option<&ScriptFunction> {
        self.builtins.get(name)
    }

    pub fn user_function(&self, name: &str) -> Option<&ScriptFunction> {
        self.user.get(name)
    }

    /// Find a function by name, built-in table first.
    pub fn resolve(&self, name: &str) -> Option<&ScriptFunction> {
        self.builtins.get(name).or_else(|| self.user.get(name))
    }

    pub fn contains_builtin(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
    }

    pub fn contains_user(&self, name: &str) -> bool {
        self.user.contains_key(name)
    }

    /// Whether `function` is the built-in registered under its name.
    pub fn is_builtin(&self, function: &ScriptFunction) -> bool {
        function.is_builtin() && self.contains_builtin(function.name())
    }

    /// Required caller level for `name`: user table first, then built-in.
    pub fn permission(&self, name: &str) -> Option<PermissionLevel> {
        self.user_permissions
            .get(name)
            .or_else(|| self.builtin_permissions.get(name))
            .copied()
    }

    /// Check that a user function named `name` could be added.
    pub fn check_definable(&self, name: &str) -> Result<(), EvalError> {
        if self.contains_builtin(name) {
            return Err(builtin_function_shadowed(name));
        }
        if self.contains_user(name) {
            return Err(duplicate_function(name));
        }
        Ok(())
    }

    /// Add a user function.
    pub fn define_function(
        &mut self,
        function: ScriptFunction,
        permission: PermissionLevel,
    ) -> Result<(), EvalError> {
        let name = function.name().to_string();
        if let Err(err) = self.check_definable(&name) {
            tracing::warn!(function = %name, error = %err, "function registration rejected");
            return Err(err);
        }
        tracing::debug!(function = %name, %permission, "user function defined");
        self.user_permissions.insert(name.clone(), permission);
        self.user.insert(name, function);
        Ok(())
    }

    /// Change the level required to call an existing function.
    ///
    /// Built-ins keep their slot; the new level goes into the user
    /// permission table, which lookups consult first.
    pub fn override_permission(
        &mut self,
        name: &str,
        permission: PermissionLevel,
    ) -> Result<(), EvalError> {
        if !self.contains_builtin(name) && !self.contains_user(name) {
            return Err(undefined_function(name));
        }
        tracing::debug!(function = name, %permission, "permission overridden");
        self.user_permissions.insert(name.to_string(), permission);
        Ok(())
    }

    /// Remove a user function. Built-ins cannot be removed.
    pub fn undefine_function(&mut self, name: &str) -> bool {
        if self.user.remove(name).is_some() {
            self.user_permissions.remove(name);
            true
        } else {
            false
        }
    }

    /// Remove every user function and every permission override.
    pub fn undefine_all(&mut self) {
        self.user.clear();
        self.user_permissions.clear();
    }

    pub fn builtin_functions(&self) -> impl Iterator<Item = &ScriptFunction> {
        self.builtins.values()
    }

    pub fn user_functions(&self) -> impl Iterator<Item = &ScriptFunction> {
        self.user.values()
    }
}
