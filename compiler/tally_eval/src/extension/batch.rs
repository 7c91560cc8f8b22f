//! Pending extension exports.

use tally_value::errors::{duplicate_dice, duplicate_function};
use tally_value::{DataType, EvalError};

use super::ExtensionHandle;
use crate::dice::{Dice, DicePattern, ExtensionDice};
use crate::functions::{FunctionDefinition, Parameter, PermissionLevel, ScriptFunction};
use crate::registry::Registry;

/// Names registered by one batch, in export order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistrationSummary {
    pub functions: Vec<String>,
    pub dice: Vec<String>,
}

/// Functions and dice exported by one batch, not yet registered.
#[derive(Debug, Default)]
pub struct ExportBatch {
    functions: Vec<(ScriptFunction, PermissionLevel)>,
    dice: Vec<Dice>,
}

impl ExportBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a function export.
    ///
    /// Type and permission names parse case-insensitively.
    pub fn export_function(
        &mut self,
        name: &str,
        params: Vec<Parameter>,
        return_type: &str,
        handle: ExtensionHandle,
        permission: &str,
    ) -> Result<(), EvalError> {
        let return_type: DataType = return_type.parse()?;
        let permission: PermissionLevel = permission.parse()?;
        let definition = FunctionDefinition::new(name, params, return_type);
        definition.validate()?;
        if self.functions.iter().any(|(f, _)| f.name() == name) {
            return Err(duplicate_function(name));
        }
        self.functions
            .push((ScriptFunction::extension(definition, handle), permission));
        Ok(())
    }

    /// Record a dice export with notation `template`.
    pub fn export_dice(
        &mut self,
        name: &str,
        template: &str,
        handle: ExtensionHandle,
        case_insensitive: bool,
    ) -> Result<(), EvalError> {
        let pattern = DicePattern::new(template, case_insensitive)?;
        if self.dice.iter().any(|dice| dice.name() == name) {
            return Err(duplicate_dice(name));
        }
        self.dice
            .push(Dice::Extension(ExtensionDice::new(name, pattern, handle)));
        Ok(())
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(|(function, _)| function.name())
    }

    pub fn dice_names(&self) -> impl Iterator<Item = &str> {
        self.dice.iter().map(Dice::name)
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.dice.is_empty()
    }

    /// Add every export to `registry`, or none of them.
    pub fn merge_into(self, registry: &mut Registry) -> Result<RegistrationSummary, EvalError> {
        for (function, _) in &self.functions {
            if let Err(err) = registry.functions().check_definable(function.name()) {
                tracing::warn!(function = function.name(), error = %err, "batch rejected");
                return Err(err);
            }
        }
        for dice in &self.dice {
            if registry.dice().contains(dice.name()) {
                tracing::warn!(dice = dice.name(), "batch rejected");
                return Err(duplicate_dice(dice.name()));
            }
        }

        let mut summary = RegistrationSummary::default();
        for (function, permission) in self.functions {
            summary.functions.push(function.name().to_string());
            registry.functions_mut().define_function(function, permission)?;
        }
        for dice in self.dice {
            summary.dice.push(dice.name().to_string());
            registry.dice_mut().add_user_dice(dice)?;
        }
        Ok(summary)
    }
}
