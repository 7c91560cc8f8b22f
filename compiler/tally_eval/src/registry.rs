//! The function and dice registry shared by every session.

use tally_value::EvalError;

use crate::dice::DiceRoller;
use crate::functions::FunctionRegistry;
pub use crate::shared::SharedScriptRegistry;

#[derive(Clone, Debug, Default)]
pub struct Registry {
    functions: FunctionRegistry,
    dice: DiceRoller,
}

impl Registry {
    /// A registry holding the built-in functions and dice.
    pub fn with_builtins() -> Result<Self, EvalError> {
        Ok(Registry {
            functions: FunctionRegistry::with_builtins(),
            dice: DiceRoller::with_builtins()?,
        })
    }

    /// Wrap in a shared handle.
    pub fn shared(self) -> SharedScriptRegistry {
        SharedScriptRegistry::new(self)
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn functions_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.functions
    }

    pub fn dice(&self) -> &DiceRoller {
        &self.dice
    }

    pub fn dice_mut(&mut self) -> &mut DiceRoller {
        &mut self.dice
    }

    /// Drop every user function, permission override and user dice.
    pub fn clear_user_definitions(&mut self) {
        tracing::debug!("clearing user definitions");
        self.functions.undefine_all();
        self.dice.clear_user_dice();
    }
}
