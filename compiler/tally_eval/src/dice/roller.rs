//! Dice dispatch.

use tally_ir::RollExpression;
use tally_value::errors::{duplicate_dice, unknown_dice_pattern};
use tally_value::{EvalError, EvalResult};

use super::{Dice, StandardDice};
use crate::context::ScriptContext;

/// Built-in and user dice, each tier kept in registration order.
#[derive(Clone, Debug, Default)]
pub struct DiceRoller {
    builtin: Vec<Dice>,
    user: Vec<Dice>,
}

impl DiceRoller {
    /// A roller with no dice at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// A roller holding the built-in dice.
    pub fn with_builtins() -> Result<Self, EvalError> {
        Ok(DiceRoller {
            builtin: vec![Dice::Standard(StandardDice::new()?)],
            user: Vec::new(),
        })
    }

    /// The first dice matching `expression`: user tier, then built-in.
    pub fn find(&self, expression: &RollExpression) -> Option<&Dice> {
        self.user
            .iter()
            .chain(&self.builtin)
            .find(|dice| dice.matches(expression))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.user.iter().chain(&self.builtin).any(|dice| dice.name() == name)
    }

    /// Append a user dice. Names are unique across both tiers.
    pub fn add_user_dice(&mut self, dice: Dice) -> Result<(), EvalError> {
        if self.contains(dice.name()) {
            tracing::warn!(dice = dice.name(), "dice registration rejected");
            return Err(duplicate_dice(dice.name()));
        }
        tracing::debug!(dice = dice.name(), template = dice.pattern().template(), "user dice added");
        self.user.push(dice);
        Ok(())
    }

    pub fn remove_user_dice(&mut self, name: &str) -> bool {
        let before = self.user.len();
        self.user.retain(|dice| dice.name() != name);
        self.user.len() != before
    }

    pub fn clear_user_dice(&mut self) {
        self.user.clear();
    }

    pub fn builtin_dice(&self) -> &[Dice] {
        &self.builtin
    }

    pub fn user_dice(&self) -> &[Dice] {
        &self.user
    }
}

/// Roll `expression` with the first matching dice in the context's registry.
///
/// The dice is cloned out of the registry before rolling, so extension
/// callables never run under the registry lock.
#[tracing::instrument(level = "debug", skip_all, fields(notation = expression.notation()))]
pub fn roll_expression(context: &mut ScriptContext, expression: &RollExpression) -> EvalResult {
    let Some(dice) = context.registry().dice_for(expression) else {
        return Err(unknown_dice_pattern(expression.notation()));
    };
    tracing::debug!(dice = dice.name(), "dice matched");
    dice.roll(context, expression)
}
