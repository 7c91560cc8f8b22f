//! Dice notations and the roller that dispatches between them.
//!
//! # Architecture
//!
//! - `DicePattern`: a compiled notation template
//! - `Dice`: the closed set of dice kinds (`StandardDice`, `ExtensionDice`)
//! - `DiceRoller`: built-in and user tiers, first match wins

mod extension;
mod pattern;
mod roller;
mod standard;

pub use extension::{ExtensionDice, SUMMED_FLAG, VERBOSE_FLAG};
pub use pattern::{DiceArgs, DicePattern, PatternArg};
pub use roller::{roll_expression, DiceRoller};
pub use standard::{StandardDice, STANDARD_DICE_NAME, STANDARD_DICE_TEMPLATE};

use tally_ir::RollExpression;
use tally_value::EvalResult;

use crate::context::ScriptContext;

#[derive(Clone, Debug)]
pub enum Dice {
    Standard(StandardDice),
    Extension(ExtensionDice),
}

impl Dice {
    pub fn name(&self) -> &str {
        match self {
            Dice::Standard(_) => STANDARD_DICE_NAME,
            Dice::Extension(dice) => dice.name(),
        }
    }

    pub fn pattern(&self) -> &DicePattern {
        match self {
            Dice::Standard(dice) => dice.pattern(),
            Dice::Extension(dice) => dice.pattern(),
        }
    }

    pub fn matches(&self, expression: &RollExpression) -> bool {
        self.pattern().matches(expression.notation())
    }

    pub fn roll(&self, context: &mut ScriptContext, expression: &RollExpression) -> EvalResult {
        match self {
            Dice::Standard(dice) => dice.roll(context.random(), expression),
            Dice::Extension(dice) => dice.roll(context, expression),
        }
    }
}

impl From<StandardDice> for Dice {
    fn from(dice: StandardDice) -> Self {
        Dice::Standard(dice)
    }
}

impl From<ExtensionDice> for Dice {
    fn from(dice: ExtensionDice) -> Self {
        Dice::Extension(dice)
    }
}

#[cfg(test)]
mod tests;
