//! `NdS` dice.

use tally_ir::RollExpression;
use tally_value::errors::{integer_overflow, unknown_dice_pattern};
use tally_value::{DataValue, EvalError, EvalResult, RollResult};

use super::DicePattern;
use crate::random::RandomSource;

pub const STANDARD_DICE_NAME: &str = "Standard Dice";
pub const STANDARD_DICE_TEMPLATE: &str = "#{number:1}d#{sides}";

/// The built-in `NdS` notation: `number` (default 1) dice of `sides` sides.
#[derive(Clone, Debug)]
pub struct StandardDice {
    pattern: DicePattern,
}

impl StandardDice {
    pub fn new() -> Result<Self, EvalError> {
        Ok(StandardDice {
            pattern: DicePattern::new(STANDARD_DICE_TEMPLATE, true)?,
        })
    }

    pub fn pattern(&self) -> &DicePattern {
        &self.pattern
    }

    pub fn roll(&self, random: &RandomSource, expression: &RollExpression) -> EvalResult {
        let notation = expression.notation();
        let args = self.pattern.extract_args(notation)?;
        let sides = args
            .get("sides")
            .ok_or_else(|| unknown_dice_pattern(notation))?;
        let number = args.get("number").unwrap_or(1);
        Self::roll_values(
            random,
            number,
            sides,
            expression.is_verbose(),
            expression.is_sum(),
        )
    }

    /// Roll `number` dice of `sides` sides into a `Result`.
    ///
    /// The primary value is the list of rolls when `verbose && !sum`, the
    /// Long total otherwise. Details and individual values are always set.
    pub fn roll_values(
        random: &RandomSource,
        number: i64,
        sides: i64,
        verbose: bool,
        sum: bool,
    ) -> EvalResult {
        let rolls = random.roll_dice(number, sides)?;
        let total = rolls
            .iter()
            .try_fold(0i64, |acc, roll| acc.checked_add(*roll))
            .ok_or_else(|| integer_overflow("dice total"))?;
        let details = rolls
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let individual: Vec<DataValue> = rolls.into_iter().map(DataValue::long).collect();

        let value = if verbose && !sum {
            DataValue::list(individual.clone())
        } else {
            DataValue::long(total)
        };
        Ok(DataValue::result(
            RollResult::new(value)
                .with_details(details)
                .with_individual_values(individual),
        ))
    }
}
