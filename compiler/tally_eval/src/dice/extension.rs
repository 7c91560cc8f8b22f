//! Dice backed by an extension callable.

use tally_ir::RollExpression;
use tally_value::{DataType, DataValue, Dictionary, EvalNote, EvalResult};

use super::DicePattern;
use crate::context::ScriptContext;
use crate::extension::ExtensionHandle;
use crate::functions::{FunctionDefinition, Parameter, ScriptFunction};

/// Argument carrying whether the roll asked for verbose output (Long 1/0).
pub const VERBOSE_FLAG: &str = "__verbose";
/// Argument carrying whether the roll asked for a summed total (Long 1/0).
pub const SUMMED_FLAG: &str = "__summed";

/// A user notation. Rolling hands the pattern arguments to the callable.
#[derive(Clone, Debug)]
pub struct ExtensionDice {
    name: String,
    pattern: DicePattern,
    function: ScriptFunction,
}

impl ExtensionDice {
    /// The callable is wrapped in a `Dice Roll(<name>)` function taking
    /// one Double per pattern argument and returning a `Result`.
    pub fn new(name: impl Into<String>, pattern: DicePattern, handle: ExtensionHandle) -> Self {
        let name = name.into();
        let params = pattern
            .arg_names()
            .map(|arg| Parameter::new(arg, DataType::Double))
            .collect();
        let definition =
            FunctionDefinition::new(format!("Dice Roll({name})"), params, DataType::Result);
        ExtensionDice {
            name,
            pattern,
            function: ScriptFunction::extension(definition, handle),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &DicePattern {
        &self.pattern
    }

    pub fn function(&self) -> &ScriptFunction {
        &self.function
    }

    pub fn roll(&self, context: &mut ScriptContext, expression: &RollExpression) -> EvalResult {
        let notation = expression.notation();
        let extracted = self.pattern.extract_args(notation)?;

        let mut args = Dictionary::new();
        for param in self.function.definition().parameters() {
            if let Some(value) = extracted.get(&param.name) {
                args.insert(
                    param.name.clone(),
                    param.data_type.coerce(DataValue::long(value))?,
                );
            }
        }
        args.insert(
            VERBOSE_FLAG.to_string(),
            DataValue::boolean(expression.is_verbose()),
        );
        args.insert(
            SUMMED_FLAG.to_string(),
            DataValue::boolean(expression.is_sum()),
        );

        self.function.invoke(context, &args).map_err(|err| {
            err.with_note(EvalNote::new(format!(
                "while rolling {notation} with {}",
                self.name
            )))
        })
    }
}
