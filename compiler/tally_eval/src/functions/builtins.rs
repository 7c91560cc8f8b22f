//! The built-in function list.

use std::cmp::Ordering;

use tally_value::errors::{integer_overflow, not_numeric, wrong_arg_count};
use tally_value::{DataType, DataValue, Dictionary, EvalError, EvalResult, ValueKind};

use super::{BuiltinFn, FunctionDefinition, Parameter, PermissionLevel, ScriptFunction};
use crate::context::ScriptContext;
use crate::dice::StandardDice;

/// Every built-in with the level required to call it.
pub(super) fn builtin_functions() -> Vec<(ScriptFunction, PermissionLevel)> {
    let items = || vec![Parameter::variadic("items", DataType::Any)];
    let values = || vec![Parameter::variadic("values", DataType::Any)];
    let one = |name: &str, data_type| vec![Parameter::new(name, data_type)];

    vec![
        builtin("list", items(), DataType::List, list),
        builtin("list.create", items(), DataType::List, list),
        builtin("list.size", one("list", DataType::List), DataType::Long, list_size),
        builtin("list.sum", values(), DataType::Any, list_sum),
        builtin(
            "list.shuffle",
            one("list", DataType::List),
            DataType::List,
            list_shuffle,
        ),
        builtin(
            "dict",
            vec![Parameter::variadic("pairs", DataType::Any)],
            DataType::Dictionary,
            dict,
        ),
        builtin(
            "result.value",
            one("roll", DataType::Result),
            DataType::Any,
            result_value,
        ),
        builtin(
            "result.details",
            one("roll", DataType::Result),
            DataType::String,
            result_details,
        ),
        builtin(
            "result.rolls",
            one("roll", DataType::Result),
            DataType::List,
            result_rolls,
        ),
        builtin("long", one("value", DataType::Long), DataType::Long, identity),
        builtin("double", one("value", DataType::Double), DataType::Double, identity),
        builtin("string", one("value", DataType::String), DataType::String, identity),
        builtin("abs", one("value", DataType::Any), DataType::Any, abs),
        builtin("max", values(), DataType::Any, max),
        builtin("min", values(), DataType::Any, min),
        builtin(
            "roll",
            vec![
                Parameter::new("number", DataType::Long),
                Parameter::new("sides", DataType::Long),
            ],
            DataType::Result,
            roll,
        ),
    ]
}

fn builtin(
    name: &str,
    params: Vec<Parameter>,
    return_type: DataType,
    body: BuiltinFn,
) -> (ScriptFunction, PermissionLevel) {
    let definition = FunctionDefinition::new(name, params, return_type);
    (ScriptFunction::builtin(definition, body), PermissionLevel::Player)
}

/// Bound argument `name`. Binding always fills every parameter.
fn arg<'a>(args: &'a Dictionary, name: &str) -> Result<&'a DataValue, EvalError> {
    args.get(name)
        .ok_or_else(|| EvalError::new(format!("missing argument {name}")))
}

/// Items of a variadic argument, with List items flattened one level.
fn flattened(args: &Dictionary, name: &str) -> Result<Vec<DataValue>, EvalError> {
    Ok(arg(args, name)?
        .as_list()
        .iter()
        .flat_map(DataValue::as_list)
        .collect())
}

fn list(_: &mut ScriptContext, args: &Dictionary) -> EvalResult {
    arg(args, "items").cloned()
}

fn list_size(_: &mut ScriptContext, args: &Dictionary) -> EvalResult {
    let size = arg(args, "list")?.as_list().len();
    i64::try_from(size)
        .map(DataValue::long)
        .map_err(|_| integer_overflow("list.size"))
}

fn list_sum(_: &mut ScriptContext, args: &Dictionary) -> EvalResult {
    let mut total = DataValue::long(0);
    for item in flattened(args, "values")? {
        let value = item.primary();
        if !value.is_numeric() {
            return Err(not_numeric(value.type_name()));
        }
        total = total.add(value)?;
    }
    Ok(total)
}

fn list_shuffle(context: &mut ScriptContext, args: &Dictionary) -> EvalResult {
    let mut items = arg(args, "list")?.as_list();
    context.random().shuffle(&mut items);
    Ok(DataValue::list(items))
}

fn dict(_: &mut ScriptContext, args: &Dictionary) -> EvalResult {
    let pairs = arg(args, "pairs")?.as_list();
    if pairs.len() % 2 != 0 {
        return Err(wrong_arg_count("dict", pairs.len() + 1, pairs.len()));
    }
    let entries: Dictionary = pairs
        .chunks_exact(2)
        .map(|pair| (pair[0].as_string(), pair[1].clone()))
        .collect();
    Ok(DataValue::dictionary(entries))
}

fn result_value(_: &mut ScriptContext, args: &Dictionary) -> EvalResult {
    Ok(arg(args, "roll")?.as_result().value().clone())
}

fn result_details(_: &mut ScriptContext, args: &Dictionary) -> EvalResult {
    Ok(DataValue::string(arg(args, "roll")?.as_result().details()))
}

fn result_rolls(_: &mut ScriptContext, args: &Dictionary) -> EvalResult {
    let roll = arg(args, "roll")?.as_result();
    Ok(DataValue::list(roll.individual_values().to_vec()))
}

/// Conversion happens while binding; the body returns the coerced value.
fn identity(_: &mut ScriptContext, args: &Dictionary) -> EvalResult {
    arg(args, "value").cloned()
}

fn abs(_: &mut ScriptContext, args: &Dictionary) -> EvalResult {
    let value = arg(args, "value")?.primary();
    match value.kind() {
        ValueKind::Long(n) => n
            .checked_abs()
            .map(DataValue::long)
            .ok_or_else(|| integer_overflow("abs")),
        ValueKind::Double(d) => Ok(DataValue::double(d.abs())),
        _ => Err(not_numeric(value.type_name())),
    }
}

fn max(_: &mut ScriptContext, args: &Dictionary) -> EvalResult {
    extreme(args, "max", Ordering::Greater)
}

fn min(_: &mut ScriptContext, args: &Dictionary) -> EvalResult {
    extreme(args, "min", Ordering::Less)
}

/// The first item whose numeric value compares `wanted` against all others.
fn extreme(args: &Dictionary, name: &str, wanted: Ordering) -> EvalResult {
    let mut best: Option<(f64, DataValue)> = None;
    for item in flattened(args, "values")? {
        let value = item.primary().clone();
        let number = value.as_double()?;
        let replace = match &best {
            Some((current, _)) => number.total_cmp(current) == wanted,
            None => true,
        };
        if replace {
            best = Some((number, value));
        }
    }
    best.map(|(_, value)| value)
        .ok_or_else(|| wrong_arg_count(name, 1, 0))
}

fn roll(context: &mut ScriptContext, args: &Dictionary) -> EvalResult {
    let number = arg(args, "number")?.as_long()?;
    let sides = arg(args, "sides")?.as_long()?;
    StandardDice::roll_values(context.random(), number, sides, false, true)
}
