//! Binary operator implementations.
//!
//! Provides direct enum-based dispatch for binary operations. The value set
//! is closed, so pattern matching is preferred over trait objects for
//! exhaustiveness checking.
//!
//! # Rules
//!
//! - Long op Long stays integral (truncating division, truncated remainder,
//!   `pow` truncated back to Long); any Double operand promotes to Double.
//! - `+` concatenates text when a String is involved and flattens when a List
//!   is involved (see `eval_add` for the precedence).
//! - `*` of a number and a String repeats the text `trunc(n)` times.
//! - Text built by `+` or `*` is at most `MAX_STRING_LEN` bytes.
//! - `-` of two Strings removes every occurrence of the right operand.
//! - A Dictionary operand is never valid.
//! - A Result operand takes part through its primary value.

use tally_ir::BinaryOp;

use crate::errors::{
    division_by_zero, integer_overflow, modulo_by_zero, not_numeric, string_too_long, EvalResult,
};
use crate::value::{long_to_double, DataValue, ValueKind};

/// Longest text, in bytes, that string concatenation or repetition may build.
pub const MAX_STRING_LEN: usize = 1 << 24;

// Helper functions for checked Long arithmetic

/// Checked arithmetic with overflow handling.
#[inline]
fn checked_arith(result: Option<i64>, op: BinaryOp) -> EvalResult {
    result
        .map(DataValue::long)
        .ok_or_else(|| integer_overflow(op.operation_name()))
}

/// Checked division with zero guard.
#[inline]
fn checked_div<F>(is_zero: bool, op_fn: F, op: BinaryOp) -> EvalResult
where
    F: FnOnce() -> Option<i64>,
{
    if is_zero {
        Err(division_by_zero())
    } else {
        checked_arith(op_fn(), op)
    }
}

/// Checked remainder with zero guard.
#[inline]
fn checked_mod<F>(is_zero: bool, op_fn: F, op: BinaryOp) -> EvalResult
where
    F: FnOnce() -> Option<i64>,
{
    if is_zero {
        Err(modulo_by_zero())
    } else {
        checked_arith(op_fn(), op)
    }
}

/// Evaluate a binary operation.
pub fn evaluate_binary(left: &DataValue, right: &DataValue, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => eval_add(left, right),
        BinaryOp::Sub => eval_subtract(left.primary(), right.primary()),
        BinaryOp::Mul => eval_multiply(left.primary(), right.primary()),
        BinaryOp::Div | BinaryOp::Mod | BinaryOp::Pow => {
            eval_numeric(left.primary(), right.primary(), op)
        }
    }
}

/// Addition.
///
/// Precedence: a Dictionary operand fails; a List on the left flattens; a
/// String on the left concatenates; otherwise the right operand decides
/// (String concatenates, List flattens), and two numbers add.
fn eval_add(left: &DataValue, right: &DataValue) -> EvalResult {
    match (left.kind(), right.kind()) {
        (ValueKind::Dictionary(_), _) | (_, ValueKind::Dictionary(_)) => {
            Err(not_numeric("dictionary"))
        }
        (ValueKind::List(_), _) | (ValueKind::Result(_), ValueKind::List(_)) => {
            Ok(concat_lists(left, right))
        }
        (ValueKind::String(text), _) => concat_text(text, &right.as_string()),
        (ValueKind::Result(_), _) => eval_add(left.primary(), right),
        (_, ValueKind::String(text)) => concat_text(&left.as_string(), text),
        (_, ValueKind::List(_)) => Ok(concat_lists(left, right)),
        (_, ValueKind::Result(_)) => eval_add(left, right.primary()),
        (ValueKind::Long(_) | ValueKind::Double(_), ValueKind::Long(_) | ValueKind::Double(_)) => {
            eval_numeric(left, right, BinaryOp::Add)
        }
    }
}

fn concat_text(left: &str, right: &str) -> EvalResult {
    let length = left.len().saturating_add(right.len());
    if length > MAX_STRING_LEN {
        return Err(string_too_long(length, MAX_STRING_LEN));
    }
    let mut text = String::with_capacity(length);
    text.push_str(left);
    text.push_str(right);
    Ok(DataValue::string(text))
}

/// Both sides through their list view. Results stay intact as items.
fn concat_lists(left: &DataValue, right: &DataValue) -> DataValue {
    let mut items = left.as_list();
    items.extend(right.as_list());
    DataValue::list(items)
}

fn eval_subtract(left: &DataValue, right: &DataValue) -> EvalResult {
    match (left.kind(), right.kind()) {
        (ValueKind::String(text), ValueKind::String(pattern)) => {
            Ok(DataValue::string(text.replace(pattern.as_str(), "")))
        }
        _ => eval_numeric(left, right, BinaryOp::Sub),
    }
}

fn eval_multiply(left: &DataValue, right: &DataValue) -> EvalResult {
    match (left.kind(), right.kind()) {
        (ValueKind::String(text), ValueKind::Long(_) | ValueKind::Double(_)) => {
            repeat_text(text, right)
        }
        (ValueKind::Long(_) | ValueKind::Double(_), ValueKind::String(text)) => {
            repeat_text(text, left)
        }
        _ => eval_numeric(left, right, BinaryOp::Mul),
    }
}

/// Repeat `text` by the truncated magnitude of `count`; negative counts
/// produce the empty string.
fn repeat_text(text: &str, count: &DataValue) -> EvalResult {
    let times = usize::try_from(count.as_long()?).unwrap_or(0);
    let length = text.len().saturating_mul(times);
    if length > MAX_STRING_LEN {
        return Err(string_too_long(length, MAX_STRING_LEN));
    }
    Ok(DataValue::string(text.repeat(times)))
}

/// Arithmetic on two numeric operands; anything else is a type error
/// naming the offending operand.
fn eval_numeric(left: &DataValue, right: &DataValue, op: BinaryOp) -> EvalResult {
    match (left.kind(), right.kind()) {
        (ValueKind::Long(a), ValueKind::Long(b)) => eval_long_binary(*a, *b, op),
        (ValueKind::Long(a), ValueKind::Double(b)) => {
            Ok(eval_double_binary(long_to_double(*a), *b, op))
        }
        (ValueKind::Double(a), ValueKind::Long(b)) => {
            Ok(eval_double_binary(*a, long_to_double(*b), op))
        }
        (ValueKind::Double(a), ValueKind::Double(b)) => Ok(eval_double_binary(*a, *b, op)),
        (ValueKind::Dictionary(_), _) | (_, ValueKind::Dictionary(_)) => {
            Err(not_numeric("dictionary"))
        }
        (ValueKind::Long(_) | ValueKind::Double(_), _) => Err(not_numeric(right.type_name())),
        _ => Err(not_numeric(left.type_name())),
    }
}

/// Binary operations on two Longs.
fn eval_long_binary(a: i64, b: i64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => checked_arith(a.checked_add(b), op),
        BinaryOp::Sub => checked_arith(a.checked_sub(b), op),
        BinaryOp::Mul => checked_arith(a.checked_mul(b), op),
        BinaryOp::Div => checked_div(b == 0, || a.checked_div(b), op),
        BinaryOp::Mod => checked_mod(b == 0, || a.checked_rem(b), op),
        BinaryOp::Pow => long_power(a, b),
    }
}

/// Long `^`. Exact while the result fits; a negative exponent truncates
/// `1 / base^-exponent` toward zero.
fn long_power(base: i64, exponent: i64) -> EvalResult {
    if let Ok(exponent) = u32::try_from(exponent) {
        return checked_arith(base.checked_pow(exponent), BinaryOp::Pow);
    }
    let negative = exponent < 0;
    match base {
        1 => Ok(DataValue::long(1)),
        -1 => Ok(DataValue::long(if exponent % 2 == 0 { 1 } else { -1 })),
        0 if !negative => Ok(DataValue::long(0)),
        _ if negative && base != 0 => Ok(DataValue::long(0)),
        _ => Err(integer_overflow(BinaryOp::Pow.operation_name())),
    }
}

/// Binary operations on Doubles. IEEE semantics, never fails.
fn eval_double_binary(a: f64, b: f64, op: BinaryOp) -> DataValue {
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Mod => a % b,
        BinaryOp::Pow => a.powf(b),
    };
    DataValue::double(result)
}

impl DataValue {
    pub fn add(&self, other: &DataValue) -> EvalResult {
        evaluate_binary(self, other, BinaryOp::Add)
    }

    pub fn subtract(&self, other: &DataValue) -> EvalResult {
        evaluate_binary(self, other, BinaryOp::Sub)
    }

    pub fn multiply(&self, other: &DataValue) -> EvalResult {
        evaluate_binary(self, other, BinaryOp::Mul)
    }

    pub fn divide(&self, other: &DataValue) -> EvalResult {
        evaluate_binary(self, other, BinaryOp::Div)
    }

    pub fn remainder(&self, other: &DataValue) -> EvalResult {
        evaluate_binary(self, other, BinaryOp::Mod)
    }

    pub fn power(&self, other: &DataValue) -> EvalResult {
        evaluate_binary(self, other, BinaryOp::Pow)
    }
}
