//! Unary operator implementations.
//!
//! Only negation exists, and only numbers can be negated.

use tally_ir::UnaryOp;

use crate::errors::{integer_overflow, not_numeric, EvalResult};
use crate::value::{DataValue, ValueKind};

/// Evaluate a unary operation. A Result operand negates its primary value.
pub fn evaluate_unary(value: &DataValue, op: UnaryOp) -> EvalResult {
    let operand = value.primary();
    match (operand.kind(), op) {
        (ValueKind::Long(n), UnaryOp::Neg) => n
            .checked_neg()
            .map(DataValue::long)
            .ok_or_else(|| integer_overflow("negation")),
        (ValueKind::Double(d), UnaryOp::Neg) => Ok(DataValue::double(-d)),
        (_, UnaryOp::Neg) => Err(not_numeric(operand.type_name())),
    }
}

impl DataValue {
    pub fn negate(&self) -> EvalResult {
        evaluate_unary(self, UnaryOp::Neg)
    }
}
