//! Tree evaluation.
//!
//! `ScriptContext::evaluate` walks a `Node` with one exhaustive match.
//! Errors raised below a node without a location pick up that node's span
//! on the way out.

mod call;

use tally_ir::{AssignTarget, Literal, Node, Script};
use tally_value::{evaluate_binary, evaluate_unary, DataValue, EvalResult};

use crate::context::ScriptContext;

impl ScriptContext {
    /// Evaluate a parsed script: declare its rolls, then run its statements.
    ///
    /// The result is always a List with one entry per statement (List-valued
    /// statements flatten into it).
    #[tracing::instrument(level = "debug", skip_all, fields(statements = script.statement_count()))]
    pub fn evaluate_script(&mut self, script: &Script) -> EvalResult {
        for declaration in script.rolls() {
            self.symbols_mut()
                .declare_roll(declaration.name.clone(), declaration.expression.clone());
        }
        self.evaluate(script.root())
    }

    pub fn evaluate(&mut self, node: &Node) -> EvalResult {
        match node {
            Node::Sequence(children) => self.eval_sequence(children),
            Node::Literal { value, .. } => Ok(eval_literal(value)),
            Node::Variable { name, span } => self.variable(name).map_err(|e| e.with_span(*span)),
            Node::Property { name, span } => self.property(name).map_err(|e| e.with_span(*span)),
            Node::Roll { name, span } => self.eval_roll(name).map_err(|e| e.with_span(*span)),
            Node::RollRef { name, span } => {
                self.roll_result(name).map_err(|e| e.with_span(*span))
            }
            Node::Assign {
                target,
                value,
                span,
            } => {
                let value = self.evaluate(value).map_err(|e| e.with_span(*span))?;
                self.assign(target, value.clone());
                Ok(value)
            }
            Node::Unary { op, operand, span } => {
                let operand = self.evaluate(operand)?;
                evaluate_unary(&operand, *op).map_err(|e| e.with_span(*span))
            }
            Node::Binary {
                op,
                left,
                right,
                span,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                evaluate_binary(&left, &right, *op).map_err(|e| e.with_span(*span))
            }
            Node::Call { name, args, span } => {
                let args = args
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                self.call_function(name, args)
                    .map_err(|e| e.with_span(*span))
            }
        }
    }

    /// Collect statement results the way List `add` flattens them. A
    /// Dictionary statement is kept as one item instead of failing.
    fn eval_sequence(&mut self, children: &[Node]) -> EvalResult {
        let mut results = Vec::with_capacity(children.len());
        for child in children {
            let value = self.evaluate(child)?;
            match value.items() {
                Some(items) => results.extend_from_slice(items),
                None => results.push(value),
            }
        }
        Ok(DataValue::list(results))
    }

    /// Resolve roll `name` and record the value under that name.
    fn eval_roll(&mut self, name: &str) -> EvalResult {
        let value = self.resolve_roll(name)?;
        self.symbols_mut().add_roll_result(name, value.clone());
        Ok(value)
    }

    fn assign(&mut self, target: &AssignTarget, value: DataValue) {
        let symbols = self.symbols_mut();
        match target {
            AssignTarget::Variable(name) => symbols.set_variable(name.as_str(), value),
            AssignTarget::Property(name) => symbols.set_property(name.as_str(), value),
            AssignTarget::Roll(name) => symbols.add_roll_result(name.as_str(), value),
        }
    }
}

fn eval_literal(literal: &Literal) -> DataValue {
    match literal {
        Literal::Long(n) => DataValue::long(*n),
        Literal::Double(d) => DataValue::double(*d),
        Literal::String(s) => DataValue::string(s.as_str()),
    }
}
