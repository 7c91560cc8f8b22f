//! Extension scripts written in Tally.
//!
//! Each non-blank line of a script defines one function or one dice:
//!
//! ```text
//! // comments and blank lines are skipped
//! function heal(amount: long, bonus: long) -> long [trusted] = $amount + $bonus + 1d4
//! function party(names...: string) = list.size($names)
//! dice Fudge "#{number:1}dF" = roll($number, 3) - 2 * $number
//! ```
//!
//! The return type defaults to `any` and the permission to `player`.
//! Bodies are parsed at registration. A call runs the body in a fresh
//! symbol table where each argument is a variable and the caller's
//! properties are visible; writes made by the body are discarded.
//! A body with one statement returns that statement's value, otherwise
//! the whole result list.

use std::sync::Arc;

use tally_eval::{
    ExportBatch, ExtensionEngine, ExtensionHandle, ExtensionScript, Parameter, ScriptContext,
    SymbolTable,
};
use tally_ir::Script;
use tally_parse::parse;
use tally_value::errors::invalid_definition;
use tally_value::{Dictionary, EvalError, EvalResult};

const DEFAULT_MAX_DEPTH: u32 = 32;

/// Runs Tally-language extension scripts.
#[derive(Clone, Debug)]
pub struct MacroEngine {
    max_depth: u32,
}

impl Default for MacroEngine {
    fn default() -> Self {
        MacroEngine {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl MacroEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit on nested macro calls, so self-recursive definitions fail
    /// instead of exhausting the stack.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn define_line(&self, line: &str, exports: &mut ExportBatch) -> Result<(), EvalError> {
        if let Some(rest) = line.strip_prefix("function ") {
            self.define_function(rest.trim(), exports)
        } else if let Some(rest) = line.strip_prefix("dice ") {
            self.define_dice(rest.trim(), exports)
        } else {
            Err(invalid_definition(
                line,
                "expected a `function` or `dice` definition",
            ))
        }
    }

    /// `name(params) [-> type] [[permission]] = body`
    fn define_function(&self, text: &str, exports: &mut ExportBatch) -> Result<(), EvalError> {
        let Some((header, body)) = text.split_once('=') else {
            return Err(invalid_definition(text, "missing `=` before the body"));
        };
        let Some((name, rest)) = header.split_once('(') else {
            return Err(invalid_definition(header.trim(), "missing parameter list"));
        };
        let name = name.trim();
        let Some((params, mut rest)) = rest.split_once(')') else {
            return Err(invalid_definition(name, "unclosed parameter list"));
        };

        let params = params
            .split(',')
            .map(str::trim)
            .filter(|param| !param.is_empty())
            .map(str::parse::<Parameter>)
            .collect::<Result<Vec<_>, _>>()?;

        let mut permission = "player";
        rest = rest.trim();
        if let Some(open) = rest.find('[') {
            let Some(close) = rest[open..].find(']') else {
                return Err(invalid_definition(name, "unclosed permission"));
            };
            permission = rest[open + 1..open + close].trim();
            rest = rest[..open].trim();
        }
        let return_type = match rest.strip_prefix("->") {
            Some(ty) => ty.trim(),
            None if rest.is_empty() => "any",
            None => return Err(invalid_definition(name, format!("unexpected {rest:?}"))),
        };

        let handle = self.compile(name, body)?;
        exports.export_function(name, params, return_type, handle, permission)
    }

    /// `Name "template" = body`
    fn define_dice(&self, text: &str, exports: &mut ExportBatch) -> Result<(), EvalError> {
        let Some((name, rest)) = text.split_once('"') else {
            return Err(invalid_definition(text, "missing quoted notation template"));
        };
        let name = name.trim();
        let Some((template, rest)) = rest.split_once('"') else {
            return Err(invalid_definition(name, "unclosed notation template"));
        };
        let Some(body) = rest.trim_start().strip_prefix('=') else {
            return Err(invalid_definition(name, "missing `=` before the body"));
        };
        if name.is_empty() {
            return Err(invalid_definition(template, "dice name is empty"));
        }

        let handle = self.compile(name, body)?;
        exports.export_dice(name, template, handle, true)
    }

    fn compile(&self, name: &str, body: &str) -> Result<ExtensionHandle, EvalError> {
        let script = parse(body).map_err(|err| invalid_definition(name, err.to_string()))?;
        if script.statement_count() == 0 {
            return Err(invalid_definition(name, "body is empty"));
        }
        let script = Arc::new(script);
        let max_depth = self.max_depth;
        Ok(ExtensionHandle::from_fn(move |context, args| {
            run_macro(context, &script, args, max_depth)
        }))
    }
}

impl ExtensionEngine for MacroEngine {
    #[tracing::instrument(level = "debug", skip_all, fields(scripts = scripts.len()))]
    fn run_batch(
        &mut self,
        scripts: &[ExtensionScript],
        exports: &mut ExportBatch,
    ) -> Result<(), EvalError> {
        for script in scripts {
            for line in script.body.lines().map(str::trim) {
                if line.is_empty() || line.starts_with("//") {
                    continue;
                }
                if let Err(err) = self.define_line(line, exports) {
                    tracing::warn!(script = %script.name, error = %err, "definition rejected");
                    return Err(err);
                }
            }
        }
        Ok(())
    }
}

fn run_macro(
    context: &mut ScriptContext,
    script: &Script,
    args: &Dictionary,
    max_depth: u32,
) -> EvalResult {
    if context.call_depth() >= max_depth {
        return Err(EvalError::new(format!(
            "macro calls nested deeper than {max_depth}"
        )));
    }

    let mut scope = SymbolTable::new();
    for (name, value) in context.symbols().properties() {
        scope.set_property(name, value.clone());
    }
    for (name, value) in args {
        scope.set_variable(name.clone(), value.clone());
    }

    let outer = std::mem::replace(context.symbols_mut(), scope);
    let result = context.nested_call(|context| context.evaluate_script(script));
    *context.symbols_mut() = outer;

    let results = result?;
    match results.items() {
        Some([single]) => Ok(single.clone()),
        _ => Ok(results),
    }
}
