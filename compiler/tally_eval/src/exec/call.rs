//! Function calls from scripts.

use tally_value::errors::{permission_denied, undefined_function};
use tally_value::{DataValue, EvalResult};

use crate::context::ScriptContext;

impl ScriptContext {
    /// Call function `name` with positional `args`.
    ///
    /// Resolution checks built-ins first, then user functions. The caller's
    /// permission must reach the callee's level. The function is cloned out
    /// of the registry before it runs.
    #[tracing::instrument(level = "debug", skip(self, args), fields(args = args.len()))]
    pub fn call_function(&mut self, name: &str, args: Vec<DataValue>) -> EvalResult {
        let (function, required) = self
            .registry()
            .function_for_call(name)
            .ok_or_else(|| undefined_function(name))?;

        if !self.permission().allows(required) {
            tracing::warn!(
                function = name,
                caller = %self.permission(),
                %required,
                "call refused"
            );
            return Err(permission_denied(name, required.name()));
        }

        tracing::debug!(function = name, builtin = function.is_builtin(), "function resolved");
        let bound = function.definition().bind(args)?;
        function.invoke(self, &bound)
    }
}
