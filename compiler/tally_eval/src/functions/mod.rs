//! Script-callable functions.
//!
//! # Architecture
//!
//! - `FunctionDefinition` / `Parameter`: signatures and positional binding
//! - `ScriptFunction`: a definition plus its body (built-in fn pointer or
//!   extension handle)
//! - `FunctionRegistry`: built-in and user tables with permission levels
//! - `builtins`: the fixed built-in list

mod builtins;
mod definition;
mod permission;
mod registry;

pub use definition::{FunctionDefinition, Parameter};
pub use permission::PermissionLevel;
pub use registry::FunctionRegistry;

use tally_value::errors::function_failed;
use tally_value::{Dictionary, EvalResult};

use crate::context::ScriptContext;
use crate::extension::ExtensionHandle;

/// Signature of a built-in function body.
pub type BuiltinFn = fn(&mut ScriptContext, &Dictionary) -> EvalResult;

#[derive(Clone, Debug)]
pub enum FunctionBody {
    Builtin(BuiltinFn),
    Extension(ExtensionHandle),
}

/// A named, typed callable.
#[derive(Clone, Debug)]
pub struct ScriptFunction {
    definition: FunctionDefinition,
    body: FunctionBody,
}

impl ScriptFunction {
    pub fn builtin(definition: FunctionDefinition, body: BuiltinFn) -> Self {
        ScriptFunction {
            definition,
            body: FunctionBody::Builtin(body),
        }
    }

    pub fn extension(definition: FunctionDefinition, handle: ExtensionHandle) -> Self {
        ScriptFunction {
            definition,
            body: FunctionBody::Extension(handle),
        }
    }

    pub fn definition(&self) -> &FunctionDefinition {
        &self.definition
    }

    pub fn name(&self) -> &str {
        self.definition.name()
    }

    pub fn body(&self) -> &FunctionBody {
        &self.body
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.body, FunctionBody::Builtin(_))
    }

    /// Run the body on already-bound arguments and coerce the result to the
    /// declared return type. Extension failures are wrapped with this
    /// function's name; built-in failures pass through unchanged.
    pub fn invoke(&self, context: &mut ScriptContext, args: &Dictionary) -> EvalResult {
        let value = match &self.body {
            FunctionBody::Builtin(body) => body(context, args)?,
            FunctionBody::Extension(handle) => handle
                .call(context, args)
                .map_err(|err| function_failed(self.name(), err))?,
        };
        self.definition.return_type().coerce(value)
    }
}
