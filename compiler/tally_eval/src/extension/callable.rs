//! Host callables behind extension functions and dice.

use std::fmt;
use std::sync::Arc;

use tally_value::{Dictionary, EvalResult};

use crate::context::ScriptContext;

/// Something an extension engine hands back for the core to invoke.
///
/// Arguments arrive by parameter name. Dice callables also receive the
/// `__verbose` and `__summed` flags.
pub trait ExtensionCallable: Send + Sync {
    fn call(&self, context: &mut ScriptContext, args: &Dictionary) -> EvalResult;
}

impl<F> ExtensionCallable for F
where
    F: Fn(&mut ScriptContext, &Dictionary) -> EvalResult + Send + Sync,
{
    fn call(&self, context: &mut ScriptContext, args: &Dictionary) -> EvalResult {
        self(context, args)
    }
}

/// Cheaply clonable handle to a callable.
#[derive(Clone)]
pub struct ExtensionHandle(Arc<dyn ExtensionCallable>);

impl ExtensionHandle {
    pub fn new(callable: impl ExtensionCallable + 'static) -> Self {
        ExtensionHandle(Arc::new(callable))
    }

    /// Wrap a closure. Its argument and return types are inferred.
    pub fn from_fn<F>(callable: F) -> Self
    where
        F: Fn(&mut ScriptContext, &Dictionary) -> EvalResult + Send + Sync + 'static,
    {
        ExtensionHandle(Arc::new(callable))
    }

    pub fn call(&self, context: &mut ScriptContext, args: &Dictionary) -> EvalResult {
        self.0.call(context, args)
    }
}

impl fmt::Debug for ExtensionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExtensionHandle(..)")
    }
}
