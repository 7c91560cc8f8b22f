//! Fragment-by-fragment evaluation.

use tally_eval::{
    register_extensions, ExtensionEngine, ExtensionScript, RegistrationSummary, ScriptContext,
    SharedScriptRegistry, SymbolTable,
};
use tally_value::errors::{empty_script, no_more_fragments};
use tally_value::{DataValue, EvalError, EvalResult};

/// How symbols carry over between fragments of one evaluator.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FragmentScope {
    /// Every fragment sees what earlier fragments wrote.
    #[default]
    Session,
    /// Every fragment starts from the symbols as they were when the
    /// evaluator was created, and they are restored afterwards.
    Isolated,
}

/// Evaluates a list of script fragments, in order, on one context.
///
/// Each fragment yields a `List` with one entry per statement.
pub struct ScriptEvaluator<'ctx> {
    context: &'ctx mut ScriptContext,
    fragments: Vec<String>,
    index: usize,
    baseline: Option<SymbolTable>,
}

impl<'ctx> ScriptEvaluator<'ctx> {
    pub fn new<I, S>(context: &'ctx mut ScriptContext, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptEvaluator {
            context,
            fragments: fragments.into_iter().map(Into::into).collect(),
            index: 0,
            baseline: None,
        }
    }

    #[must_use]
    pub fn with_scope(mut self, scope: FragmentScope) -> Self {
        self.baseline = match scope {
            FragmentScope::Session => None,
            FragmentScope::Isolated => Some(self.context.symbols().clone()),
        };
        self
    }

    pub fn scope(&self) -> FragmentScope {
        if self.baseline.is_some() {
            FragmentScope::Isolated
        } else {
            FragmentScope::Session
        }
    }

    pub fn context(&self) -> &ScriptContext {
        self.context
    }

    pub fn has_next(&self) -> bool {
        self.index < self.fragments.len()
    }

    /// Fragments not yet evaluated.
    pub fn remaining(&self) -> usize {
        self.fragments.len() - self.index
    }

    /// Evaluate the next fragment. A failed fragment is still consumed.
    #[tracing::instrument(level = "debug", skip_all, fields(fragment = self.index))]
    pub fn evaluate_next(&mut self) -> EvalResult {
        let Some(text) = self.fragments.get(self.index) else {
            return Err(no_more_fragments());
        };
        self.index += 1;

        if let Some(baseline) = &self.baseline {
            *self.context.symbols_mut() = baseline.clone();
        }
        let result = Self::evaluate(self.context, text);
        if let Some(baseline) = &self.baseline {
            *self.context.symbols_mut() = baseline.clone();
        }

        if let Err(err) = &result {
            tracing::debug!(error = %err, "fragment failed");
        }
        result
    }

    /// Evaluate every remaining fragment, stopping at the first failure.
    pub fn evaluate_all(&mut self) -> Result<Vec<DataValue>, EvalError> {
        if self.fragments.is_empty() {
            return Err(empty_script());
        }
        let mut results = Vec::with_capacity(self.remaining());
        while self.has_next() {
            results.push(self.evaluate_next()?);
        }
        Ok(results)
    }

    /// Parse and evaluate one fragment on `context`.
    pub fn evaluate(context: &mut ScriptContext, text: &str) -> EvalResult {
        let script = tally_parse::parse(text)?;
        context.evaluate_script(&script)
    }

    /// Run one extension script through `engine` and register its exports.
    pub fn add_extension_script<E: ExtensionEngine + ?Sized>(
        registry: &SharedScriptRegistry,
        engine: &mut E,
        name: &str,
        body: &str,
    ) -> Result<RegistrationSummary, EvalError> {
        register_extensions(registry, engine, &[ExtensionScript::new(name, body)])
    }

    /// Run several extension scripts as one batch: all of their exports
    /// are registered, or none.
    pub fn add_extension_scripts<E, I, N, B>(
        registry: &SharedScriptRegistry,
        engine: &mut E,
        scripts: I,
    ) -> Result<RegistrationSummary, EvalError>
    where
        E: ExtensionEngine + ?Sized,
        I: IntoIterator<Item = (N, B)>,
        N: Into<String>,
        B: Into<String>,
    {
        let scripts: Vec<ExtensionScript> = scripts
            .into_iter()
            .map(|(name, body)| ExtensionScript::new(name, body))
            .collect();
        register_extensions(registry, engine, &scripts)
    }
}

impl std::fmt::Debug for ScriptEvaluator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptEvaluator")
            .field("fragments", &self.fragments.len())
            .field("index", &self.index)
            .field("scope", &self.scope())
            .finish_non_exhaustive()
    }
}
