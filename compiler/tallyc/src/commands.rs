//! Command handlers for the `tally` CLI.
//!
//! Handlers return values instead of printing so the binary decides how
//! to report them.

use rayon::prelude::*;
use tally_eval::{Registry, RegistrationSummary, SharedScriptRegistry};
use tally_value::{DataValue, EvalError};

use crate::{EvalConfig, MacroEngine, ScriptEvaluator};

/// A registry with the built-ins and the definitions in `extension_files`
/// registered as one batch.
pub fn load_registry(extension_files: &[String]) -> Result<SharedScriptRegistry, EvalError> {
    let registry = Registry::with_builtins()?.shared();
    if !extension_files.is_empty() {
        let summary = load_extensions(&registry, extension_files)?;
        tracing::debug!(
            functions = summary.functions.len(),
            dice = summary.dice.len(),
            "extensions loaded"
        );
    }
    Ok(registry)
}

/// Register the macro definitions in `paths`, all or nothing.
pub fn load_extensions(
    registry: &SharedScriptRegistry,
    paths: &[String],
) -> Result<RegistrationSummary, EvalError> {
    let scripts = paths
        .iter()
        .map(|path| read_file(path).map(|body| (path.clone(), body)))
        .collect::<Result<Vec<_>, _>>()?;
    ScriptEvaluator::add_extension_scripts(registry, &mut MacroEngine::new(), scripts)
}

/// Evaluate `fragments` in order on one session.
pub fn eval_fragments(
    config: &EvalConfig,
    registry: &SharedScriptRegistry,
    fragments: &[String],
) -> Result<Vec<DataValue>, EvalError> {
    let mut context = config.build_context(registry.clone());
    ScriptEvaluator::new(&mut context, fragments.iter().cloned())
        .with_scope(config.fragment_scope)
        .evaluate_all()
}

/// Outcome of running one script file.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: String,
    pub result: Result<DataValue, EvalError>,
}

/// Evaluate each file in its own session, in parallel, over one registry.
///
/// Outcomes come back in the order of `paths`.
#[tracing::instrument(level = "debug", skip_all, fields(files = paths.len()))]
pub fn run_files(
    config: &EvalConfig,
    registry: &SharedScriptRegistry,
    paths: &[String],
) -> Vec<FileOutcome> {
    paths
        .par_iter()
        .map(|path| {
            let result = read_file(path).and_then(|text| {
                let mut context = config.build_context(registry.clone());
                ScriptEvaluator::evaluate(&mut context, &text)
            });
            FileOutcome {
                path: path.clone(),
                result,
            }
        })
        .collect()
}

/// One line per registered dice and function, built-ins first.
pub fn describe_registry(registry: &SharedScriptRegistry) -> Vec<String> {
    let guard = registry.snapshot();
    let mut lines = Vec::new();

    let roller = guard.dice();
    let tiers = [("builtin", roller.builtin_dice()), ("user", roller.user_dice())];
    for (tier, list) in tiers {
        for dice in list {
            lines.push(format!(
                "dice {} \"{}\" ({tier})",
                dice.name(),
                dice.pattern().template()
            ));
        }
    }

    let functions = guard.functions();
    let tiers = [
        ("builtin", functions.builtin_functions().collect::<Vec<_>>()),
        ("user", functions.user_functions().collect::<Vec<_>>()),
    ];
    for (tier, list) in tiers {
        for function in list {
            let permission = functions
                .permission(function.name())
                .unwrap_or_default();
            lines.push(format!(
                "function {} [{permission}] ({tier})",
                function.definition()
            ));
        }
    }
    lines
}

/// A fragment result as `a, b, c`.
pub fn format_results(result: &DataValue) -> String {
    match result.items() {
        Some(items) => items
            .iter()
            .map(DataValue::as_string)
            .collect::<Vec<_>>()
            .join(", "),
        None => result.as_string(),
    }
}

fn read_file(path: &str) -> Result<String, EvalError> {
    std::fs::read_to_string(path).map_err(|e| EvalError::new(format!("cannot read {path}: {e}")))
}
