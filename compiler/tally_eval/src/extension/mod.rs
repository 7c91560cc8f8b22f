//! Runtime extensions.
//!
//! An external engine runs a batch of extension scripts. Each script
//! records what it exports into one `ExportBatch`; once the whole batch has
//! run, the exports merge into the registry under a single write lock.

mod batch;
mod callable;

pub use batch::{ExportBatch, RegistrationSummary};
pub use callable::{ExtensionCallable, ExtensionHandle};

use tally_value::EvalError;

use crate::registry::SharedScriptRegistry;

/// One named extension script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionScript {
    pub name: String,
    pub body: String,
}

impl ExtensionScript {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        ExtensionScript {
            name: name.into(),
            body: body.into(),
        }
    }
}

/// The engine that runs extension scripts.
///
/// Each script runs in its own scope; results of scripts in the same batch
/// are visible to one another. Exports go into `exports`; an error rejects
/// the whole batch.
pub trait ExtensionEngine {
    fn run_batch(
        &mut self,
        scripts: &[ExtensionScript],
        exports: &mut ExportBatch,
    ) -> Result<(), EvalError>;
}

/// Run `scripts` through `engine` and merge their exports into `registry`.
///
/// Nothing is registered unless the engine succeeds and every export can
/// be added.
#[tracing::instrument(level = "debug", skip_all, fields(scripts = scripts.len()))]
pub fn register_extensions<E: ExtensionEngine + ?Sized>(
    registry: &SharedScriptRegistry,
    engine: &mut E,
    scripts: &[ExtensionScript],
) -> Result<RegistrationSummary, EvalError> {
    let mut exports = ExportBatch::new();
    if let Err(err) = engine.run_batch(scripts, &mut exports) {
        tracing::warn!(error = %err, "extension batch failed");
        return Err(err);
    }
    let summary = registry.update(|registry| exports.merge_into(registry))?;
    tracing::debug!(
        functions = summary.functions.len(),
        dice = summary.dice.len(),
        "extension batch registered"
    );
    Ok(summary)
}
