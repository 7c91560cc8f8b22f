//! Tally - dice script evaluation.
//!
//! The driver crate ties the front end (`tally_parse`) to the evaluator
//! (`tally_eval`):
//!
//! - `ScriptEvaluator`: evaluates script fragments on one context
//! - `EvalConfig`: seed, permission, missing-symbol and scoping settings
//! - `MacroEngine`: an extension engine whose functions and dice are
//!   themselves written in Tally
//! - `commands`: the `tally` CLI subcommands

pub mod commands;
mod config;
mod evaluator;
mod macros;

use std::sync::Once;

pub use config::EvalConfig;
pub use evaluator::{FragmentScope, ScriptEvaluator};
pub use macros::MacroEngine;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=tally_eval=debug`;
/// set `TALLY_LOG_TREE=1` for indented span output.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        if std::env::var_os("TALLY_LOG_TREE").is_some() {
            tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
