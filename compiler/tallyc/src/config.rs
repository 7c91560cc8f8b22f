//! Evaluation settings.
//!
//! Settings come from defaults, then the environment (`TALLY_SEED`,
//! `TALLY_PERMISSION`, `TALLY_DEFAULT_VALUE`), then CLI flags.

use tally_eval::{
    MissingSymbolPolicy, PermissionLevel, RandomSource, ScriptContext, SharedRandom,
    SharedScriptRegistry,
};
use tally_value::{DataValue, EvalError};

use crate::FragmentScope;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvalConfig {
    /// Fixed random seed; each session seeds its own source with it.
    pub seed: Option<u64>,
    pub permission: PermissionLevel,
    pub missing_symbol: MissingSymbolPolicy,
    pub fragment_scope: FragmentScope,
}

impl EvalConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, EvalError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EvalError> {
        let mut config = EvalConfig::default();
        if let Some(seed) = lookup("TALLY_SEED") {
            config.seed = Some(parse_seed("TALLY_SEED", &seed)?);
        }
        if let Some(permission) = lookup("TALLY_PERMISSION") {
            config.permission = permission.parse()?;
        }
        if let Some(value) = lookup("TALLY_DEFAULT_VALUE") {
            config.missing_symbol = MissingSymbolPolicy::Default(parse_default_value(&value));
        }
        Ok(config)
    }

    /// Apply one CLI flag. Returns `false` if `arg` is not a config flag.
    pub fn apply_flag(&mut self, arg: &str) -> Result<bool, EvalError> {
        if let Some(seed) = arg.strip_prefix("--seed=") {
            self.seed = Some(parse_seed("--seed", seed)?);
        } else if let Some(permission) = arg.strip_prefix("--permission=") {
            self.permission = permission.parse()?;
        } else if let Some(value) = arg.strip_prefix("--default=") {
            self.missing_symbol = MissingSymbolPolicy::Default(parse_default_value(value));
        } else if arg == "--isolated" {
            self.fragment_scope = FragmentScope::Isolated;
        } else {
            return Ok(false);
        }
        Ok(true)
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_permission(mut self, permission: PermissionLevel) -> Self {
        self.permission = permission;
        self
    }

    #[must_use]
    pub fn with_missing_symbol(mut self, policy: MissingSymbolPolicy) -> Self {
        self.missing_symbol = policy;
        self
    }

    #[must_use]
    pub fn with_fragment_scope(mut self, scope: FragmentScope) -> Self {
        self.fragment_scope = scope;
        self
    }

    /// A random source honoring `seed`.
    pub fn random(&self) -> SharedRandom {
        match self.seed {
            Some(seed) => RandomSource::seeded(seed).shared(),
            None => RandomSource::from_os_rng().shared(),
        }
    }

    /// A fresh session over `registry` with these settings.
    pub fn build_context(&self, registry: SharedScriptRegistry) -> ScriptContext {
        ScriptContext::builder(registry)
            .random(self.random())
            .permission(self.permission)
            .missing_symbol_policy(self.missing_symbol.clone())
            .build()
    }
}

fn parse_seed(source: &str, text: &str) -> Result<u64, EvalError> {
    text.trim().parse().map_err(|_| {
        EvalError::new(format!(
            "{source} must be an unsigned integer, found {text:?}"
        ))
    })
}

/// Long if it parses as one, then Double, otherwise the text itself.
fn parse_default_value(text: &str) -> DataValue {
    let trimmed = text.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        DataValue::long(n)
    } else if let Ok(d) = trimmed.parse::<f64>() {
        DataValue::double(d)
    } else {
        DataValue::string(text)
    }
}
