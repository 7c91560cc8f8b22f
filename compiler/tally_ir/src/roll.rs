//! Roll expressions: the unit the dice engine consumes.

use std::fmt;

/// A dice notation plus the two output flags requested by the script.
///
/// `verbose` asks for the individual rolls as the primary value; `sum`
/// keeps the total as the primary value even when verbose.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct RollExpression {
    notation: String,
    verbose: bool,
    sum: bool,
}

impl RollExpression {
    /// Plain roll: not verbose, summed.
    pub fn new(notation: impl Into<String>) -> Self {
        RollExpression {
            notation: notation.into(),
            verbose: false,
            sum: true,
        }
    }

    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use]
    pub fn with_sum(mut self, sum: bool) -> Self {
        self.sum = sum;
        self
    }

    pub fn notation(&self) -> &str {
        &self.notation
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn is_sum(&self) -> bool {
        self.sum
    }
}

impl fmt::Display for RollExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation)
    }
}

/// Binds a roll name in a script to the expression it rolls.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RollDeclaration {
    pub name: String,
    pub expression: RollExpression,
}
