//! Error types for script evaluation.
//!
//! Every failure in the core is an `EvalError`. Its `kind` is a structured
//! `EvalErrorKind`; `message` is the kind's `Display` output unless a factory
//! overrides it.
//!
//! # Categories
//!
//! Kinds group into the coarse categories hosts switch on
//! (`EvalError::category()`): type, arithmetic, syntax, unknown pattern,
//! function, duplicate definition, not found and evaluator errors.
//!
//! Factory functions (e.g. `not_numeric()`) are the public API for building
//! errors; they are `#[cold]` because every call site is an error path.

use crate::value::DataValue;
use std::fmt;
use tally_ir::Span;

/// Result of evaluation.
pub type EvalResult = Result<DataValue, EvalError>;

/// Coarse error category.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Invalid cross-variant coercion or arithmetic.
    Type,
    /// Integer arithmetic failures.
    Arithmetic,
    /// The front end rejected the text.
    Syntax,
    /// No dice matched, or a dice template is malformed.
    UnknownPattern,
    /// A function or extension call failed.
    Function,
    /// A registration collided with an existing name.
    DuplicateDefinition,
    /// Read of an unset variable, property or roll.
    NotFound,
    /// Misuse of the evaluator entry point.
    Evaluator,
}

/// Typed error kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Type
    NotNumeric {
        type_name: String,
    },
    NotDictionary {
        type_name: String,
    },
    UnknownDataType {
        name: String,
    },
    UnknownPermission {
        name: String,
    },

    // Arithmetic
    DivisionByZero,
    ModuloByZero,
    IntegerOverflow {
        operation: String,
    },
    StringTooLong {
        length: usize,
        limit: usize,
    },
    EmptyRandomRange {
        min: i64,
        less_than: i64,
    },

    // Syntax
    Syntax {
        message: String,
    },

    // Dice
    UnknownDicePattern {
        notation: String,
    },
    InvalidDicePattern {
        template: String,
        reason: String,
    },
    InvalidDieSides {
        sides: i64,
    },
    TooManyDice {
        number: i64,
        limit: i64,
    },

    // Function
    FunctionFailed {
        name: String,
        message: String,
    },
    UndefinedFunction {
        name: String,
    },
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    PermissionDenied {
        name: String,
        required: String,
    },
    InvalidDefinition {
        name: String,
        reason: String,
    },

    // Registry
    DuplicateFunction {
        name: String,
    },
    BuiltinFunctionShadowed {
        name: String,
    },
    DuplicateDice {
        name: String,
    },

    // Lookup
    UndefinedVariable {
        name: String,
    },
    UndefinedProperty {
        name: String,
    },
    UndefinedRoll {
        name: String,
    },

    // Evaluator
    NoMoreFragments,
    EmptyScript,

    /// Catch-all for errors raised by extension code with a free-form message.
    Custom {
        message: String,
    },
}

impl EvalErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotNumeric { .. }
            | Self::NotDictionary { .. }
            | Self::UnknownDataType { .. }
            | Self::UnknownPermission { .. } => ErrorCategory::Type,
            Self::DivisionByZero
            | Self::ModuloByZero
            | Self::IntegerOverflow { .. }
            | Self::StringTooLong { .. }
            | Self::EmptyRandomRange { .. } => ErrorCategory::Arithmetic,
            Self::Syntax { .. } => ErrorCategory::Syntax,
            Self::UnknownDicePattern { .. }
            | Self::InvalidDicePattern { .. }
            | Self::InvalidDieSides { .. }
            | Self::TooManyDice { .. } => ErrorCategory::UnknownPattern,
            Self::FunctionFailed { .. }
            | Self::UndefinedFunction { .. }
            | Self::ArityMismatch { .. }
            | Self::PermissionDenied { .. }
            | Self::InvalidDefinition { .. } => ErrorCategory::Function,
            Self::DuplicateFunction { .. }
            | Self::BuiltinFunctionShadowed { .. }
            | Self::DuplicateDice { .. } => ErrorCategory::DuplicateDefinition,
            Self::UndefinedVariable { .. }
            | Self::UndefinedProperty { .. }
            | Self::UndefinedRoll { .. } => ErrorCategory::NotFound,
            Self::NoMoreFragments | Self::EmptyScript | Self::Custom { .. } => {
                ErrorCategory::Evaluator
            }
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Type
            Self::NotNumeric { type_name } => {
                write!(f, "cannot convert {type_name} to a numeric value")
            }
            Self::NotDictionary { type_name } => {
                write!(f, "cannot convert a {type_name} value to a dictionary")
            }
            Self::UnknownDataType { name } => write!(f, "unknown data type: {name}"),
            Self::UnknownPermission { name } => write!(f, "unknown permission level: {name}"),

            // Arithmetic
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::ModuloByZero => write!(f, "remainder by zero"),
            Self::IntegerOverflow { operation } => {
                write!(f, "integer overflow in {operation}")
            }
            Self::StringTooLong { length, limit } => {
                write!(f, "string of {length} bytes exceeds the limit of {limit}")
            }
            Self::EmptyRandomRange { min, less_than } => {
                write!(f, "empty random range: {min} to {less_than} (exclusive)")
            }

            // Syntax
            Self::Syntax { message } => write!(f, "syntax error: {message}"),

            // Dice
            Self::UnknownDicePattern { notation } => {
                write!(f, "unknown dice pattern {notation}")
            }
            Self::InvalidDicePattern { template, reason } => {
                write!(f, "invalid dice pattern `{template}`: {reason}")
            }
            Self::InvalidDieSides { sides } => {
                write!(f, "a die must have at least one side, got {sides}")
            }
            Self::TooManyDice { number, limit } => {
                write!(f, "cannot roll {number} dice at once (limit: {limit})")
            }

            // Function
            Self::FunctionFailed { name, message } => write!(f, "{name} failed: {message}"),
            Self::UndefinedFunction { name } => write!(f, "undefined function: {name}"),
            Self::ArityMismatch {
                name,
                expected,
                got,
            } => {
                let arg_word = if *expected == 1 {
                    "argument"
                } else {
                    "arguments"
                };
                write!(f, "{name} expects {expected} {arg_word}, got {got}")
            }
            Self::PermissionDenied { name, required } => {
                write!(f, "{name} requires {required} permission")
            }
            Self::InvalidDefinition { name, reason } => {
                write!(f, "invalid definition of {name}: {reason}")
            }

            // Registry
            Self::DuplicateFunction { name } => {
                write!(f, "function has already been defined: {name}")
            }
            Self::BuiltinFunctionShadowed { name } => {
                write!(f, "cannot redefine built-in function: {name}")
            }
            Self::DuplicateDice { name } => write!(f, "dice has already been defined: {name}"),

            // Lookup
            Self::UndefinedVariable { name } => write!(f, "undefined variable: ${name}"),
            Self::UndefinedProperty { name } => write!(f, "undefined property: @{name}"),
            Self::UndefinedRoll { name } => write!(f, "undefined roll: #{name}"),

            // Evaluator
            Self::NoMoreFragments => write!(f, "no script fragments left to evaluate"),
            Self::EmptyScript => write!(f, "no text to parse"),

            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// Additional context attached to an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalNote {
    pub message: String,
}

impl EvalNote {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    /// Structured error category.
    pub kind: EvalErrorKind,
    /// Human-readable message, as shown to script authors.
    pub message: String,
    /// Source location where the error occurred.
    pub span: Option<Span>,
    /// Secondary context, innermost first.
    pub notes: Vec<EvalNote>,
}

impl EvalError {
    /// Create an error with a free-form message (`Custom` kind).
    ///
    /// Extension callables use this to report their own failures.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: EvalErrorKind::Custom {
                message: message.clone(),
            },
            message,
            span: None,
            notes: Vec::new(),
        }
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            span: None,
            notes: Vec::new(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Attach a source span unless one is already set.
    ///
    /// Errors bubble up through enclosing nodes; the innermost span wins.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: EvalNote) -> Self {
        self.notes.push(note);
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for note in &self.notes {
            write!(f, "\n  note: {}", note.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

// Type Errors

/// An arithmetic operand could not be read as a number.
#[cold]
pub fn not_numeric(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotNumeric {
        type_name: type_name.to_string(),
    })
}

/// A value could not be viewed as a dictionary.
#[cold]
pub fn not_dictionary(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotDictionary {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn unknown_data_type(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownDataType {
        name: name.to_string(),
    })
}

#[cold]
pub fn unknown_permission(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownPermission {
        name: name.to_string(),
    })
}

// Arithmetic Errors

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn modulo_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ModuloByZero)
}

#[cold]
pub fn string_too_long(length: usize, limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StringTooLong { length, limit })
}

#[cold]
pub fn integer_overflow(operation: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow {
        operation: operation.to_string(),
    })
}

#[cold]
pub fn empty_random_range(min: i64, less_than: i64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::EmptyRandomRange { min, less_than })
}

// Syntax Errors

/// Wrap a front-end failure. The span points into the fragment's text.
#[cold]
pub fn syntax_error(message: impl Into<String>, span: Span) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Syntax {
        message: message.into(),
    })
    .with_span(span)
}

// Dice Errors

#[cold]
pub fn unknown_dice_pattern(notation: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownDicePattern {
        notation: notation.to_string(),
    })
}

#[cold]
pub fn invalid_dice_pattern(template: &str, reason: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidDicePattern {
        template: template.to_string(),
        reason: reason.into(),
    })
}

#[cold]
pub fn invalid_die_sides(sides: i64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidDieSides { sides })
}

#[cold]
pub fn too_many_dice(number: i64, limit: i64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TooManyDice { number, limit })
}

// Function Errors

/// An extension function or dice failed internally.
///
/// The callee's own message is kept; its notes carry over.
#[cold]
pub fn function_failed(name: &str, cause: EvalError) -> EvalError {
    let mut error = EvalError::from_kind(EvalErrorKind::FunctionFailed {
        name: name.to_string(),
        message: cause.message,
    });
    error.span = cause.span;
    error.notes = cause.notes;
    error
}

#[cold]
pub fn undefined_function(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedFunction {
        name: name.to_string(),
    })
}

#[cold]
pub fn wrong_arg_count(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected,
        got,
    })
}

#[cold]
pub fn permission_denied(name: &str, required: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::PermissionDenied {
        name: name.to_string(),
        required: required.to_string(),
    })
}

#[cold]
pub fn invalid_definition(name: &str, reason: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidDefinition {
        name: name.to_string(),
        reason: reason.into(),
    })
}

// Registry Errors

#[cold]
pub fn duplicate_function(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateFunction {
        name: name.to_string(),
    })
}

#[cold]
pub fn builtin_function_shadowed(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BuiltinFunctionShadowed {
        name: name.to_string(),
    })
}

#[cold]
pub fn duplicate_dice(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateDice {
        name: name.to_string(),
    })
}

// Lookup Errors

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn undefined_property(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedProperty {
        name: name.to_string(),
    })
}

#[cold]
pub fn undefined_roll(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedRoll {
        name: name.to_string(),
    })
}

// Evaluator Errors

#[cold]
pub fn no_more_fragments() -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoMoreFragments)
}

#[cold]
pub fn empty_script() -> EvalError {
    EvalError::from_kind(EvalErrorKind::EmptyScript)
}
