//! Front-end errors.

use tally_ir::Span;
use tally_value::errors::syntax_error;
use tally_value::EvalError;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected character {text:?}")]
    UnexpectedCharacter { text: String, span: Span },

    #[error("unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("number {text} is out of range")]
    NumberOutOfRange { text: String, span: Span },

    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        span: Span,
    },

    #[error("expected {expected}, found end of input")]
    UnexpectedEnd { expected: &'static str, span: Span },

    #[error("script is too long")]
    SourceTooLong,
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedCharacter { span, .. }
            | ParseError::UnterminatedString { span }
            | ParseError::NumberOutOfRange { span, .. }
            | ParseError::UnexpectedToken { span, .. }
            | ParseError::UnexpectedEnd { span, .. } => *span,
            ParseError::SourceTooLong => Span::DUMMY,
        }
    }
}

impl From<ParseError> for EvalError {
    fn from(err: ParseError) -> Self {
        syntax_error(err.to_string(), err.span())
    }
}
