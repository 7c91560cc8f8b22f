//! Tokenizer built on logos.

use logos::Logos;
use tally_ir::Span;

use crate::ParseError;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
pub(crate) enum Token {
    #[regex(r"//[^\n]*", logos::skip)]
    #[token("\n")]
    Newline,
    #[token(";")]
    Semicolon,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token("=")]
    Eq,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Long(i64),

    #[regex(r"[0-9]*\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Double(f64),

    #[regex(r"'[^'\n]*'", unquote)]
    #[regex(r#""[^"\n]*""#, unquote)]
    Str(String),

    #[regex(r"\$[A-Za-z_][A-Za-z0-9_]*", sigil_name)]
    Variable(String),

    #[regex(r"@[A-Za-z_][A-Za-z0-9_]*", sigil_name)]
    Property(String),

    #[regex(r"#[A-Za-z_][A-Za-z0-9_]*", sigil_name)]
    RollRef(String),

    /// A function name or a dice word starting with a letter (`d20`).
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*", |lex| lex.slice().to_string())]
    Ident(String),

    /// A dice word starting with a count (`2d6`, `4dF`).
    #[regex(r"[0-9]+[A-Za-z][A-Za-z0-9]*", |lex| lex.slice().to_string())]
    DiceWord(String),
}

fn unquote(lex: &logos::Lexer<'_, Token>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_string()
}

fn sigil_name(lex: &logos::Lexer<'_, Token>) -> String {
    lex.slice()[1..].to_string()
}

impl Token {
    /// Short description for error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Newline => "end of line".to_string(),
            Token::Long(n) => format!("number {n}"),
            Token::Double(d) => format!("number {d}"),
            Token::Str(s) => format!("string {s:?}"),
            Token::Variable(name) => format!("${name}"),
            Token::Property(name) => format!("@{name}"),
            Token::RollRef(name) => format!("#{name}"),
            Token::Ident(word) | Token::DiceWord(word) => format!("`{word}`"),
            Token::Semicolon => "`;`".to_string(),
            Token::LParen => "`(`".to_string(),
            Token::RParen => "`)`".to_string(),
            Token::LBrace => "`{`".to_string(),
            Token::RBrace => "`}`".to_string(),
            Token::Comma => "`,`".to_string(),
            Token::Eq => "`=`".to_string(),
            Token::Plus => "`+`".to_string(),
            Token::Minus => "`-`".to_string(),
            Token::Star => "`*`".to_string(),
            Token::Slash => "`/`".to_string(),
            Token::Percent => "`%`".to_string(),
            Token::Caret => "`^`".to_string(),
        }
    }
}

/// Split `source` into tokens with their spans.
pub(crate) fn tokenize(source: &str) -> Result<Vec<(Token, Span)>, ParseError> {
    if u32::try_from(source.len()).is_err() {
        return Err(ParseError::SourceTooLong);
    }

    let mut tokens = Vec::new();
    let mut logos = Token::lexer(source);
    while let Some(token_result) = logos.next() {
        let span = Span::try_from_range(logos.span()).ok_or(ParseError::SourceTooLong)?;
        let slice = logos.slice();

        match token_result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => return Err(lex_error(source, slice, span)),
        }
    }
    Ok(tokens)
}

#[cold]
fn lex_error(source: &str, slice: &str, span: Span) -> ParseError {
    if slice.starts_with('\'') || slice.starts_with('"') {
        return ParseError::UnterminatedString { span };
    }
    if !slice.is_empty() && slice.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return ParseError::NumberOutOfRange {
            text: slice.to_string(),
            span,
        };
    }
    let text = source[span.to_range()]
        .chars()
        .next()
        .map(String::from)
        .unwrap_or_default();
    ParseError::UnexpectedCharacter { text, span }
}
