//! Recursive descent parser.
//!
//! Precedence, loosest first:
//! - assignment (`$x = ...`, statement level only)
//! - `+ -`
//! - `* / %`
//! - unary `-`
//! - `^` (right-associative)
//! - primary

use tally_ir::{
    AssignTarget, BinaryOp, Literal, Node, RollDeclaration, RollExpression, Script, Span, UnaryOp,
};

use crate::lexer::{tokenize, Token};
use crate::ParseError;

/// Parse `source` into a script.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse(source: &str) -> Result<Script, ParseError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser::new(source, tokens);
    let statements = parser.parse_statements()?;
    tracing::debug!(
        statements = statements.len(),
        rolls = parser.rolls.len(),
        "parsed script"
    );
    Ok(Script::new(statements, parser.rolls))
}

struct Parser<'src> {
    source: &'src str,
    tokens: Vec<(Token, Span)>,
    pos: usize,
    end: Span,
    rolls: Vec<RollDeclaration>,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str, tokens: Vec<(Token, Span)>) -> Self {
        // tokenize already rejected sources whose length overflows u32
        let len = u32::try_from(source.len()).unwrap_or(u32::MAX);
        Parser {
            source,
            tokens,
            pos: 0,
            end: Span::new(len, len),
            rolls: Vec::new(),
        }
    }

    // Token navigation

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn current_span(&self) -> Span {
        self.tokens.get(self.pos).map_or(self.end, |(_, span)| *span)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1).map(|(token, _)| token)
    }

    fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .map_or(self.end, |(_, span)| *span)
    }

    fn advance(&mut self) -> Option<(Token, Span)> {
        let item = self.tokens.get(self.pos).cloned();
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    fn check(&self, token: &Token) -> bool {
        self.current() == Some(token)
    }

    fn consume(&mut self, token: &Token, expected: &'static str) -> Result<Span, ParseError> {
        if self.check(token) {
            let span = self.current_span();
            self.pos += 1;
            Ok(span)
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(&Token::Newline) {
            self.pos += 1;
        }
    }

    fn skip_separators(&mut self) {
        while matches!(self.current(), Some(Token::Newline | Token::Semicolon)) {
            self.pos += 1;
        }
    }

    #[cold]
    fn unexpected(&self, expected: &'static str) -> ParseError {
        match self.current() {
            Some(token) => ParseError::UnexpectedToken {
                expected,
                found: token.describe(),
                span: self.current_span(),
            },
            None => ParseError::UnexpectedEnd {
                expected,
                span: self.end,
            },
        }
    }

    // Statements

    fn parse_statements(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut statements = Vec::new();
        self.skip_separators();
        while self.current().is_some() {
            statements.push(self.parse_statement()?);
            if self.current().is_some()
                && !matches!(self.current(), Some(Token::Newline | Token::Semicolon))
            {
                return Err(self.unexpected("`;` or end of line"));
            }
            self.skip_separators();
        }
        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<Node, ParseError> {
        if self.peek() == Some(&Token::Eq) {
            let target = match self.current() {
                Some(Token::Variable(name)) => Some(AssignTarget::Variable(name.clone())),
                Some(Token::Property(name)) => Some(AssignTarget::Property(name.clone())),
                Some(Token::RollRef(name)) => Some(AssignTarget::Roll(name.clone())),
                _ => None,
            };
            if let Some(target) = target {
                let start = self.current_span();
                self.pos += 2;
                self.skip_newlines();
                let value = self.parse_expr()?;
                let span = start.merge(value.span());
                return Ok(Node::Assign {
                    target,
                    value: Box::new(value),
                    span,
                });
            }
        }
        self.parse_expr()
    }

    // Expressions

    fn parse_expr(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.current() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.pos += 1;
            self.skip_newlines();
            let right = self.parse_term()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Mod,
                _ => break,
            };
            self.pos += 1;
            self.skip_newlines();
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        if self.check(&Token::Minus) {
            let start = self.current_span();
            self.pos += 1;
            let operand = self.parse_unary()?;
            let span = start.merge(operand.span());
            return Ok(Node::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
                span,
            });
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> Result<Node, ParseError> {
        let base = self.parse_primary()?;
        if self.check(&Token::Caret) {
            self.pos += 1;
            self.skip_newlines();
            // Right-associative, and the exponent may be negated: 2^-1
            let exponent = self.parse_unary()?;
            return Ok(binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let Some((token, span)) = self.advance() else {
            return Err(self.unexpected("an expression"));
        };

        match token {
            Token::Long(value) => Ok(literal(Literal::Long(value), span)),
            Token::Double(value) => Ok(literal(Literal::Double(value), span)),
            Token::Str(value) => Ok(literal(Literal::String(value), span)),
            Token::Variable(name) => Ok(Node::Variable { name, span }),
            Token::Property(name) => Ok(Node::Property { name, span }),
            Token::RollRef(name) => Ok(Node::RollRef { name, span }),
            Token::LParen => {
                self.skip_newlines();
                let inner = self.parse_expr()?;
                self.skip_newlines();
                self.consume(&Token::RParen, "`)`")?;
                Ok(inner)
            }
            Token::Ident(name) if self.check(&Token::LParen) => self.parse_call(name, span),
            Token::Ident(notation) | Token::DiceWord(notation) => {
                Ok(self.declare_roll(RollExpression::new(notation), span))
            }
            Token::LBrace => self.parse_braced_roll(span),
            _ => {
                self.pos -= 1;
                Err(self.unexpected("an expression"))
            }
        }
    }

    fn parse_call(&mut self, name: String, start: Span) -> Result<Node, ParseError> {
        self.consume(&Token::LParen, "`(`")?;
        self.skip_newlines();
        let mut args = Vec::new();
        while !self.check(&Token::RParen) {
            args.push(self.parse_expr()?);
            self.skip_newlines();
            if !self.check(&Token::RParen) {
                self.consume(&Token::Comma, "`,` or `)`")?;
                self.skip_newlines();
            }
        }
        let end = self.consume(&Token::RParen, "`)`")?;
        Ok(Node::Call {
            name,
            args,
            span: start.merge(end),
        })
    }

    /// `{3d6}` rolls verbosely without summing; `{+3d6}` sums as well.
    /// The notation is the raw text between the braces.
    fn parse_braced_roll(&mut self, start: Span) -> Result<Node, ParseError> {
        let sum = self.check(&Token::Plus);
        if sum {
            self.pos += 1;
        }
        let first = self.pos;
        let notation_start = self.current_span();
        while !matches!(
            self.current(),
            Some(Token::RBrace | Token::Newline | Token::Semicolon) | None
        ) {
            self.pos += 1;
        }
        if self.pos == first {
            return Err(self.unexpected("a dice notation"));
        }
        let notation_end = self.previous_span();
        let end = self.consume(&Token::RBrace, "`}`")?;

        let notation = self.source[notation_start.merge(notation_end).to_range()]
            .trim()
            .to_string();
        let expression = RollExpression::new(notation)
            .with_verbose(true)
            .with_sum(sum);
        Ok(self.declare_roll(expression, start.merge(end)))
    }

    /// Record `expression` under the next automatic roll name.
    fn declare_roll(&mut self, expression: RollExpression, span: Span) -> Node {
        let name = format!("roll{}", self.rolls.len() + 1);
        self.rolls.push(RollDeclaration {
            name: name.clone(),
            expression,
        });
        Node::Roll { name, span }
    }
}

fn literal(value: Literal, span: Span) -> Node {
    Node::Literal { value, span }
}

fn binary(op: BinaryOp, left: Node, right: Node) -> Node {
    let span = left.span().merge(right.span());
    Node::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        span,
    }
}
