//! Evaluator tree.
//!
//! A script is a root `Sequence` node plus the roll declarations its `Roll`
//! nodes refer to. Every node variant is evaluated by the evaluator's single
//! exhaustive match; there is no open node hierarchy.

use crate::{BinaryOp, RollDeclaration, Span, UnaryOp};

/// Literal payloads.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Long(i64),
    Double(f64),
    String(String),
}

/// The namespace an assignment writes into.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AssignTarget {
    /// `$name = ...`
    Variable(String),
    /// `@name = ...`
    Property(String),
    /// `#name = ...`
    Roll(String),
}

/// Evaluator node.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Ordered statements; evaluates to a `List` of their results.
    Sequence(Vec<Node>),
    Literal {
        value: Literal,
        span: Span,
    },
    /// `$name`
    Variable {
        name: String,
        span: Span,
    },
    /// `@name`
    Property {
        name: String,
        span: Span,
    },
    /// A roll declared in the script's roll table; rolled when evaluated.
    Roll {
        name: String,
        span: Span,
    },
    /// `#name`: reads a recorded roll result.
    RollRef {
        name: String,
        span: Span,
    },
    Assign {
        target: AssignTarget,
        value: Box<Node>,
        span: Span,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
        span: Span,
    },
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
        span: Span,
    },
    /// `name(args)`; names may be dotted (`list.create`).
    Call {
        name: String,
        args: Vec<Node>,
        span: Span,
    },
}

impl Node {
    /// Source span of this node. A sequence spans its first to last child.
    pub fn span(&self) -> Span {
        match self {
            Node::Sequence(children) => match (children.first(), children.last()) {
                (Some(first), Some(last)) => first.span().merge(last.span()),
                _ => Span::DUMMY,
            },
            Node::Literal { span, .. }
            | Node::Variable { span, .. }
            | Node::Property { span, .. }
            | Node::Roll { span, .. }
            | Node::RollRef { span, .. }
            | Node::Assign { span, .. }
            | Node::Unary { span, .. }
            | Node::Binary { span, .. }
            | Node::Call { span, .. } => *span,
        }
    }
}

/// A parsed script fragment.
#[derive(Clone, Debug, PartialEq)]
pub struct Script {
    root: Node,
    rolls: Vec<RollDeclaration>,
}

impl Script {
    /// Wrap top-level statements into the root sequence.
    pub fn new(statements: Vec<Node>, rolls: Vec<RollDeclaration>) -> Self {
        Script {
            root: Node::Sequence(statements),
            rolls,
        }
    }

    /// The root `Sequence` node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn rolls(&self) -> &[RollDeclaration] {
        &self.rolls
    }

    pub fn statement_count(&self) -> usize {
        match &self.root {
            Node::Sequence(children) => children.len(),
            _ => 1,
        }
    }
}
