//! Parser tests.

use pretty_assertions::assert_eq;
use tally_ir::{AssignTarget, BinaryOp, Literal, Node, Span, UnaryOp};
use tally_value::{ErrorCategory, EvalError};

use crate::{parse, ParseError};

fn statements(source: &str) -> Vec<Node> {
    match parse(source).unwrap().root() {
        Node::Sequence(children) => children.clone(),
        other => vec![other.clone()],
    }
}

fn single(source: &str) -> Node {
    let mut nodes = statements(source);
    assert_eq!(nodes.len(), 1, "expected one statement in {source:?}");
    nodes.remove(0)
}

/// Strip spans so shapes compare structurally.
fn shape(node: &Node) -> String {
    match node {
        Node::Sequence(children) => {
            let inner: Vec<String> = children.iter().map(shape).collect();
            format!("[{}]", inner.join("; "))
        }
        Node::Literal { value, .. } => match value {
            Literal::Long(n) => n.to_string(),
            Literal::Double(d) => format!("{d:?}"),
            Literal::String(s) => format!("'{s}'"),
        },
        Node::Variable { name, .. } => format!("${name}"),
        Node::Property { name, .. } => format!("@{name}"),
        Node::Roll { name, .. } => format!("<{name}>"),
        Node::RollRef { name, .. } => format!("#{name}"),
        Node::Assign { target, value, .. } => {
            let target = match target {
                AssignTarget::Variable(name) => format!("${name}"),
                AssignTarget::Property(name) => format!("@{name}"),
                AssignTarget::Roll(name) => format!("#{name}"),
            };
            format!("({target} = {})", shape(value))
        }
        Node::Unary { op, operand, .. } => format!("({}{})", op.as_symbol(), shape(operand)),
        Node::Binary {
            op, left, right, ..
        } => format!("({} {} {})", shape(left), op.as_symbol(), shape(right)),
        Node::Call { name, args, .. } => {
            let args: Vec<String> = args.iter().map(shape).collect();
            format!("{name}({})", args.join(", "))
        }
    }
}

#[test]
fn test_literals() {
    let shapes: Vec<String> = statements("22; 22.5; .7; 'a'; \"b\"")
        .iter()
        .map(shape)
        .collect();
    assert_eq!(shapes, ["22", "22.5", "0.7", "'a'", "'b'"]);
}

#[test]
fn test_precedence() {
    assert_eq!(shape(&single("1 + 2 * 3")), "(1 + (2 * 3))");
    assert_eq!(shape(&single("(1 + 2) * 3")), "((1 + 2) * 3)");
    assert_eq!(shape(&single("10 - 4 - 3")), "((10 - 4) - 3)");
    assert_eq!(shape(&single("22 % 7 / 2")), "((22 % 7) / 2)");
}

#[test]
fn test_power_binds_tighter_than_negation() {
    assert_eq!(shape(&single("-2^2")), "(-(2 ^ 2))");
    assert_eq!(shape(&single("2^3^2")), "(2 ^ (3 ^ 2))");
    assert_eq!(shape(&single("2^-1")), "(2 ^ (-1))");
    assert_eq!(shape(&single("--45")), "(-(-45))");
}

#[test]
fn test_binary_span_covers_operands() {
    let node = single("6 + 7");
    assert_eq!(node.span(), Span::new(0, 5));
    assert!(matches!(node, Node::Binary { op: BinaryOp::Add, .. }));

    let node = single("-45");
    assert!(matches!(node, Node::Unary { op: UnaryOp::Neg, .. }));
    assert_eq!(node.span(), Span::new(0, 3));
}

#[test]
fn test_assignments() {
    assert_eq!(shape(&single("$a=12")), "($a = 12)");
    assert_eq!(single("$a=12").span(), Span::new(0, 5));
    assert_eq!(shape(&single("@str = @str + 1")), "(@str = (@str + 1))");
    assert_eq!(shape(&single("#atk = 1d20")), "(#atk = <roll1>)");
    // Only a reference followed by `=` assigns.
    assert_eq!(shape(&single("$a + 1")), "($a + 1)");
}

#[test]
fn test_calls() {
    assert_eq!(shape(&single("list(1,3,5)")), "list(1, 3, 5)");
    assert_eq!(shape(&single("list.create()")), "list.create()");
    assert_eq!(shape(&single("max(1,\n  2,\n  3)")), "max(1, 2, 3)");
    assert_eq!(
        shape(&single("result.rolls(roll(3, 6))")),
        "result.rolls(roll(3, 6))"
    );
    assert_eq!(single("abs(-1)").span(), Span::new(0, 7));
}

#[test]
fn test_dice_words_declare_rolls() {
    let script = parse("2d6 + 3\nd20 - 4dF").unwrap();
    assert_eq!(shape(script.root()), "[(<roll1> + 3); (<roll2> - <roll3>)]");

    let notations: Vec<(&str, &str)> = script
        .rolls()
        .iter()
        .map(|decl| (decl.name.as_str(), decl.expression.notation()))
        .collect();
    assert_eq!(
        notations,
        [("roll1", "2d6"), ("roll2", "d20"), ("roll3", "4dF")]
    );
    assert!(script
        .rolls()
        .iter()
        .all(|decl| !decl.expression.is_verbose() && decl.expression.is_sum()));
}

#[test]
fn test_braced_rolls_are_verbose() {
    let script = parse("{3d6}; { + 4d6 }").unwrap();
    let rolls = script.rolls();
    assert_eq!(rolls.len(), 2);

    assert_eq!(rolls[0].expression.notation(), "3d6");
    assert!(rolls[0].expression.is_verbose());
    assert!(!rolls[0].expression.is_sum());

    assert_eq!(rolls[1].expression.notation(), "4d6");
    assert!(rolls[1].expression.is_verbose());
    assert!(rolls[1].expression.is_sum());

    assert_eq!(statements("{3d6}")[0].span(), Span::new(0, 5));
}

#[test]
fn test_separators_and_blank_lines() {
    assert!(statements("").is_empty());
    assert!(statements(";;\n\n").is_empty());
    let shapes: Vec<String> = statements("\n$a = 1;; $a\n\n$a * 2 // double\n")
        .iter()
        .map(shape)
        .collect();
    assert_eq!(shapes, ["($a = 1)", "$a", "($a * 2)"]);
}

#[test]
fn test_missing_separator() {
    assert_eq!(
        parse("1 2").unwrap_err(),
        ParseError::UnexpectedToken {
            expected: "`;` or end of line",
            found: "number 2".into(),
            span: Span::new(2, 3),
        }
    );
}

#[test]
fn test_unclosed_paren() {
    assert_eq!(
        parse("(1 + 2").unwrap_err(),
        ParseError::UnexpectedEnd {
            expected: "`)`",
            span: Span::new(6, 6),
        }
    );
}

#[test]
fn test_missing_operand() {
    let err = parse("* 3").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedToken {
            expected: "an expression",
            found: "`*`".into(),
            span: Span::new(0, 1),
        }
    );
    assert_eq!(err.to_string(), "expected an expression, found `*`");

    assert!(matches!(
        parse("1 +").unwrap_err(),
        ParseError::UnexpectedEnd { .. }
    ));
}

#[test]
fn test_empty_braces() {
    assert!(matches!(
        parse("{}").unwrap_err(),
        ParseError::UnexpectedToken {
            expected: "a dice notation",
            ..
        }
    ));
    assert!(matches!(
        parse("{3d6").unwrap_err(),
        ParseError::UnexpectedEnd { expected: "`}`", .. }
    ));
}

#[test]
fn test_parse_error_converts_to_syntax_error() {
    let err: EvalError = parse("$a = ?").unwrap_err().into();
    assert_eq!(err.category(), ErrorCategory::Syntax);
    assert_eq!(err.span, Some(Span::new(5, 6)));
    assert!(err.message.contains("unexpected character"));
}
