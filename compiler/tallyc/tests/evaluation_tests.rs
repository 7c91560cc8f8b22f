//! End-to-end evaluation of script text.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;
use tally_eval::{MissingSymbolPolicy, Registry, ScriptContext, SharedScriptRegistry};
use tally_value::{DataValue, ErrorCategory, EvalErrorKind};
use tallyc::{EvalConfig, FragmentScope, ScriptEvaluator};

fn registry() -> SharedScriptRegistry {
    Registry::with_builtins().unwrap().shared()
}

fn context() -> ScriptContext {
    EvalConfig::default().with_seed(7).build_context(registry())
}

fn eval(text: &str) -> Vec<DataValue> {
    let mut ctx = context();
    ScriptEvaluator::evaluate(&mut ctx, text)
        .unwrap()
        .items()
        .unwrap()
        .to_vec()
}

fn eval_one(text: &str) -> DataValue {
    let mut values = eval(text);
    assert_eq!(values.len(), 1, "expected one result from {text:?}");
    values.remove(0)
}

#[test]
fn test_literals() {
    assert_eq!(eval_one("22"), DataValue::long(22));
    assert_eq!(eval_one("22.5"), DataValue::double(22.5));
    assert_eq!(eval_one(".7"), DataValue::double(0.7));
    assert_eq!(eval_one("-45"), DataValue::long(-45));
    assert_eq!(eval_one("'text'"), DataValue::string("text"));
}

#[test]
fn test_lists() {
    assert_eq!(
        eval("list(1,3,5)"),
        vec![DataValue::long(1), DataValue::long(3), DataValue::long(5)]
    );
    assert!(eval("list.create()").is_empty());
}

#[test]
fn test_arithmetic() {
    assert_eq!(eval_one("6+7"), DataValue::long(13));
    assert_eq!(eval_one("12/5"), DataValue::long(2));
    assert_eq!(eval_one("12^2"), DataValue::long(144));
    assert_eq!(eval_one("22%7"), DataValue::long(1));
    assert_eq!(eval_one("49^0.5"), DataValue::double(7.0));
    assert_eq!(eval_one("22.5%7"), DataValue::double(1.5));
    assert_eq!(eval_one("-7 / 2"), DataValue::long(-3));
    assert_eq!(eval_one("-2^2"), DataValue::long(-4));
}

#[test]
fn test_string_arithmetic() {
    assert_eq!(
        eval_one("'string1string2' - 'ing'"),
        DataValue::string("str1str2")
    );
    assert_eq!(eval_one("2 * 'string1'"), DataValue::string("string1string1"));
    assert_eq!(eval_one("'string1' * 2"), DataValue::string("string1string1"));
    assert_eq!(
        eval_one("'string1' * 4.3"),
        DataValue::string("string1string1string1string1")
    );
    assert_eq!(eval_one("1 + 'a'"), DataValue::string("1a"));
}

#[test]
fn test_several_statements() {
    assert_eq!(
        eval("$a = 2; $a * 3\n$a + 1"),
        vec![DataValue::long(2), DataValue::long(6), DataValue::long(3)]
    );
}

#[test]
fn test_variables_persist_across_fragments() {
    let mut ctx = context();
    let mut evaluator = ScriptEvaluator::new(&mut ctx, ["$a=12", "$a"]);
    assert!(evaluator.has_next());
    assert_eq!(
        evaluator.evaluate_next().unwrap(),
        DataValue::list(vec![DataValue::long(12)])
    );
    assert_eq!(
        evaluator.evaluate_next().unwrap(),
        DataValue::list(vec![DataValue::long(12)])
    );
    assert!(!evaluator.has_next());

    let err = evaluator.evaluate_next().unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::NoMoreFragments);
}

#[test]
fn test_isolated_fragments() {
    let mut ctx = context();
    ctx.symbols_mut().set_variable("base", DataValue::long(1));

    let mut evaluator =
        ScriptEvaluator::new(&mut ctx, ["$a = 12; $base = 5", "$base"]).with_scope(FragmentScope::Isolated);
    assert_eq!(evaluator.scope(), FragmentScope::Isolated);
    evaluator.evaluate_next().unwrap();
    assert_eq!(
        evaluator.evaluate_next().unwrap(),
        DataValue::list(vec![DataValue::long(1)])
    );
    assert!(!evaluator.context().symbols().has_variable("a"));

    // Each fragment starts from the snapshot, so `$a` is gone.
    let mut evaluator =
        ScriptEvaluator::new(&mut ctx, ["$a = 1", "$a"]).with_scope(FragmentScope::Isolated);
    evaluator.evaluate_next().unwrap();
    let err = evaluator.evaluate_next().unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotFound);
}

#[test]
fn test_evaluate_all() {
    let mut ctx = context();
    let results = ScriptEvaluator::new(&mut ctx, ["1; 2", "list(3, 4)"])
        .evaluate_all()
        .unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[1].items().unwrap().len(), 2);

    let err = ScriptEvaluator::new(&mut ctx, Vec::<String>::new())
        .evaluate_all()
        .unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::EmptyScript);
}

#[test]
fn test_failed_fragment_is_consumed() {
    let mut ctx = context();
    let mut evaluator = ScriptEvaluator::new(&mut ctx, ["1/0", "2"]);
    let err = evaluator.evaluate_next().unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    assert_eq!(evaluator.remaining(), 1);
    assert_eq!(
        evaluator.evaluate_next().unwrap(),
        DataValue::list(vec![DataValue::long(2)])
    );
}

#[test]
fn test_syntax_errors_keep_span() {
    let mut ctx = context();
    let err = ScriptEvaluator::evaluate(&mut ctx, "6 + ").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Syntax);
    assert!(err.span.is_some());
}

#[test]
fn test_rolls() {
    for _ in 0..20 {
        let value = eval_one("1d6");
        let roll = value.as_roll_result().unwrap();
        let total = roll.value().as_long().unwrap();
        assert!((1..=6).contains(&total));
        assert!(!roll.details().is_empty());
    }

    let total = eval_one("2d6 + 3").as_long().unwrap();
    assert!((5..=15).contains(&total));
    let total = eval_one("d20").as_long().unwrap();
    assert!((1..=20).contains(&total));
}

#[test]
fn test_verbose_rolls() {
    let value = eval_one("{3d6}");
    let roll = value.as_roll_result().unwrap();
    let rolls = roll.value().items().unwrap();
    assert_eq!(rolls.len(), 3);
    assert!(rolls
        .iter()
        .all(|v| (1..=6).contains(&v.as_long().unwrap())));

    let value = eval_one("{+3d6}");
    let roll = value.as_roll_result().unwrap();
    assert_eq!(roll.individual_values().len(), 3);
    assert!(roll.value().as_long().is_ok());
}

#[test]
fn test_roll_keeps_breakdown_in_lists() {
    for text in ["1d6 + list(1, 2)", "list(1, 2) + 1d6"] {
        let values = eval(text);
        assert_eq!(values.len(), 3, "{text}");
        let rolls: Vec<_> = values.iter().filter_map(DataValue::as_roll_result).collect();
        assert_eq!(rolls.len(), 1, "{text}");
        assert_eq!(rolls[0].individual_values().len(), 1);
    }
}

#[test]
fn test_named_rolls() {
    let mut ctx = context();
    ScriptEvaluator::evaluate(&mut ctx, "#atk = 1d20 + 5").unwrap();
    let first = ScriptEvaluator::evaluate(&mut ctx, "#atk").unwrap();
    let second = ScriptEvaluator::evaluate(&mut ctx, "#atk").unwrap();
    assert_eq!(first, second);
    assert!(ctx.symbols().has_roll_result("atk"));
    assert!(ctx.symbols().has_roll_result("roll1"));
}

#[test]
fn test_unknown_notation() {
    let mut ctx = context();
    let err = ScriptEvaluator::evaluate(&mut ctx, "4dF").unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UnknownDicePattern {
            notation: "4dF".into()
        }
    );
}

#[test]
fn test_missing_symbol_default() {
    let mut ctx = EvalConfig::default()
        .with_missing_symbol(MissingSymbolPolicy::Default(DataValue::long(0)))
        .build_context(registry());
    let values = ScriptEvaluator::evaluate(&mut ctx, "$hp + @str + 1").unwrap();
    assert_eq!(values, DataValue::list(vec![DataValue::long(1)]));
}
