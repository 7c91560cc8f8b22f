#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;
use tally_ir::RollExpression;
use tally_value::{DataValue, ErrorCategory, EvalError, EvalErrorKind, ValueKind};

use super::*;
use crate::extension::ExtensionHandle;
use crate::random::RandomSource;
use crate::tests::context;

fn rolls_of(value: &DataValue) -> Vec<i64> {
    value
        .as_roll_result()
        .unwrap()
        .individual_values()
        .iter()
        .map(|v| v.as_long().unwrap())
        .collect()
}

#[test]
fn test_standard_dice_sums_by_default() {
    let dice = StandardDice::new().unwrap();
    let random = RandomSource::seeded(1);
    let value = dice.roll(&random, &RollExpression::new("3d6")).unwrap();

    let rolls = rolls_of(&value);
    assert_eq!(rolls.len(), 3);
    assert!(rolls.iter().all(|r| (1..=6).contains(r)));

    let result = value.as_roll_result().unwrap();
    assert_eq!(result.value(), &DataValue::long(rolls.iter().sum()));
    let expected: Vec<String> = rolls.iter().map(i64::to_string).collect();
    assert_eq!(result.details(), expected.join(", "));
}

#[test]
fn test_standard_dice_verbose_unsummed_lists_rolls() {
    let dice = StandardDice::new().unwrap();
    let random = RandomSource::seeded(2);
    let expression = RollExpression::new("3d6").with_verbose(true).with_sum(false);
    let value = dice.roll(&random, &expression).unwrap();

    let result = value.as_roll_result().unwrap();
    let items: Vec<i64> = result
        .value()
        .items()
        .unwrap()
        .iter()
        .map(|v| v.as_long().unwrap())
        .collect();
    assert_eq!(items, rolls_of(&value));
}

#[test]
fn test_standard_dice_verbose_summed_keeps_total() {
    let dice = StandardDice::new().unwrap();
    let random = RandomSource::seeded(3);
    let expression = RollExpression::new("4d4").with_verbose(true);
    let value = dice.roll(&random, &expression).unwrap();
    let total: i64 = rolls_of(&value).iter().sum();
    assert_eq!(value.as_long().unwrap(), total);
}

#[test]
fn test_one_d6_through_roller() {
    let mut ctx = context();
    let value = ctx.roll(&RollExpression::new("1d6")).unwrap();
    let result = value.as_roll_result().unwrap();
    assert!(matches!(result.value().kind(), ValueKind::Long(n) if (1..=6).contains(n)));
    assert!(!result.details().is_empty());
}

#[test]
fn test_zero_sides_is_an_error() {
    let mut ctx = context();
    let err = ctx.roll(&RollExpression::new("2d0")).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::InvalidDieSides { sides: 0 });
}

#[test]
fn test_unknown_notation() {
    let mut ctx = context();
    let err = ctx.roll(&RollExpression::new("4dF")).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UnknownDicePattern {
            notation: "4dF".to_string()
        }
    );
    assert_eq!(err.category(), ErrorCategory::UnknownPattern);
}

fn fudge_dice() -> Dice {
    let handle = ExtensionHandle::from_fn(|ctx, args| {
        let number = args.get("number").unwrap().as_long()?;
        let faces = ctx.random().random_ints_between(usize::try_from(number).unwrap(), -1, 2)?;
        let verbose = args.get(VERBOSE_FLAG).unwrap().as_long()?;
        Ok(DataValue::long(faces.iter().sum::<i64>() + verbose * 100))
    });
    let pattern = DicePattern::new("#{number:4}dF", true).unwrap();
    Dice::Extension(ExtensionDice::new("Fudge", pattern, handle))
}

#[test]
fn test_extension_dice_receives_args_and_flags() {
    let mut ctx = context();
    ctx.registry()
        .write()
        .dice_mut()
        .add_user_dice(fudge_dice())
        .unwrap();

    let value = ctx.roll(&RollExpression::new("4dF")).unwrap();
    // The return type wraps a plain value as a Result.
    let total = value.as_roll_result().unwrap().value().as_long().unwrap();
    assert!((-4..=4).contains(&total));

    let verbose = ctx
        .roll(&RollExpression::new("dF").with_verbose(true))
        .unwrap()
        .as_long()
        .unwrap();
    assert!((96..=104).contains(&verbose));
}

#[test]
fn test_extension_dice_failure_names_the_dice() {
    let mut ctx = context();
    let handle = ExtensionHandle::from_fn(|_, _| {
        Err(EvalError::new("table missing"))
    });
    let pattern = DicePattern::new("#{count}x", true).unwrap();
    ctx.registry()
        .write()
        .dice_mut()
        .add_user_dice(Dice::Extension(ExtensionDice::new("Broken", pattern, handle)))
        .unwrap();

    let err = ctx.roll(&RollExpression::new("3x")).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::FunctionFailed {
            name: "Dice Roll(Broken)".to_string(),
            message: "table missing".to_string(),
        }
    );
    assert_eq!(err.category(), ErrorCategory::Function);
    assert_eq!(err.notes.len(), 1);
}

#[test]
fn test_user_dice_take_precedence() {
    let mut ctx = context();
    let handle = ExtensionHandle::from_fn(|_, _| Ok(DataValue::long(42)));
    let pattern = DicePattern::new("#{number:1}d#{sides}", true).unwrap();
    ctx.registry()
        .write()
        .dice_mut()
        .add_user_dice(Dice::Extension(ExtensionDice::new("Loaded", pattern, handle)))
        .unwrap();

    assert_eq!(ctx.roll(&RollExpression::new("2d6")).unwrap().as_long().unwrap(), 42);
}

#[test]
fn test_same_tier_dispatch_follows_registration_order() {
    let mut roller = DiceRoller::with_builtins().unwrap();
    let first = ExtensionHandle::from_fn(|_, _| Ok(DataValue::long(1)));
    let second = ExtensionHandle::from_fn(|_, _| Ok(DataValue::long(2)));
    roller
        .add_user_dice(Dice::Extension(ExtensionDice::new(
            "First",
            DicePattern::new("#{n1}z", true).unwrap(),
            first,
        )))
        .unwrap();
    roller
        .add_user_dice(Dice::Extension(ExtensionDice::new(
            "Second",
            DicePattern::new("#{n2}z", true).unwrap(),
            second,
        )))
        .unwrap();

    let matched = roller.find(&RollExpression::new("5z")).unwrap();
    assert_eq!(matched.name(), "First");
    assert!(roller.remove_user_dice("First"));
    assert_eq!(roller.find(&RollExpression::new("5z")).unwrap().name(), "Second");
}

#[test]
fn test_duplicate_dice_names_rejected() {
    let mut roller = DiceRoller::with_builtins().unwrap();
    roller.add_user_dice(fudge_dice()).unwrap();
    let err = roller.add_user_dice(fudge_dice()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::DuplicateDefinition);

    let standard = Dice::Standard(StandardDice::new().unwrap());
    assert!(roller.add_user_dice(standard).is_err());

    roller.clear_user_dice();
    assert!(roller.user_dice().is_empty());
    assert_eq!(roller.builtin_dice().len(), 1);
    assert_eq!(roller.builtin_dice()[0].name(), STANDARD_DICE_NAME);
}

#[test]
fn test_extension_dice_signature() {
    let Dice::Extension(dice) = fudge_dice() else {
        panic!("expected extension dice");
    };
    assert_eq!(
        dice.function().definition().to_string(),
        "Dice Roll(Fudge)(number: double) -> result"
    );
}
