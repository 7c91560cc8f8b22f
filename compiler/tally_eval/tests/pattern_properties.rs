//! Property-based tests for dice patterns and standard rolls.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::uninlined_format_args,
    reason = "Proptest macros generate code with these patterns"
)]

use proptest::prelude::*;
use tally_eval::{DicePattern, RandomSource, StandardDice};
use tally_value::DataValue;

proptest! {
    #[test]
    fn omitted_optional_argument_takes_default(default in 0i64..1000, sides in 1i64..10_000) {
        let template = format!("#{{number:{default}}}d#{{sides}}");
        let pattern = DicePattern::new(&template, true).unwrap();

        let notation = format!("d{sides}");
        prop_assert!(pattern.matches(&notation));
        let args = pattern.extract_args(&notation).unwrap();
        prop_assert_eq!(args.get("number"), Some(default));
        prop_assert_eq!(args.get("sides"), Some(sides));
    }

    #[test]
    fn present_arguments_are_parsed(number in 0i64..1000, sides in 1i64..10_000) {
        let pattern = DicePattern::new("#{number:1}d#{sides}", true).unwrap();
        let args = pattern.extract_args(&format!("{number}D{sides}")).unwrap();
        prop_assert_eq!(args.get("number"), Some(number));
        prop_assert_eq!(args.get("sides"), Some(sides));
    }

    #[test]
    fn standard_rolls_stay_in_range(seed in any::<u64>(), number in 0i64..40, sides in 1i64..100) {
        let random = RandomSource::seeded(seed);
        let value = StandardDice::roll_values(&random, number, sides, false, true).unwrap();
        let result = value.as_roll_result().unwrap();

        let rolls: Vec<i64> = result
            .individual_values()
            .iter()
            .map(|v| v.as_long().unwrap())
            .collect();
        prop_assert_eq!(rolls.len(), usize::try_from(number).unwrap());
        prop_assert!(rolls.iter().all(|r| (1..=sides).contains(r)));
        prop_assert_eq!(result.value(), &DataValue::long(rolls.iter().sum()));
    }
}
