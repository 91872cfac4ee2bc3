//! Property-based tests for knot-vector compression
//!
//! Generates well-formed flattened knot vectors with known multiplicities
//! and verifies that compressing then re-expanding reproduces the input
//! exactly, and that the compressed form matches the generator.

use ocx_reader::{KNOT_MERGE_TOLERANCE, KnotVector};
use proptest::prelude::*;

/// Generate (unique knots, multiplicities) with adjacent knots spaced at
/// least one tolerance apart so compression cannot merge across knots.
fn knot_run_strategy() -> impl Strategy<Value = (Vec<f64>, Vec<u32>)> {
    prop::collection::vec((2.0 * KNOT_MERGE_TOLERANCE..10.0f64, 1u32..5), 1..12).prop_map(
        |runs| {
            let mut knots = Vec::new();
            let mut mults = Vec::new();
            let mut value = 0.0;
            for (delta, mult) in runs {
                value += delta;
                knots.push(value);
                mults.push(mult);
            }
            (knots, mults)
        },
    )
}

proptest! {
    #[test]
    fn compress_then_expand_round_trips((knots, mults) in knot_run_strategy()) {
        let mut flattened = Vec::new();
        for (knot, mult) in knots.iter().zip(&mults) {
            for _ in 0..*mult {
                flattened.push(*knot);
            }
        }
        let text = flattened
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");

        let parsed = KnotVector::parse(&text, flattened.len());
        prop_assert!(parsed.is_valid);
        prop_assert_eq!(&parsed.knots, &knots);
        prop_assert_eq!(&parsed.multiplicities, &mults);
        prop_assert_eq!(parsed.expand(), flattened);

        // The multiplicity sum always equals the supplied token count.
        let total: u32 = parsed.multiplicities.iter().sum();
        prop_assert_eq!(total as usize, parsed.expand().len());
    }

    #[test]
    fn wrong_declared_count_never_panics(text in "[0-9 .]{0,40}", declared in 0usize..20) {
        let parsed = KnotVector::parse(&text, declared);
        if parsed.is_valid {
            let total: u32 = parsed.multiplicities.iter().sum();
            prop_assert_eq!(total as usize, declared);
        }
    }
}
