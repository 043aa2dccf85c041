//! Property-based tests for membership functions and inference

use std::sync::OnceLock;

use fuzzy_tip::{configure, DefuzzMethod, Rating, Shape, Term, TipEngine, TipLevel};
use proptest::prelude::*;

fn engine() -> &'static TipEngine {
    static ENGINE: OnceLock<TipEngine> = OnceLock::new();

    ENGINE.get_or_init(|| configure().expect("canonical config builds"))
}

/// Three ordered points with a < b < c
fn ordered_triple() -> impl Strategy<Value = (f64, f64, f64)> {
    (-50.0..50.0f64, 0.01..20.0f64, 0.01..20.0f64).prop_map(|(a, w1, w2)| (a, a + w1, a + w1 + w2))
}

fn any_method() -> impl Strategy<Value = DefuzzMethod> {
    prop_oneof![
        Just(DefuzzMethod::Centroid),
        Just(DefuzzMethod::Bisector),
        Just(DefuzzMethod::Mom),
        Just(DefuzzMethod::Lom),
        Just(DefuzzMethod::Som),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn membership_stays_in_unit_interval(x in -2.0..7.0f64) {
        let engine = engine();

        for &term in Rating::ALL {
            let service = engine.first().membership_of(term, x).unwrap();
            let food = engine.second().membership_of(term, x).unwrap();

            prop_assert!((0.0..=1.0).contains(&service), "{} at {x}: {service}", term.name());
            prop_assert!((0.0..=1.0).contains(&food), "{} at {x}: {food}", term.name());
        }
    }

    #[test]
    fn triangle_peaks_at_b_and_vanishes_at_feet((a, b, c) in ordered_triple(), t in 0.0..1.0f64) {
        let shape = Shape::triangular(a, b, c);

        prop_assert_eq!(shape.degree(b), 1.);
        prop_assert_eq!(shape.degree(a), 0.);
        prop_assert_eq!(shape.degree(c), 0.);

        // Rising then falling
        let left = a + t * (b - a);
        let right = b + t * (c - b);
        prop_assert!(shape.degree(left) <= shape.degree(b));
        prop_assert!(shape.degree(right) <= shape.degree(b));
        prop_assert!(shape.degree(a + t * t * (b - a)) <= shape.degree(left) + 1e-12);
    }

    #[test]
    fn trapezoid_is_one_on_its_plateau((a, b, c) in ordered_triple(), width in 0.0..10.0f64, t in 0.0..=1.0f64) {
        let shape = Shape::trapezoidal(a, b, c, c + width);
        let x = (b + t * (c - b)).clamp(b, c);

        prop_assert_eq!(shape.degree(x), 1.);
    }

    #[test]
    fn aggregation_is_monotone_in_firing_strength(
        strengths in prop::collection::vec(0.0..=1.0f64, 36),
        bumps in prop::collection::vec(0.0..=1.0f64, 36),
    ) {
        let engine = engine();
        let rules = engine.rules().rules();
        let stronger: Vec<f64> = strengths.iter().zip(&bumps).map(|(s, d)| (s + d).min(1.)).collect();

        let base = engine.aggregate(rules.iter().zip(strengths.iter().copied()));
        let bumped = engine.aggregate(rules.iter().zip(stronger.iter().copied()));

        for (i, (lo, hi)) in base.degrees().iter().zip(bumped.degrees()).enumerate() {
            prop_assert!(lo <= hi, "sample {i}: {lo} > {hi}");
        }
    }

    #[test]
    fn recommendation_stays_on_the_tip_scale(
        service in -1.0..6.0f64,
        food in -1.0..6.0f64,
        method in any_method(),
    ) {
        let engine = engine();
        let aggregated = engine.infer(service, food);

        prop_assert!(aggregated.degrees().iter().all(|d| (0.0..=1.0).contains(d)));
        prop_assert!(aggregated.height() > 0., "no rule fired for ({service}, {food})");

        let tip = engine.infer_and_defuzzify(service, food, method);

        prop_assert!((0.0..=15.0).contains(&tip), "{method} gave {tip}");
    }

    #[test]
    fn consequent_terms_are_clipped_not_exceeded(service in 0.0..=5.0f64, food in 0.0..=5.0f64) {
        let engine = engine();
        let firings = engine.evaluate_all(service, food);
        let aggregated = engine.infer(service, food);
        let peak = firings.iter().map(|(_, s)| *s).fold(0., f64::max);

        prop_assert!(aggregated.height() <= peak + 1e-12);

        for &term in TipLevel::ALL {
            prop_assert!(engine.output().contains_term(term));
        }
    }
}
