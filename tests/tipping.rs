use fuzzy_tip::{
    category_of, configure, AggregatedOutput, DefuzzMethod, Error, Rating, Rule, TipCategory, TipEngine, TipLevel,
};

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
}

#[test]
fn test_zero_stars_tips_nothing() {
    let engine = configure().unwrap();

    for method in [DefuzzMethod::Lom, DefuzzMethod::Centroid] {
        let tip = engine.infer_and_defuzzify(0., 0., method);

        assert_eq!(tip, 0., "{method}");
        assert_eq!(category_of(tip).as_str(), "none");
    }

    let aggregated = engine.infer(0., 0.);

    // Only the zero singleton survives
    assert_eq!(aggregated.degrees()[0], 1.);
    assert!(aggregated.degrees()[1..].iter().all(|d| *d == 0.));
}

#[test]
fn test_five_stars_tips_the_maximum() {
    let engine = configure().unwrap();
    let tip = engine.infer_and_defuzzify(5., 5., DefuzzMethod::Lom);

    assert!(tip >= 14.);
    assert_eq!(tip, 15.);
    assert_eq!(category_of(tip).as_str(), "very high");
    assert_eq!(engine.infer_and_defuzzify(5., 5., DefuzzMethod::Centroid), 15.);
}

#[test]
fn test_mid_scale_lands_in_medium_band() {
    let engine = configure().unwrap();
    let firings = engine.evaluate_all(2.5, 2.5);
    let fired: Vec<_> = firings.iter().filter(|(_, s)| *s > 0.).collect();

    assert_eq!(fired.len(), 1);
    assert_eq!(*fired[0].0, Rule::new(Rating::Average, Rating::Average, TipLevel::Medium));

    let lom = engine.recommend(2.5, 2.5, DefuzzMethod::Lom);

    assert_eq!(lom.tip, 10.);
    assert_eq!(lom.category, TipCategory::Medium);

    let centroid = engine.recommend(2.5, 2.5, DefuzzMethod::Centroid);

    assert_close(centroid.tip, 9.);
    assert_eq!(centroid.category, TipCategory::Medium);
}

#[test]
fn test_zero_rating_on_one_side_tips_very_low() {
    let engine = configure().unwrap();

    // average(3) = good(3) = 0.5, both paired with absent service
    let aggregated = engine.infer(0., 3.);

    assert_eq!(aggregated.height(), 0.5);
    assert_eq!(aggregated.defuzzify(DefuzzMethod::Lom), 3.);
    assert_eq!(aggregated.defuzzify(DefuzzMethod::Som), 0.);
    assert_eq!(category_of(3.), TipCategory::Low);
}

#[test]
fn test_rule_order_is_preserved() {
    let engine = configure().unwrap();
    let firings = engine.evaluate_all(1., 4.);
    let rules: Vec<Rule<Rating, Rating, TipLevel>> = firings.iter().map(|(rule, _)| **rule).collect();

    assert_eq!(rules, engine.rules().rules());
    assert_eq!(rules[0], Rule::new(Rating::Absent, Rating::Absent, TipLevel::Zero));
    assert_eq!(rules[35], Rule::new(Rating::Excellent, Rating::Excellent, TipLevel::VeryHigh));
}

#[test]
fn test_out_of_range_ratings_are_clamped() {
    let engine = configure().unwrap();

    assert_eq!(
        engine.infer_and_defuzzify(7., 12., DefuzzMethod::Lom),
        engine.infer_and_defuzzify(5., 5., DefuzzMethod::Lom)
    );
    assert_eq!(
        engine.infer_and_defuzzify(-1., f64::NAN, DefuzzMethod::Centroid),
        engine.infer_and_defuzzify(0., 0., DefuzzMethod::Centroid)
    );
}

#[test]
fn test_degenerate_all_zero_curve() {
    let engine = configure().unwrap();
    let universe = engine.output().universe();
    let empty = AggregatedOutput::new(universe, vec![0.; universe.len()]).unwrap();

    assert!(empty.is_empty());
    assert_eq!(empty.defuzzify(DefuzzMethod::Centroid), 0.);
    // Every sample ties at zero, so the last one wins
    assert_eq!(empty.defuzzify(DefuzzMethod::Lom), 15.);
}

#[test]
fn test_unsupported_method_name() {
    assert!(matches!(
        "median".parse::<DefuzzMethod>(),
        Err(Error::InvalidConfiguration(msg)) if msg.contains("median")
    ));
    assert_eq!("lom".parse::<DefuzzMethod>(), Ok(DefuzzMethod::Lom));
}

#[test]
fn test_engine_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TipEngine>();

    let engine = configure().unwrap();
    let inputs: Vec<(f64, f64)> = (0..=20).map(|i| (i as f64 / 4., 5. - i as f64 / 4.)).collect();
    let sequential: Vec<f64> = inputs
        .iter()
        .map(|&(s, f)| engine.infer_and_defuzzify(s, f, DefuzzMethod::Centroid))
        .collect();

    let parallel: Vec<f64> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|&(s, f)| {
                let engine = &engine;
                scope.spawn(move || engine.infer_and_defuzzify(s, f, DefuzzMethod::Centroid))
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, parallel);
}
