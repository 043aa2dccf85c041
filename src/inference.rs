use tracing::{debug, info, instrument, warn};

use crate::defuzz::DefuzzMethod;
use crate::error::{Error, Result};
use crate::ops::InferenceOps;
use crate::rules::{Rule, RuleBase};
use crate::terms::Term;
use crate::universe::Universe;
use crate::variable::LinguisticVariable;

/// The fuzzy output set of one inference, sampled over the consequent universe.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedOutput<'u> {
    universe: &'u Universe,
    degrees: Vec<f64>,
}

impl<'u> AggregatedOutput<'u> {
    /// Wraps an arbitrary curve over `universe`. It must have one degree per
    /// sample, each in `[0, 1]`.
    pub fn new(universe: &'u Universe, degrees: Vec<f64>) -> Result<Self> {
        if degrees.len() != universe.len() {
            return Err(Error::InvalidConfiguration(format!(
                "aggregated output has {} samples, universe has {}",
                degrees.len(),
                universe.len()
            )));
        }
        if let Some((index, &value)) = degrees
            .iter()
            .enumerate()
            .find(|(_, d)| !(0. ..=1.).contains(*d))
        {
            return Err(Error::InvalidDegree { index, value });
        }

        Ok(Self { universe, degrees })
    }

    fn zeros(universe: &'u Universe) -> Self {
        Self {
            universe,
            degrees: vec![0.; universe.len()],
        }
    }

    pub fn universe(&self) -> &'u Universe {
        self.universe
    }

    pub fn degrees(&self) -> &[f64] {
        &self.degrees
    }

    /// Highest degree anywhere on the curve.
    pub fn height(&self) -> f64 {
        self.degrees.iter().copied().fold(0., f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.degrees.iter().all(|d| *d == 0.)
    }

    pub fn defuzzify(&self, method: DefuzzMethod) -> f64 {
        let value = method.call(self.universe.samples(), &self.degrees);

        debug!(%method, value, "defuzzified");

        value
    }
}

/// A two-input Mamdani inference engine.
///
/// Everything is validated in [`InferenceEngine::new`]; afterwards the engine is
/// read-only and can be shared between threads.
pub struct InferenceEngine<A: Term, B: Term, C: Term> {
    first: LinguisticVariable<A>,
    second: LinguisticVariable<B>,
    output: LinguisticVariable<C>,
    rules: RuleBase<A, B, C>,
    ops: InferenceOps,
}

impl<A: Term, B: Term, C: Term> InferenceEngine<A, B, C> {
    pub fn new(
        first: LinguisticVariable<A>,
        second: LinguisticVariable<B>,
        output: LinguisticVariable<C>,
        rules: RuleBase<A, B, C>,
        ops: InferenceOps,
    ) -> Result<Self> {
        if rules.is_empty() {
            return Err(Error::InvalidConfiguration("rule base is empty".into()));
        }

        rules.validate(&first, &second, &output)?;

        info!(
            first = first.name(),
            second = second.name(),
            output = output.name(),
            rules = rules.len(),
            output_samples = output.universe().len(),
            ?ops,
            "inference engine built"
        );

        Ok(Self {
            first,
            second,
            output,
            rules,
            ops,
        })
    }

    pub fn first(&self) -> &LinguisticVariable<A> {
        &self.first
    }

    pub fn second(&self) -> &LinguisticVariable<B> {
        &self.second
    }

    pub fn output(&self) -> &LinguisticVariable<C> {
        &self.output
    }

    pub fn rules(&self) -> &RuleBase<A, B, C> {
        &self.rules
    }

    pub fn ops(&self) -> InferenceOps {
        self.ops
    }

    /// Firing strength of every rule, in rule order. Inputs are clamped to
    /// their universes first.
    pub fn evaluate_all(&self, a: f64, b: f64) -> Vec<(&Rule<A, B, C>, f64)> {
        let a = clamp_input(&self.first, a);
        let b = clamp_input(&self.second, b);

        self.rules.evaluate_all(&self.first, &self.second, a, b, self.ops.and)
    }

    /// Implies every fired rule onto its consequent and aggregates the results.
    pub fn aggregate<'r>(&self, firings: impl IntoIterator<Item = (&'r Rule<A, B, C>, f64)>) -> AggregatedOutput<'_> {
        let mut aggregated = AggregatedOutput::zeros(self.output.universe());
        let mut fired = 0usize;

        for (rule, strength) in firings {
            // Zero strength implies an all-zero curve, which every aggregation
            // operator absorbs
            if strength.is_nan() || strength <= 0. {
                continue;
            }

            let strength = strength.min(1.);

            let Some(membership) = self.output.membership(rule.consequent) else {
                continue;
            };

            fired += 1;

            for (agg, &mu) in aggregated.degrees.iter_mut().zip(membership.degrees()) {
                let implied = self.ops.implication.call(strength, mu);
                *agg = self.ops.aggregation.call(*agg, implied);
            }
        }

        debug!(fired, height = aggregated.height(), "aggregated rule outputs");

        aggregated
    }

    /// Runs fuzzification, rule evaluation, implication and aggregation.
    pub fn infer(&self, a: f64, b: f64) -> AggregatedOutput<'_> {
        let firings = self.evaluate_all(a, b);

        self.aggregate(firings)
    }

    /// The whole pipeline. The result is clamped to the output universe.
    #[instrument(level = "debug", skip(self))]
    pub fn infer_and_defuzzify(&self, a: f64, b: f64, method: DefuzzMethod) -> f64 {
        let value = self.infer(a, b).defuzzify(method);

        self.output.universe().clamp(value)
    }
}

fn clamp_input<K: Term>(var: &LinguisticVariable<K>, value: f64) -> f64 {
    let clamped = var.universe().clamp(value);

    if value.is_nan() {
        warn!(variable = var.name(), clamped, "input is NaN");
    } else if clamped != value {
        warn!(variable = var.name(), value, clamped, "input outside universe, clamping");
    }

    clamped
}

#[cfg(test)]
type TestEngine = InferenceEngine<crate::terms::Rating, crate::terms::Rating, crate::terms::TipLevel>;

#[cfg(test)]
fn test_engine(ops: InferenceOps) -> TestEngine {
    use crate::rules::DecisionTable;
    use crate::shape::Shape;
    use crate::terms::{Rating, TipLevel};

    let mut service = LinguisticVariable::new("service", Universe::new(0., 10., 101).unwrap());
    let mut food = LinguisticVariable::new("food", Universe::new(0., 10., 101).unwrap());

    for var in [&mut service, &mut food] {
        var.add_term(Rating::Poor, &Shape::trapezoidal(0., 0., 2., 6.))
            .unwrap()
            .add_term(Rating::Good, &Shape::trapezoidal(4., 8., 10., 10.))
            .unwrap();
    }

    let mut tip = LinguisticVariable::new("tip", Universe::new(0., 30., 301).unwrap());
    tip.add_term(TipLevel::Low, &Shape::triangular(0., 5., 10.))
        .unwrap()
        .add_term(TipLevel::Medium, &Shape::triangular(10., 15., 20.))
        .unwrap()
        .add_term(TipLevel::High, &Shape::triangular(20., 25., 30.))
        .unwrap();

    let table = DecisionTable {
        rows: vec![Rating::Poor, Rating::Good],
        columns: vec![Rating::Poor, Rating::Good],
        cells: vec![
            vec![TipLevel::Low, TipLevel::Medium],
            vec![TipLevel::Medium, TipLevel::High],
        ],
    };

    InferenceEngine::new(service, food, tip, RuleBase::new(table.expand().unwrap()), ops).unwrap()
}

#[test]
fn test_single_rule_is_clipped() {
    let engine = test_engine(InferenceOps::default());
    let aggregated = engine.infer(1., 1.);

    // Only poor/poor fires, fully
    assert_eq!(aggregated.height(), 1.);
    assert_eq!(aggregated.degrees()[50], 1.);
    assert!(aggregated.degrees()[100..].iter().all(|d| *d == 0.));
    assert!((aggregated.defuzzify(DefuzzMethod::Centroid) - 5.).abs() < 1e-9);
    assert_eq!(aggregated.defuzzify(DefuzzMethod::Lom), 5.);
}

#[test]
fn test_partial_firing_clips_and_aggregates() {
    let engine = test_engine(InferenceOps::default());

    // poor(5) = 0.25, good(5) = 0.25
    let firings = engine.evaluate_all(5., 1.);
    let strengths: Vec<f64> = firings.iter().map(|(_, s)| *s).collect();

    assert_eq!(strengths, vec![0.25, 0., 0.25, 0.]);

    let aggregated = engine.aggregate(firings);

    assert_eq!(aggregated.height(), 0.25);
    // low and medium are both clipped at 0.25, high stays empty
    assert_eq!(aggregated.degrees()[50], 0.25);
    assert_eq!(aggregated.degrees()[150], 0.25);
    assert_eq!(aggregated.degrees()[250], 0.);
    assert!((aggregated.defuzzify(DefuzzMethod::Centroid) - 10.).abs() < 1e-9);
    // the last sample at the plateau height is on medium's falling edge
    assert_eq!(aggregated.defuzzify(DefuzzMethod::Lom), 18.7);
}

#[test]
fn test_larsen_scales_instead_of_clipping() {
    use crate::ops::ImplicationOp;

    let engine = test_engine(InferenceOps {
        implication: ImplicationOp::Scale,
        ..InferenceOps::default()
    });
    let aggregated = engine.infer(5., 1.);

    assert_eq!(aggregated.degrees()[50], 0.25);
    assert!((aggregated.degrees()[40] - 0.2).abs() < 1e-12);
}

#[test]
fn test_out_of_range_inputs_are_clamped() {
    let engine = test_engine(InferenceOps::default());

    assert_eq!(engine.infer(-50., -1.), engine.infer(0., 0.));
    assert_eq!(engine.infer(99., 10.5), engine.infer(10., 10.));
    assert_eq!(engine.infer(f64::NAN, 0.), engine.infer(0., 0.));
    assert_eq!(engine.infer_and_defuzzify(99., 99., DefuzzMethod::Lom), 25.);
}

#[test]
fn test_unknown_term_fails_at_construction() {
    use crate::rules::Rule;
    use crate::terms::{Rating, TipLevel};

    let engine = test_engine(InferenceOps::default());
    let InferenceEngine {
        first,
        second,
        output,
        ..
    } = engine;
    let rules = RuleBase::new(vec![
        Rule::new(Rating::Poor, Rating::Poor, TipLevel::Low),
        Rule::new(Rating::Excellent, Rating::Poor, TipLevel::Low),
    ]);

    assert_eq!(
        InferenceEngine::new(first, second, output, rules, InferenceOps::default()).err(),
        Some(Error::UnknownTerm {
            rule: 1,
            variable: "service".into(),
            term: "excellent"
        })
    );
}

#[test]
fn test_aggregated_output_new() {
    let universe = Universe::new(0., 1., 3).unwrap();

    assert!(AggregatedOutput::new(&universe, vec![0., 1., 0.]).is_ok());
    assert!(matches!(
        AggregatedOutput::new(&universe, vec![0., 1.]),
        Err(Error::InvalidConfiguration(_))
    ));
    assert!(matches!(
        AggregatedOutput::new(&universe, vec![0., -0.5, 0.]),
        Err(Error::InvalidDegree { index: 1, .. })
    ));
}

#[test]
fn test_aggregate_ignores_nan_and_caps_strength() {
    let engine = test_engine(InferenceOps::default());
    let rules = engine.rules().rules();

    let aggregated = engine.aggregate(rules.iter().map(|rule| (rule, f64::NAN)));

    assert!(aggregated.is_empty());
    assert_eq!(aggregated.height(), 0.);

    let aggregated = engine.aggregate(rules.iter().take(1).map(|rule| (rule, 3.)));

    assert_eq!(aggregated.height(), 1.);
    assert!(aggregated.degrees().iter().all(|d| (0. ..=1.).contains(d)));
}
