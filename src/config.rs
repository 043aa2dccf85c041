#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ops::InferenceOps;
use crate::rules::{DecisionTable, Rule, RuleBase};
use crate::shape::Shape;
use crate::terms::{Rating, Term, TipLevel};
use crate::tipper::TipEngine;
use crate::universe::Universe;
use crate::variable::LinguisticVariable;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UniverseConfig {
    pub min: f64,
    pub max: f64,
    pub samples: usize,
}

impl UniverseConfig {
    pub fn build(&self) -> Result<Universe> {
        Universe::new(self.min, self.max, self.samples)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VariableConfig<K> {
    pub name: String,
    pub universe: UniverseConfig,
    pub terms: Vec<(K, Shape)>,
}

impl<K: Term> VariableConfig<K> {
    pub fn build(&self) -> Result<LinguisticVariable<K>> {
        let mut var = LinguisticVariable::new(self.name.clone(), self.universe.build()?);

        for (term, shape) in &self.terms {
            var.add_term(*term, shape)?;
        }

        Ok(var)
    }
}

/// Everything needed to build a [`TipEngine`].
///
/// The default is the canonical tipping system: two 0–5 star ratings and a
/// 0–15 % tip.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TipperConfig {
    pub service: VariableConfig<Rating>,
    pub food: VariableConfig<Rating>,
    pub tip: VariableConfig<TipLevel>,
    pub table: DecisionTable<Rating, Rating, TipLevel>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub overrides: Vec<Rule<Rating, Rating, TipLevel>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ops: InferenceOps,
}

impl TipperConfig {
    /// Validates the whole configuration and builds the engine, failing on the
    /// first error.
    pub fn build(&self) -> Result<TipEngine> {
        let service = self.service.build()?;
        let food = self.food.build()?;
        let tip = self.tip.build()?;
        let rules = RuleBase::from_table(&self.table, self.overrides.iter().copied())?;

        TipEngine::new(service, food, tip, rules, self.ops)
    }
}

fn rating_terms() -> Vec<(Rating, Shape)> {
    vec![
        (Rating::Absent, Shape::singleton(0.)),
        (Rating::Mediocre, Shape::trapezoidal(0.001, 0.1, 1., 1.5)),
        (Rating::Poor, Shape::triangular(0.5, 1.5, 2.5)),
        (Rating::Average, Shape::triangular(1.5, 2.5, 3.5)),
        (Rating::Good, Shape::triangular(2.5, 3.5, 4.5)),
        (Rating::Excellent, Shape::trapezoidal(3.5, 4.5, 5., 5.)),
    ]
}

impl Default for TipperConfig {
    fn default() -> Self {
        use Rating::*;
        use TipLevel::{High as H, Low as L, Medium as M, VeryHigh as VH, VeryLow as VL};

        let stars = UniverseConfig {
            min: 0.,
            max: 5.,
            samples: 501,
        };

        Self {
            service: VariableConfig {
                name: "service".into(),
                universe: stars,
                terms: rating_terms(),
            },
            food: VariableConfig {
                name: "food".into(),
                universe: stars,
                terms: rating_terms(),
            },
            tip: VariableConfig {
                name: "tip".into(),
                universe: UniverseConfig {
                    min: 0.,
                    max: 15.,
                    samples: 1501,
                },
                terms: vec![
                    (TipLevel::Zero, Shape::singleton(0.)),
                    (TipLevel::VeryLow, Shape::trapezoidal(0., 0., 2., 4.)),
                    (TipLevel::Low, Shape::trapezoidal(2., 4., 6., 8.)),
                    (TipLevel::Medium, Shape::trapezoidal(6., 8., 10., 12.)),
                    (TipLevel::High, Shape::trapezoidal(10., 12., 14., 14.99)),
                    (TipLevel::VeryHigh, Shape::singleton(15.)),
                ],
            },
            // Service down the side, food across the top
            table: DecisionTable {
                rows: vec![Absent, Mediocre, Poor, Average, Good, Excellent],
                columns: vec![Absent, Mediocre, Poor, Average, Good, Excellent],
                cells: vec![
                    vec![VL, VL, VL, VL, VL, VL],
                    vec![VL, L, L, L, M, M],
                    vec![VL, L, L, M, M, M],
                    vec![VL, M, M, M, H, H],
                    vec![VL, M, M, H, H, VH],
                    vec![VL, H, H, VH, VH, VH],
                ],
            },
            overrides: vec![Rule::new(Absent, Absent, TipLevel::Zero)],
            ops: InferenceOps::default(),
        }
    }
}

#[test]
fn test_default_config_builds() {
    let engine = TipperConfig::default().build().unwrap();

    assert_eq!(engine.rules().len(), 36);
    assert_eq!(engine.first().term_count(), 6);
    assert_eq!(engine.output().universe().len(), 1501);
    assert_eq!(engine.rules().rules()[0], Rule::new(Rating::Absent, Rating::Absent, TipLevel::Zero));
}

#[test]
fn test_config_errors_surface() {
    use crate::error::Error;

    let mut config = TipperConfig::default();
    config.tip.terms.retain(|(term, _)| *term != TipLevel::High);

    assert!(matches!(
        config.build(),
        Err(Error::UnknownTerm { variable, term: "high", .. }) if variable == "tip"
    ));

    let mut config = TipperConfig::default();
    config.food.terms[2].1 = Shape::triangular(2.5, 1.5, 0.5);

    assert!(matches!(config.build(), Err(Error::InvalidShape { .. })));

    let mut config = TipperConfig::default();
    config.service.universe.samples = 1;

    assert!(matches!(config.build(), Err(Error::InvalidUniverse { .. })));

    let mut config = TipperConfig::default();
    config.table.cells[3].truncate(4);

    assert!(matches!(config.build(), Err(Error::InvalidConfiguration(_))));

    let mut config = TipperConfig::default();
    config.tip.terms[5].1 = Shape::singleton(14.995);

    assert!(matches!(config.build(), Err(Error::SingletonOffGrid { .. })));
}

#[cfg(feature = "serde")]
#[test]
fn test_config_from_json() {
    let json = serde_json::to_string(&TipperConfig::default()).unwrap();
    let config: TipperConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(config, TipperConfig::default());

    let shape: Shape = serde_json::from_str(r#"{"shape": "triangular", "a": 0.0, "b": 1.0, "c": 2.0}"#).unwrap();

    assert_eq!(shape, Shape::triangular(0., 1., 2.));
    assert!(serde_json::from_str::<Rating>(r#""stellar""#).is_err());
}
