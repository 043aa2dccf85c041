use num::Float;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// And operator method for combining the two antecedent degrees of a rule
/// into its firing strength.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AndOp {
    #[default]
    Min,
    Prod,
    BoundedProd,
}

impl AndOp {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Min => F::min(u, v),
            Self::Prod => u * v,
            Self::BoundedProd => F::max(F::zero(), u + v - F::one()),
        }
    }
}

/// Implication operator method for shaping a consequent membership function
/// by the firing strength of its rule.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ImplicationOp {
    /// Truncate the consequent at the firing strength (Mamdani)
    #[default]
    Clip,
    /// Scale the consequent by the firing strength (Larsen)
    Scale,
}

impl ImplicationOp {
    pub fn call<F: Float>(self, strength: F, membership: F) -> F {
        match self {
            Self::Clip => F::min(strength, membership),
            Self::Scale => strength * membership,
        }
    }
}

/// Method for aggregating the consequences of the fuzzy rules
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AggregationOp {
    #[default]
    Max,
    ProbOr,
    BoundedSum,
}

impl AggregationOp {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => F::max(u, v),
            Self::ProbOr => u + v - u * v,
            Self::BoundedSum => F::min(F::one(), u + v),
        }
    }
}

/// The operator set used by an inference engine. Defaults to Mamdani
/// min / clip / max.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InferenceOps {
    pub and: AndOp,
    pub implication: ImplicationOp,
    pub aggregation: AggregationOp,
}

#[test]
fn test_and_ops() {
    assert_eq!(AndOp::Min.call(0.3, 0.8), 0.3);
    assert_eq!(AndOp::Prod.call(0.5, 0.5), 0.25);
    assert_eq!(AndOp::BoundedProd.call(0.3, 0.5), 0.);
    assert_eq!(AndOp::BoundedProd.call(0.75, 0.5), 0.25);
}

#[test]
fn test_implication_ops() {
    assert_eq!(ImplicationOp::Clip.call(0.4, 1.), 0.4);
    assert_eq!(ImplicationOp::Clip.call(0.4, 0.1), 0.1);
    assert_eq!(ImplicationOp::Scale.call(0.5, 0.5), 0.25);
    assert_eq!(ImplicationOp::Clip.call(0., 1.), 0.);
    assert_eq!(ImplicationOp::Scale.call(0., 1.), 0.);
}

#[test]
fn test_aggregation_ops() {
    assert_eq!(AggregationOp::Max.call(0.2, 0.7), 0.7);
    assert_eq!(AggregationOp::ProbOr.call(0.5, 0.5), 0.75);
    assert_eq!(AggregationOp::BoundedSum.call(0.75, 0.5), 1.);

    for op in [AggregationOp::Max, AggregationOp::ProbOr, AggregationOp::BoundedSum] {
        assert_eq!(op.call(0.6, 0.), 0.6);
    }
}

#[test]
fn test_default_is_mamdani() {
    let ops = InferenceOps::default();

    assert_eq!(ops.and, AndOp::Min);
    assert_eq!(ops.implication, ImplicationOp::Clip);
    assert_eq!(ops.aggregation, AggregationOp::Max);
}
