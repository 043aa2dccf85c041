use std::fmt;

use tracing::debug;

use crate::config::TipperConfig;
use crate::defuzz::DefuzzMethod;
use crate::error::Result;
use crate::inference::InferenceEngine;
use crate::terms::{Rating, TipLevel};

/// Engine mapping a service rating and a food rating to a tip percentage.
pub type TipEngine = InferenceEngine<Rating, Rating, TipLevel>;

/// Builds the canonical tipping engine.
pub fn configure() -> Result<TipEngine> {
    TipperConfig::default().build()
}

/// Coarse label for a defuzzified tip.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum TipCategory {
    None,
    Low,
    Medium,
    High,
    VeryHigh,
}

/// Lower bounds, checked from the top. A tip must be strictly above a bound to
/// earn its label.
const CATEGORY_THRESHOLDS: [(f64, TipCategory); 4] = [
    (14., TipCategory::VeryHigh),
    (12., TipCategory::High),
    (8., TipCategory::Medium),
    (1., TipCategory::Low),
];

impl TipCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very high",
        }
    }
}

impl fmt::Display for TipCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a tip percentage. Performs no fuzzy computation.
pub fn category_of(tip: f64) -> TipCategory {
    CATEGORY_THRESHOLDS
        .iter()
        .find(|(threshold, _)| tip > *threshold)
        .map_or(TipCategory::None, |&(_, category)| category)
}

/// A tip percentage together with its label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Recommendation {
    pub tip: f64,
    pub category: TipCategory,
}

impl TipEngine {
    /// Runs the full pipeline and labels the result.
    pub fn recommend(&self, service: f64, food: f64, method: DefuzzMethod) -> Recommendation {
        let tip = self.infer_and_defuzzify(service, food, method);
        let category = category_of(tip);

        debug!(service, food, %method, tip, %category, "recommended tip");

        Recommendation { tip, category }
    }
}

#[test]
fn test_category_thresholds() {
    assert_eq!(category_of(15.), TipCategory::VeryHigh);
    assert_eq!(category_of(14.01), TipCategory::VeryHigh);
    assert_eq!(category_of(14.), TipCategory::High);
    assert_eq!(category_of(12.5), TipCategory::High);
    assert_eq!(category_of(12.), TipCategory::Medium);
    assert_eq!(category_of(10.), TipCategory::Medium);
    assert_eq!(category_of(8.), TipCategory::Low);
    assert_eq!(category_of(1.5), TipCategory::Low);
    assert_eq!(category_of(1.), TipCategory::None);
    assert_eq!(category_of(0.), TipCategory::None);
    assert_eq!(category_of(-3.), TipCategory::None);
    assert_eq!(category_of(f64::NAN), TipCategory::None);
}

#[test]
fn test_category_labels() {
    assert_eq!(TipCategory::VeryHigh.as_str(), "very high");
    assert_eq!(TipCategory::None.to_string(), "none");
}
