//! Mamdani fuzzy inference for recommending a tip from a service rating and a
//! food rating.
//!
//! ```
//! use fuzzy_tip::{category_of, configure, DefuzzMethod};
//!
//! let engine = configure()?;
//! let tip = engine.infer_and_defuzzify(5., 5., DefuzzMethod::Lom);
//!
//! assert_eq!(tip, 15.);
//! assert_eq!(category_of(tip).as_str(), "very high");
//! # Ok::<(), fuzzy_tip::Error>(())
//! ```

mod config;
mod defuzz;
mod error;
mod inference;
mod linspace;
mod math;
mod ops;
mod rules;
mod shape;
mod terms;
mod tipper;
mod universe;
mod variable;

pub use config::{TipperConfig, UniverseConfig, VariableConfig};
pub use defuzz::DefuzzMethod;
pub use error::{Error, Result};
pub use inference::{AggregatedOutput, InferenceEngine};
pub use ops::{AggregationOp, AndOp, ImplicationOp, InferenceOps};
pub use rules::{DecisionTable, Rule, RuleBase};
pub use shape::{MembershipFunction, Shape};
pub use terms::{Key, Rating, Term, TipLevel};
pub use tipper::{category_of, configure, Recommendation, TipCategory, TipEngine};
pub use universe::Universe;
pub use variable::LinguisticVariable;
