#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};
use crate::ops::AndOp;
use crate::terms::Term;
use crate::variable::LinguisticVariable;

/// `IF a IS antecedent_a AND b IS antecedent_b THEN out IS consequent`
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rule<A, B, C> {
    pub antecedent_a: A,
    pub antecedent_b: B,
    pub consequent: C,
}

impl<A, B, C> Rule<A, B, C> {
    pub fn new(antecedent_a: A, antecedent_b: B, consequent: C) -> Self {
        Self {
            antecedent_a,
            antecedent_b,
            consequent,
        }
    }
}

/// A rule matrix: one row per `A` term, one column per `B` term, and the
/// consequent term in each cell.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecisionTable<A, B, C> {
    pub rows: Vec<A>,
    pub columns: Vec<B>,
    pub cells: Vec<Vec<C>>,
}

impl<A: Copy, B: Copy, C: Copy> DecisionTable<A, B, C> {
    /// Expands the table into rules, row by row.
    pub fn expand(&self) -> Result<Vec<Rule<A, B, C>>> {
        if self.cells.len() != self.rows.len() {
            return Err(Error::InvalidConfiguration(format!(
                "decision table has {} rows of cells for {} row terms",
                self.cells.len(),
                self.rows.len()
            )));
        }

        let mut rules = Vec::with_capacity(self.rows.len() * self.columns.len());

        for (i, (&a, row)) in self.rows.iter().zip(&self.cells).enumerate() {
            if row.len() != self.columns.len() {
                return Err(Error::InvalidConfiguration(format!(
                    "decision table row {i} has {} cells, expected {}",
                    row.len(),
                    self.columns.len()
                )));
            }

            rules.extend(self.columns.iter().zip(row).map(|(&b, &c)| Rule::new(a, b, c)));
        }

        Ok(rules)
    }
}

/// An ordered, immutable set of two-antecedent rules.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleBase<A, B, C>(pub(crate) Vec<Rule<A, B, C>>);

impl<A: Term, B: Term, C: Term> RuleBase<A, B, C> {
    pub fn new(rules: Vec<Rule<A, B, C>>) -> Self {
        RuleBase(rules)
    }

    /// Expands `table`, then applies `overrides`.
    ///
    /// An override replaces the consequent of the rule with the same antecedent
    /// pair, keeping its position. Overrides with no matching pair are appended.
    pub fn from_table(
        table: &DecisionTable<A, B, C>,
        overrides: impl IntoIterator<Item = Rule<A, B, C>>,
    ) -> Result<Self> {
        let mut rules = table.expand()?;

        for rule in overrides {
            match rules
                .iter_mut()
                .find(|r| r.antecedent_a == rule.antecedent_a && r.antecedent_b == rule.antecedent_b)
            {
                Some(existing) => existing.consequent = rule.consequent,
                None => rules.push(rule),
            }
        }

        Ok(RuleBase(rules))
    }

    /// Fails on the first rule whose terms are missing from their variables.
    pub fn validate(
        &self,
        first: &LinguisticVariable<A>,
        second: &LinguisticVariable<B>,
        output: &LinguisticVariable<C>,
    ) -> Result<()> {
        fn check<K: Term>(rule: usize, var: &LinguisticVariable<K>, term: K) -> Result<()> {
            if var.contains_term(term) {
                Ok(())
            } else {
                Err(Error::UnknownTerm {
                    rule,
                    variable: var.name().to_owned(),
                    term: term.name(),
                })
            }
        }

        for (i, rule) in self.0.iter().enumerate() {
            check(i, first, rule.antecedent_a)?;
            check(i, second, rule.antecedent_b)?;
            check(i, output, rule.consequent)?;
        }

        Ok(())
    }

    /// Firing strength of every rule for the crisp inputs `a` and `b`, in rule
    /// order.
    ///
    /// Terms missing from a variable fire with zero strength; `validate` rejects
    /// such rule bases up front.
    pub fn evaluate_all(
        &self,
        first: &LinguisticVariable<A>,
        second: &LinguisticVariable<B>,
        a: f64,
        b: f64,
        and_op: AndOp,
    ) -> Vec<(&Rule<A, B, C>, f64)> {
        let degrees_a = first.fuzzify(a);
        let degrees_b = second.fuzzify(b);

        self.0
            .iter()
            .map(|rule| {
                let mu_a = degrees_a.get(rule.antecedent_a).copied().unwrap_or(0.);
                let mu_b = degrees_b.get(rule.antecedent_b).copied().unwrap_or(0.);
                let strength = and_op.call(mu_a, mu_b);

                trace!(
                    a = rule.antecedent_a.name(),
                    b = rule.antecedent_b.name(),
                    consequent = rule.consequent.name(),
                    strength,
                    "rule fired"
                );

                (rule, strength)
            })
            .collect()
    }

    pub fn rules(&self) -> &[Rule<A, B, C>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
fn small_table() -> DecisionTable<crate::terms::Rating, crate::terms::Rating, crate::terms::TipLevel> {
    use crate::terms::{Rating::*, TipLevel};

    DecisionTable {
        rows: vec![Poor, Good],
        columns: vec![Poor, Good],
        cells: vec![
            vec![TipLevel::Low, TipLevel::Medium],
            vec![TipLevel::Medium, TipLevel::High],
        ],
    }
}

#[test]
fn test_expand_is_row_major() {
    use crate::terms::{Rating::*, TipLevel};

    let rules = small_table().expand().unwrap();

    assert_eq!(
        rules,
        vec![
            Rule::new(Poor, Poor, TipLevel::Low),
            Rule::new(Poor, Good, TipLevel::Medium),
            Rule::new(Good, Poor, TipLevel::Medium),
            Rule::new(Good, Good, TipLevel::High),
        ]
    );
}

#[test]
fn test_ragged_table_is_rejected() {
    let mut table = small_table();
    table.cells[1].pop();

    assert!(matches!(table.expand(), Err(Error::InvalidConfiguration(_))));

    let mut table = small_table();
    table.cells.pop();

    assert!(matches!(table.expand(), Err(Error::InvalidConfiguration(_))));
}

#[test]
fn test_overrides_replace_in_place() {
    use crate::terms::{Rating::*, TipLevel};

    let rule_base = RuleBase::from_table(
        &small_table(),
        [
            Rule::new(Poor, Poor, TipLevel::Zero),
            Rule::new(Absent, Absent, TipLevel::Zero),
        ],
    )
    .unwrap();

    assert_eq!(rule_base.len(), 5);
    assert_eq!(rule_base.rules()[0], Rule::new(Poor, Poor, TipLevel::Zero));
    assert_eq!(rule_base.rules()[4], Rule::new(Absent, Absent, TipLevel::Zero));
}

#[test]
fn test_validate_and_evaluate() {
    use crate::shape::Shape;
    use crate::terms::{Rating, TipLevel};
    use crate::universe::Universe;

    let mut rating = LinguisticVariable::new("service", Universe::new(0., 5., 501).unwrap());
    rating
        .add_term(Rating::Poor, &Shape::triangular(0.5, 1.5, 2.5))
        .unwrap()
        .add_term(Rating::Good, &Shape::triangular(2.5, 3.5, 4.5))
        .unwrap();

    let mut tip = LinguisticVariable::new("tip", Universe::new(0., 15., 1501).unwrap());
    for (term, shape) in [
        (TipLevel::Low, Shape::trapezoidal(2., 4., 6., 8.)),
        (TipLevel::Medium, Shape::trapezoidal(6., 8., 10., 12.)),
    ] {
        tip.add_term(term, &shape).unwrap();
    }

    let rule_base = RuleBase::new(small_table().expand().unwrap());

    assert_eq!(
        rule_base.validate(&rating, &rating, &tip),
        Err(Error::UnknownTerm {
            rule: 3,
            variable: "tip".into(),
            term: "high"
        })
    );

    let firings = rule_base.evaluate_all(&rating, &rating, 1.5, 3., AndOp::Min);
    let strengths: Vec<f64> = firings.iter().map(|(_, s)| *s).collect();

    assert_eq!(firings.len(), 4);
    assert_eq!(strengths[0], 0.);
    assert!((strengths[1] - 0.5).abs() < 1e-9);
    assert_eq!(strengths[2], 0.);
    assert_eq!(strengths[3], 0.);
}
