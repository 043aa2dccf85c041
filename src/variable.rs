use fixed_map::Map as FixedMap;
use tracing::trace;

use crate::error::{Error, Result};
use crate::math::interp;
use crate::shape::{MembershipFunction, Shape};
use crate::terms::Term;
use crate::universe::Universe;

/// A named universe of discourse and the sampled terms defined over it.
pub struct LinguisticVariable<K: Term> {
    name: String,
    universe: Universe,
    terms: FixedMap<K, MembershipFunction>,
}

impl<K: Term> LinguisticVariable<K> {
    pub fn new(name: impl Into<String>, universe: Universe) -> Self {
        Self {
            name: name.into(),
            universe,
            terms: FixedMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    /// Samples `shape` over the universe and registers it as `term`.
    pub fn add_term(&mut self, term: K, shape: &Shape) -> Result<&mut Self> {
        let membership = shape.sample(&self.universe)?;

        if let Shape::Singleton { v } = *shape {
            if membership.is_all_zero() {
                return Err(Error::SingletonOffGrid {
                    variable: self.name.clone(),
                    value: v,
                });
            }
        }

        trace!(variable = %self.name, term = term.name(), ?shape, "adding term");

        self.add_membership(term, membership)
    }

    /// Registers an already sampled membership function as `term`.
    pub fn add_membership(&mut self, term: K, membership: MembershipFunction) -> Result<&mut Self> {
        if membership.len() != self.universe.len() {
            return Err(Error::LengthMismatch {
                variable: self.name.clone(),
                term: term.name(),
                expected: self.universe.len(),
                actual: membership.len(),
            });
        }
        if self.terms.contains_key(term) {
            return Err(Error::DuplicateTerm {
                variable: self.name.clone(),
                term: term.name(),
            });
        }

        self.terms.insert(term, membership);

        Ok(self)
    }

    pub fn contains_term(&self, term: K) -> bool {
        self.terms.contains_key(term)
    }

    pub fn membership(&self, term: K) -> Option<&MembershipFunction> {
        self.terms.get(term)
    }

    /// Degree of `value` in `term`, interpolated between samples.
    ///
    /// Values outside the universe take the membership of the nearest edge.
    /// Returns `None` if the term was never added.
    pub fn membership_of(&self, term: K, value: f64) -> Option<f64> {
        let membership = self.terms.get(term)?;

        Some(interp(value, self.universe.samples(), membership.degrees()))
    }

    /// Degree of `value` in every defined term, in term (enum) order.
    pub fn fuzzify(&self, value: f64) -> FixedMap<K, f64> {
        let mut degrees = FixedMap::new();

        for (term, membership) in self.terms.iter() {
            degrees.insert(term, interp(value, self.universe.samples(), membership.degrees()));
        }

        degrees
    }

    pub fn terms(&self) -> impl Iterator<Item = (K, &MembershipFunction)> + '_ {
        self.terms.iter()
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }
}

#[cfg(test)]
fn service() -> LinguisticVariable<crate::terms::Rating> {
    use crate::terms::Rating;

    let mut var = LinguisticVariable::new("service", Universe::new(0., 5., 501).unwrap());

    var.add_term(Rating::Poor, &Shape::triangular(0.5, 1.5, 2.5))
        .unwrap()
        .add_term(Rating::Excellent, &Shape::trapezoidal(3.5, 4.5, 5., 5.))
        .unwrap();
    var
}

#[test]
fn test_membership_of_interpolates() {
    use crate::terms::Rating;

    let var = service();

    assert_eq!(var.membership_of(Rating::Poor, 1.5), Some(1.));
    assert_eq!(var.membership_of(Rating::Poor, 0.5), Some(0.));
    assert!((var.membership_of(Rating::Poor, 1.005).unwrap() - 0.505).abs() < 1e-9);
    assert_eq!(var.membership_of(Rating::Excellent, 5.), Some(1.));
    assert_eq!(var.membership_of(Rating::Average, 2.5), None);
}

#[test]
fn test_membership_of_clamps_to_edges() {
    use crate::terms::Rating;

    let var = service();

    assert_eq!(var.membership_of(Rating::Excellent, 12.), Some(1.));
    assert_eq!(var.membership_of(Rating::Poor, -4.), Some(0.));
}

#[test]
fn test_fuzzify() {
    use crate::terms::Rating;

    let var = service();
    let degrees = var.fuzzify(4.);

    assert_eq!(degrees.len(), 2);
    assert_eq!(degrees.get(Rating::Poor), Some(&0.));
    assert!((degrees.get(Rating::Excellent).unwrap() - 0.5).abs() < 1e-9);
    assert_eq!(degrees.get(Rating::Good), None);
}

#[test]
fn test_add_term_errors() {
    use crate::terms::Rating;

    let mut var = service();

    assert_eq!(
        var.add_term(Rating::Poor, &Shape::triangular(0., 1., 2.)).err(),
        Some(Error::DuplicateTerm {
            variable: "service".into(),
            term: "poor"
        })
    );
    assert!(matches!(
        var.add_term(Rating::Absent, &Shape::singleton(0.005)),
        Err(Error::SingletonOffGrid { .. })
    ));
    assert!(matches!(
        var.add_membership(Rating::Absent, MembershipFunction::new(vec![0.; 3]).unwrap()),
        Err(Error::LengthMismatch {
            expected: 501,
            actual: 3,
            ..
        })
    ));
    assert!(matches!(
        var.add_term(Rating::Good, &Shape::triangular(4.5, 3.5, 2.5)),
        Err(Error::InvalidShape { .. })
    ));
    assert_eq!(var.term_count(), 2);
}

#[test]
fn test_fuzzify_follows_enum_order() {
    use crate::terms::Rating;

    let mut var = LinguisticVariable::new("food", Universe::new(0., 5., 501).unwrap());

    var.add_term(Rating::Excellent, &Shape::trapezoidal(3.5, 4.5, 5., 5.))
        .unwrap()
        .add_term(Rating::Absent, &Shape::singleton(0.))
        .unwrap()
        .add_term(Rating::Average, &Shape::triangular(1.5, 2.5, 3.5))
        .unwrap();

    let order: Vec<Rating> = var.fuzzify(2.5).iter().map(|(term, _)| term).collect();

    assert_eq!(order, vec![Rating::Absent, Rating::Average, Rating::Excellent]);
}
