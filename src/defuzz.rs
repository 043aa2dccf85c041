use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use num::Float;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Method for defuzzificating the aggregated membership function.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DefuzzMethod {
    /// Weighted mean of the samples. An all-zero curve yields zero.
    #[default]
    Centroid,
    /// Bisector of area. An all-zero curve yields zero.
    Bisector,
    /// Mean of the values for which the membership function is maximum
    Mom,
    /// Largest value for which the membership function is maximum
    Lom,
    /// Smallest value for which the membership function is maximum
    Som,
}

impl DefuzzMethod {
    pub fn name(self) -> &'static str {
        match self {
            Self::Centroid => "centroid",
            Self::Bisector => "bisector",
            Self::Mom => "mom",
            Self::Lom => "lom",
            Self::Som => "som",
        }
    }

    /// Reduces `membership`, sampled over `universe`, to a single crisp value.
    ///
    /// Both slices must have the same length.
    pub fn call<F: Float + Sum>(self, universe: &[F], membership: &[F]) -> F {
        debug_assert_eq!(universe.len(), membership.len());

        let Some(&last) = universe.last() else {
            return F::zero();
        };

        match self {
            Self::Centroid => {
                let den = membership.iter().copied().sum::<F>();

                if den == F::zero() {
                    return F::zero();
                }

                let num = universe
                    .iter()
                    .zip(membership)
                    .map(|(&x, &m)| x * m)
                    .sum::<F>();

                num / den
            },
            Self::Bisector => {
                let two = F::one() + F::one();
                let areas: Vec<F> = universe
                    .windows(2)
                    .zip(membership.windows(2))
                    .map(|(x, m)| (m[0] + m[1]) * (x[1] - x[0]) / two)
                    .collect();
                let total_area = areas.iter().copied().sum::<F>();

                if total_area == F::zero() {
                    return F::zero();
                }

                let target = total_area / two;
                let mut cum_area = F::zero();

                for (i, &area) in areas.iter().enumerate() {
                    let next = cum_area + area;

                    if area > F::zero() && next >= target {
                        let fraction = (target - cum_area) / area;

                        return universe[i] + fraction * (universe[i + 1] - universe[i]);
                    }

                    cum_area = next;
                }

                last
            },
            Self::Mom => {
                let maximum = peak(membership);
                let (len, sum) = universe
                    .iter()
                    .zip(membership)
                    .filter(|(_, m)| **m == maximum)
                    .fold((F::zero(), F::zero()), |(len, sum), (&u, _)| (len + F::one(), sum + u));

                sum / len
            },
            Self::Lom => {
                let maximum = peak(membership);

                membership
                    .iter()
                    .rposition(|&m| m == maximum)
                    .map_or(last, |i| universe[i])
            },
            Self::Som => {
                let maximum = peak(membership);

                membership
                    .iter()
                    .position(|&m| m == maximum)
                    .map_or(universe[0], |i| universe[i])
            },
        }
    }
}

fn peak<F: Float>(membership: &[F]) -> F {
    membership.iter().copied().fold(F::neg_infinity(), F::max)
}

impl FromStr for DefuzzMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "centroid" | "cog" => Ok(Self::Centroid),
            "bisector" | "boa" => Ok(Self::Bisector),
            "mom" => Ok(Self::Mom),
            "lom" => Ok(Self::Lom),
            "som" => Ok(Self::Som),
            _ => Err(Error::InvalidConfiguration(format!(
                "unsupported defuzzification method `{s}`"
            ))),
        }
    }
}

impl fmt::Display for DefuzzMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
fn grid() -> Vec<f64> {
    crate::linspace::Linspace::new(0., 10., 101).collect()
}

#[cfg(test)]
fn sampled(shape: crate::shape::Shape) -> Vec<f64> {
    grid().into_iter().map(|x| shape.degree(x)).collect()
}

#[test]
fn test_centroid_of_symmetric_curve() {
    use crate::shape::Shape;

    let universe = grid();
    let membership = sampled(Shape::triangular(2., 5., 8.));

    assert!((DefuzzMethod::Centroid.call(&universe, &membership) - 5.).abs() < 1e-9);

    let membership = sampled(Shape::trapezoidal(1., 3., 5., 7.));

    assert!((DefuzzMethod::Centroid.call(&universe, &membership) - 4.).abs() < 1e-9);
}

#[test]
fn test_centroid_of_all_zero_curve() {
    let universe = grid();
    let membership = vec![0.; universe.len()];
    let centroid = DefuzzMethod::Centroid.call(&universe, &membership);

    assert_eq!(centroid, 0.);
    assert!(!centroid.is_nan());
}

#[test]
fn test_maximum_plateau_tie_breaks() {
    use crate::shape::Shape;

    let universe = grid();
    let membership = sampled(Shape::trapezoidal(2., 4., 6., 8.));

    assert_eq!(DefuzzMethod::Lom.call(&universe, &membership), 6.);
    assert_eq!(DefuzzMethod::Som.call(&universe, &membership), 4.);
    assert!((DefuzzMethod::Mom.call(&universe, &membership) - 5.).abs() < 1e-9);
}

#[test]
fn test_lom_picks_the_highest_peak() {
    let universe = [0., 1., 2., 3., 4.];
    let membership = [0.2, 0.9, 0.4, 0.9, 0.1];

    assert_eq!(DefuzzMethod::Lom.call(&universe, &membership), 3.);
    assert_eq!(DefuzzMethod::Som.call(&universe, &membership), 1.);
    assert_eq!(DefuzzMethod::Mom.call(&universe, &membership), 2.);
}

#[test]
fn test_lom_of_all_zero_curve_is_universe_max() {
    let universe = grid();
    let membership = vec![0.; universe.len()];

    assert_eq!(DefuzzMethod::Lom.call(&universe, &membership), 10.);
    assert_eq!(DefuzzMethod::Som.call(&universe, &membership), 0.);
}

#[test]
fn test_bisector() {
    use crate::shape::Shape;

    let universe = grid();
    let membership = sampled(Shape::triangular(2., 5., 8.));

    assert!((DefuzzMethod::Bisector.call(&universe, &membership) - 5.).abs() < 1e-6);

    let universe = [0., 1., 2., 3., 4.];
    let membership = [1., 1., 1., 1., 1.];

    assert_eq!(DefuzzMethod::Bisector.call(&universe, &membership), 2.);
    assert_eq!(DefuzzMethod::Bisector.call(&universe, &[0.; 5]), 0.);
}

#[test]
fn test_from_str() {
    assert_eq!("centroid".parse::<DefuzzMethod>(), Ok(DefuzzMethod::Centroid));
    assert_eq!("LOM".parse::<DefuzzMethod>(), Ok(DefuzzMethod::Lom));
    assert_eq!("boa".parse::<DefuzzMethod>(), Ok(DefuzzMethod::Bisector));
    assert!(matches!(
        "median".parse::<DefuzzMethod>(),
        Err(Error::InvalidConfiguration(_))
    ));

    for method in [
        DefuzzMethod::Centroid,
        DefuzzMethod::Bisector,
        DefuzzMethod::Mom,
        DefuzzMethod::Lom,
        DefuzzMethod::Som,
    ] {
        assert_eq!(method.to_string().parse::<DefuzzMethod>(), Ok(method));
    }
}
