#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math::{interp, is_strictly_increasing};
use crate::universe::Universe;

/// Half-width of the window in which a sample counts as hitting a singleton,
/// relative to the magnitude of the target.
const SINGLETON_TOLERANCE: f64 = 1e-9;

/// Shape of a membership function, prior to sampling.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "shape", rename_all = "snake_case"))]
pub enum Shape {
    /// Rises from `a` to a peak at `b`, falls back to zero at `c`
    Triangular { a: f64, b: f64, c: f64 },
    /// Rises over `[a, b)`, holds one over `[b, c]`, falls over `(c, d]`
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
    /// One at exactly `v`, zero everywhere else
    Singleton { v: f64 },
    /// Straight lines through `(x, degree)` points, flat past either end
    Piecewise { points: Vec<(f64, f64)> },
}

impl Shape {
    pub fn triangular(a: f64, b: f64, c: f64) -> Self {
        Self::Triangular { a, b, c }
    }

    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self::Trapezoidal { a, b, c, d }
    }

    pub fn singleton(v: f64) -> Self {
        Self::Singleton { v }
    }

    pub fn piecewise(points: impl Into<Vec<(f64, f64)>>) -> Self {
        Self::Piecewise { points: points.into() }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Triangular { .. } => "triangular",
            Self::Trapezoidal { .. } => "trapezoidal",
            Self::Singleton { .. } => "singleton",
            Self::Piecewise { .. } => "piecewise",
        }
    }

    fn params(&self) -> Vec<f64> {
        match *self {
            Self::Triangular { a, b, c } => vec![a, b, c],
            Self::Trapezoidal { a, b, c, d } => vec![a, b, c, d],
            Self::Singleton { v } => vec![v],
            Self::Piecewise { ref points } => points.iter().flat_map(|&(x, y)| [x, y]).collect(),
        }
    }

    fn invalid(&self, reason: &'static str) -> Error {
        Error::InvalidShape {
            shape: self.name(),
            params: self.params(),
            reason,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.params().iter().all(|p| p.is_finite()) {
            return Err(self.invalid("parameters must be finite"));
        }

        match *self {
            Self::Triangular { a, b, c } if !(a <= b && b <= c) => Err(self.invalid("expected a <= b <= c")),
            Self::Trapezoidal { a, b, c, d } if !(a <= b && b <= c && c <= d) => {
                Err(self.invalid("expected a <= b <= c <= d"))
            },
            Self::Piecewise { ref points } => {
                let xs: Vec<f64> = points.iter().map(|&(x, _)| x).collect();

                if points.is_empty() {
                    Err(self.invalid("expected at least one point"))
                } else if !is_strictly_increasing(&xs) {
                    Err(self.invalid("x coordinates must be strictly increasing"))
                } else if !points.iter().all(|&(_, y)| (0. ..=1.).contains(&y)) {
                    Err(self.invalid("degrees must lie in [0, 1]"))
                } else {
                    Ok(())
                }
            },
            _ => Ok(()),
        }
    }

    /// Degree of membership of `x`. Assumes the shape is valid.
    ///
    /// Degenerate edges (`a == b` or `c == d`) are vertical steps, so no
    /// branch ever divides by a zero-width segment.
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            Self::Triangular { a, b, c } => {
                if x < a || x > c {
                    0.
                } else if x < b {
                    (x - a) / (b - a)
                } else if x == b {
                    1.
                } else {
                    (c - x) / (c - b)
                }
            },
            Self::Trapezoidal { a, b, c, d } => {
                if x < a || x > d {
                    0.
                } else if x < b {
                    (x - a) / (b - a)
                } else if x <= c {
                    1.
                } else {
                    (d - x) / (d - c)
                }
            },
            Self::Singleton { v } => {
                if is_on(x, v) {
                    1.
                } else {
                    0.
                }
            },
            Self::Piecewise { ref points } => {
                let (xs, ys): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();

                interp(x, &xs, &ys)
            },
        }
    }

    /// Validates the shape and samples it over every point of `universe`.
    pub fn sample(&self, universe: &Universe) -> Result<MembershipFunction> {
        self.validate()?;

        let degrees = match self {
            Self::Piecewise { points } => {
                let (xs, ys): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();

                universe.iter().map(|&x| interp(x, &xs, &ys)).collect()
            },
            _ => universe.iter().map(|&x| self.degree(x)).collect(),
        };

        Ok(MembershipFunction(degrees))
    }
}

fn is_on(x: f64, v: f64) -> bool {
    (x - v).abs() <= SINGLETON_TOLERANCE * v.abs().max(1.)
}

/// A membership function sampled over one universe.
#[derive(Clone, Debug, PartialEq)]
pub struct MembershipFunction(Vec<f64>);

impl MembershipFunction {
    /// Wraps pre-sampled degrees, each of which must lie in `[0, 1]`.
    pub fn new(degrees: Vec<f64>) -> Result<Self> {
        if let Some((index, &value)) = degrees
            .iter()
            .enumerate()
            .find(|(_, d)| !(0. ..=1.).contains(*d))
        {
            return Err(Error::InvalidDegree { index, value });
        }

        Ok(Self(degrees))
    }

    pub fn degrees(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn is_all_zero(&self) -> bool {
        self.0.iter().all(|d| *d == 0.)
    }
}

#[cfg(test)]
fn grid() -> Universe {
    Universe::new(0., 10., 101).unwrap()
}

#[test]
fn test_triangular() {
    let tri = Shape::triangular(2., 5., 8.);
    let mf = tri.sample(&grid()).unwrap();
    let d = mf.degrees();

    assert_eq!(d[20], 0.);
    assert_eq!(d[50], 1.);
    assert_eq!(d[80], 0.);
    assert_eq!(d[0], 0.);
    assert_eq!(d[100], 0.);
    assert!((tri.degree(3.5) - 0.5).abs() < 1e-12);
    assert!(d[20..=50].windows(2).all(|w| w[0] <= w[1]));
    assert!(d[50..=80].windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_triangular_degenerate_edges() {
    let left = Shape::triangular(0., 0., 1.);
    let right = Shape::triangular(0., 1., 1.);
    let spike = Shape::triangular(3., 3., 3.);

    assert_eq!(left.degree(0.), 1.);
    assert_eq!(left.degree(0.5), 0.5);
    assert_eq!(left.degree(-0.01), 0.);
    assert_eq!(right.degree(1.), 1.);
    assert_eq!(right.degree(1.01), 0.);
    assert_eq!(spike.degree(3.), 1.);
    assert_eq!(spike.degree(3.1), 0.);

    let mf = left.sample(&grid()).unwrap();

    assert!(mf.degrees().iter().all(|d| d.is_finite()));
}

#[test]
fn test_trapezoidal() {
    let trap = Shape::trapezoidal(2., 4., 6., 8.);
    let mf = trap.sample(&grid()).unwrap();

    assert!(mf.degrees()[40..=60].iter().all(|d| *d == 1.));
    assert_eq!(mf.degrees()[20], 0.);
    assert_eq!(mf.degrees()[80], 0.);
    assert!((trap.degree(7.) - 0.5).abs() < 1e-12);
    assert!((trap.degree(3.) - 0.5).abs() < 1e-12);
}

#[test]
fn test_trapezoidal_shoulders() {
    let left = Shape::trapezoidal(0., 0., 2., 4.);
    let right = Shape::trapezoidal(3.5, 4.5, 5., 5.);

    assert_eq!(left.degree(0.), 1.);
    assert_eq!(left.degree(2.), 1.);
    assert_eq!(left.degree(3.), 0.5);
    assert_eq!(right.degree(5.), 1.);
    assert_eq!(right.degree(5.0001), 0.);
    assert_eq!(right.degree(4.), 0.5);
}

#[test]
fn test_singleton() {
    let mf = Shape::singleton(7.).sample(&grid()).unwrap();
    let hits: Vec<usize> = mf
        .degrees()
        .iter()
        .enumerate()
        .filter(|(_, d)| **d == 1.)
        .map(|(i, _)| i)
        .collect();

    assert_eq!(hits, vec![70]);
    assert_eq!(mf.degrees().iter().sum::<f64>(), 1.);
}

#[test]
fn test_piecewise() {
    let shape = Shape::piecewise([(2., 1.), (3., 0.7), (4., 0.3), (5., 0.)]);

    assert_eq!(shape.degree(0.), 1.);
    assert_eq!(shape.degree(3.), 0.7);
    assert!((shape.degree(3.5) - 0.5).abs() < 1e-12);
    assert_eq!(shape.degree(9.), 0.);

    let mf = shape.sample(&grid()).unwrap();

    assert_eq!(mf.degrees()[30], 0.7);
}

#[test]
fn test_invalid_shapes() {
    let cases = [
        Shape::triangular(3., 2., 4.),
        Shape::triangular(0., 1., f64::NAN),
        Shape::trapezoidal(0., 2., 1., 3.),
        Shape::trapezoidal(0., 1., 2., 1.5),
        Shape::singleton(f64::INFINITY),
        Shape::Piecewise { points: vec![] },
        Shape::piecewise([(1., 0.), (1., 1.)]),
        Shape::piecewise([(1., 0.), (2., 1.5)]),
    ];

    for shape in cases {
        assert!(matches!(shape.validate(), Err(Error::InvalidShape { .. })), "{shape:?}");
    }
}

#[test]
fn test_membership_function_new() {
    assert!(MembershipFunction::new(vec![0., 0.5, 1.]).is_ok());
    assert_eq!(
        MembershipFunction::new(vec![0., 1.2]),
        Err(Error::InvalidDegree { index: 1, value: 1.2 })
    );
    assert!(matches!(
        MembershipFunction::new(vec![f64::NAN]),
        Err(Error::InvalidDegree { index: 0, .. })
    ));
}
