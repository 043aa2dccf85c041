use std::ops::{Deref, RangeInclusive};

use crate::error::{Error, Result};
use crate::linspace::Linspace;
use crate::math::is_strictly_increasing;

/// Largest sample count a universe may hold.
pub const MAX_SAMPLES: usize = 1 << 24;

/// A discretized universe of discourse.
///
/// Samples are finite, strictly increasing and at least two long. The universe
/// never changes after it is built.
#[derive(Clone, Debug, PartialEq)]
pub struct Universe {
    samples: Vec<f64>,
}

impl Universe {
    /// `sample_count` evenly spaced samples from `min` to `max`, both included.
    pub fn new(min: f64, max: f64, sample_count: usize) -> Result<Self> {
        if sample_count < 2 {
            return Err(Error::InvalidUniverse {
                reason: format!("need at least 2 samples, got {sample_count}"),
            });
        }
        if sample_count > MAX_SAMPLES {
            return Err(Error::InvalidUniverse {
                reason: format!("at most {MAX_SAMPLES} samples allowed, got {sample_count}"),
            });
        }
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(Error::InvalidUniverse {
                reason: format!("bounds must be finite with min < max, got [{min}, {max}]"),
            });
        }

        Self::from_samples(Linspace::new(min, max, sample_count).collect())
    }

    /// Derives the sample count from a step size. The last sample is always
    /// `max`, so the effective step may be slightly larger than `step`.
    pub fn with_step(range: RangeInclusive<f64>, step: f64) -> Result<Self> {
        let (min, max) = (*range.start(), *range.end());

        if !(step.is_finite() && step > 0.) {
            return Err(Error::InvalidUniverse {
                reason: format!("step must be positive, got {step}"),
            });
        }

        let num = ((max - min) / step).floor();

        if !num.is_finite() || num < 0. {
            return Err(Error::InvalidUniverse {
                reason: format!("bounds must be finite with min < max, got [{min}, {max}]"),
            });
        }

        if num >= MAX_SAMPLES as f64 {
            return Err(Error::InvalidUniverse {
                reason: format!("step {step} over [{min}, {max}] needs more than {MAX_SAMPLES} samples"),
            });
        }

        Self::new(min, max, num as usize + 1)
    }

    /// An explicitly discretized universe.
    pub fn from_samples(samples: Vec<f64>) -> Result<Self> {
        if samples.len() < 2 {
            return Err(Error::InvalidUniverse {
                reason: format!("need at least 2 samples, got {}", samples.len()),
            });
        }
        if !is_strictly_increasing(&samples) {
            return Err(Error::InvalidUniverse {
                reason: "samples must be finite and strictly increasing".into(),
            });
        }

        Ok(Self { samples })
    }

    pub fn min(&self) -> f64 {
        self.samples[0]
    }

    pub fn max(&self) -> f64 {
        self.samples[self.samples.len() - 1]
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Clamps `x` into `[min, max]`. NaN maps to `min`.
    pub fn clamp(&self, x: f64) -> f64 {
        if x.is_nan() {
            self.min()
        } else {
            x.clamp(self.min(), self.max())
        }
    }

    pub fn contains(&self, x: f64) -> bool {
        self.min() <= x && x <= self.max()
    }
}

impl Deref for Universe {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.samples
    }
}

#[test]
fn test_even_universe() {
    let universe = Universe::new(0., 5., 501).unwrap();

    assert_eq!(universe.len(), 501);
    assert_eq!(universe.min(), 0.);
    assert_eq!(universe.max(), 5.);
    assert_eq!(universe[100], 1.);
    assert!(universe.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_with_step() {
    let universe = Universe::with_step(0. ..=10., 0.1).unwrap();

    assert_eq!(universe.len(), 101);
    assert_eq!(universe.max(), 10.);

    // 4.5 / 2 floors to 2 steps, the grid still ends on max
    let universe = Universe::with_step(0. ..=4.5, 2.).unwrap();

    assert_eq!(universe.samples(), &[0., 2.25, 4.5]);
}

#[test]
fn test_invalid_universes() {
    assert!(matches!(Universe::new(0., 1., 1), Err(Error::InvalidUniverse { .. })));
    assert!(matches!(Universe::new(1., 1., 10), Err(Error::InvalidUniverse { .. })));
    assert!(matches!(Universe::new(2., 1., 10), Err(Error::InvalidUniverse { .. })));
    assert!(matches!(Universe::new(0., f64::INFINITY, 10), Err(Error::InvalidUniverse { .. })));
    assert!(matches!(Universe::with_step(0. ..=1., 0.), Err(Error::InvalidUniverse { .. })));
    assert!(matches!(Universe::with_step(1. ..=0., 0.1), Err(Error::InvalidUniverse { .. })));
    assert!(matches!(Universe::with_step(0. ..=1., 1e-300), Err(Error::InvalidUniverse { .. })));
    assert!(matches!(Universe::with_step(0. ..=1., f64::MIN_POSITIVE), Err(Error::InvalidUniverse { .. })));
    assert!(matches!(
        Universe::new(0., 1., MAX_SAMPLES + 1),
        Err(Error::InvalidUniverse { .. })
    ));
    assert!(matches!(
        Universe::from_samples(vec![0., 2., 1.]),
        Err(Error::InvalidUniverse { .. })
    ));
    assert!(matches!(Universe::from_samples(vec![0.]), Err(Error::InvalidUniverse { .. })));
}

#[test]
fn test_clamp() {
    let universe = Universe::from_samples(vec![0., 1., 4.]).unwrap();

    assert_eq!(universe.clamp(-3.), 0.);
    assert_eq!(universe.clamp(2.5), 2.5);
    assert_eq!(universe.clamp(9.), 4.);
    assert_eq!(universe.clamp(f64::NAN), 0.);
    assert!(universe.contains(4.));
    assert!(!universe.contains(4.01));
}
