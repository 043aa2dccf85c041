use num::Float;

/// Similar to numpy.interp, evaluated at a single point.
///
/// `xp` must be strictly increasing and the same length as `fp`. Points left of
/// `xp[0]` or right of the last `xp` take the nearest edge value, and NaN takes
/// the left one.
pub(crate) fn interp<F: Float>(x: F, xp: &[F], fp: &[F]) -> F {
    debug_assert_eq!(xp.len(), fp.len());

    let (Some(&first), Some(&last)) = (xp.first(), xp.last()) else {
        return F::zero();
    };

    // Base cases. NaN sorts to the left edge.
    if x.is_nan() || x <= first {
        return fp[0];
    }
    if x >= last {
        return fp[fp.len() - 1];
    }

    // First index with xp[i] > x, so xp[i - 1] <= x < xp[i]
    let i = xp.partition_point(|p| *p <= x);
    let (x1, y1) = (xp[i - 1], fp[i - 1]);
    let (x2, y2) = (xp[i], fp[i]);

    y1 + (x - x1) * (y2 - y1) / (x2 - x1)
}

/// Checks that `values` is strictly increasing and finite.
pub(crate) fn is_strictly_increasing<F: Float>(values: &[F]) -> bool {
    values.iter().all(|v| v.is_finite()) && values.windows(2).all(|w| w[0] < w[1])
}

#[test]
fn test_interp() {
    let xs = [1., 2., 3.];
    let ys = [3., 2., 0.];
    let interpolated: Vec<f64> = [0., 1., 1.5, 2.72, 3.24]
        .into_iter()
        .map(|x| interp(x, &xs, &ys))
        .collect();

    assert_eq!(interpolated, vec![3., 3., 2.5, 0.5599999999999996, 0.]);

    let xs = [0., 1., 2., 3., 4.5];
    let ys = [0., 2., 5., 3., 2.];
    let interpolated: Vec<f64> = [2.5, -1., 7.5].into_iter().map(|x| interp(x, &xs, &ys)).collect();

    assert_eq!(interpolated, vec![4., 0., 2.]);
}

#[test]
fn test_interp_on_grid_points() {
    let xs = [0., 0.5, 1.];
    let ys = [0., 1., 0.];

    assert_eq!(interp(0.5, &xs, &ys), 1.);
    assert_eq!(interp(0.25, &xs, &ys), 0.5);
    assert_eq!(interp(0.75f32, &[0., 0.5, 1.], &[0., 1., 0.]), 0.5);
}

#[test]
fn test_is_strictly_increasing() {
    assert!(is_strictly_increasing(&[0., 1., 2.]));
    assert!(!is_strictly_increasing(&[0., 1., 1.]));
    assert!(!is_strictly_increasing(&[0., f64::NAN, 2.]));
    assert!(is_strictly_increasing::<f64>(&[]));
}
