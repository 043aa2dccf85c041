/// Evenly spaced samples over `[min, max]`, both ends included.
pub struct Linspace {
    min: f64,
    span: f64,
    denom: f64,
    index: usize,
    len: usize,
}

impl Linspace {
    pub fn new(min: f64, max: f64, n: usize) -> Self {
        let denom = if n > 1 { (n - 1) as f64 } else { 1. };

        Linspace {
            min,
            span: max - min,
            denom,
            index: 0,
            len: n,
        }
    }
}

impl Iterator for Linspace {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        if self.index >= self.len {
            None
        } else {
            let i = self.index;
            self.index += 1;

            // Multiplied before dividing. The last sample is exactly `max`.
            if i + 1 == self.len && self.len > 1 {
                Some(self.min + self.span)
            } else {
                Some(self.min + self.span * i as f64 / self.denom)
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Linspace {}

#[test]
fn test_linspace_endpoints() {
    let xs: Vec<f64> = Linspace::new(0., 5., 501).collect();

    assert_eq!(xs.len(), 501);
    assert_eq!(xs[0], 0.);
    assert_eq!(xs[250], 2.5);
    assert_eq!(xs[500], 5.);

    let xs: Vec<f64> = Linspace::new(0., 15., 1501).collect();

    assert_eq!(xs[600], 6.);
    assert_eq!(xs[1000], 10.);
    assert_eq!(xs[1500], 15.);
}

#[test]
fn test_linspace_size_hint() {
    let mut iter = Linspace::new(-1., 1., 3);

    assert_eq!(iter.len(), 3);
    assert_eq!(iter.next(), Some(-1.));
    assert_eq!(iter.len(), 2);
    assert_eq!(iter.collect::<Vec<_>>(), vec![0., 1.]);
}
