use crate::geometry::BezierCurve;

/// Upper bound on the distance between a curve and its endpoint chord.
///
/// Lines (and points) have no error. For degree `n >= 2` the bound is
/// `n (n - 1) / 8 * max |p[i+2] - 2 p[i+1] + p[i]|`. It is exact for
/// quadratics, so halving a quadratic quarters the error of each half.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn linearization_error<const D: usize>(curve: &BezierCurve<D>) -> f64 {
    let degree = curve.degree();
    if degree <= 1 {
        return 0.0;
    }

    let nodes = curve.nodes();
    let max_second_difference = nodes
        .windows(3)
        .map(|w| ((w[2] - w[1]) - (w[1] - w[0])).norm())
        .fold(0.0_f64, f64::max);

    0.125 * (degree * (degree - 1)) as f64 * max_second_difference
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    type Curve2 = BezierCurve<2>;

    fn error_of(rows: &[[f64; 2]]) -> f64 {
        linearization_error(&Curve2::from_rows(rows).unwrap())
    }

    #[test]
    fn linear() {
        assert_eq!(error_of(&[[0.0, 0.0], [1.0, 2.0]]), 0.0);
        assert_eq!(error_of(&[[-3.5, 7.0], [1e9, -2.0]]), 0.0);
    }

    #[test]
    fn degree_elevated_linear() {
        assert_eq!(error_of(&[[0.0, 0.0], [0.5, 1.0], [1.0, 2.0]]), 0.0);
        assert_eq!(
            error_of(&[[0.0, 0.0], [0.25, 0.5], [0.5, 1.0], [0.75, 1.5], [1.0, 2.0]]),
            0.0
        );
    }

    #[test]
    fn quadratic() {
        // d  = [1, 1], [4, 5]
        // d2 = [3, 4], so |d2| = 5
        let curve = Curve2::from_rows(&[[0.0, 0.0], [1.0, 1.0], [5.0, 6.0]]).unwrap();
        let expected = 0.125 * 2.0 * 1.0 * 5.0;
        assert_eq!(linearization_error(&curve), expected);
        assert_eq!(expected, 1.25);

        let (left, right) = curve.subdivide();
        assert_eq!(linearization_error(&left), 0.25 * expected);
        assert_eq!(linearization_error(&right), 0.25 * expected);
        assert_eq!(linearization_error(&left), 0.3125);
    }

    #[test]
    fn quadratic_bound_is_attained() {
        // The chord is the x-axis and the apex sits at y = 0.5.
        let curve = Curve2::from_rows(&[[0.0, 0.0], [0.5, 1.0], [1.0, 0.0]]).unwrap();
        let apex = curve.evaluate(0.5);
        assert_eq!(linearization_error(&curve), apex.y);
    }

    #[test]
    fn cubic() {
        // d2 = [3, 4], [-3, -4]
        let error = error_of(&[[0.0, 0.0], [1.0, 1.0], [5.0, 6.0], [6.0, 7.0]]);
        assert_eq!(error, 0.125 * 3.0 * 2.0 * 5.0);
    }

    #[test]
    fn quartic() {
        // d2 = [3, 4], [-3, -4], [-3, -1]
        let error = error_of(&[[0.0, 0.0], [1.0, 1.0], [5.0, 6.0], [6.0, 7.0], [4.0, 7.0]]);
        assert_eq!(error, 0.125 * 4.0 * 3.0 * 5.0);
    }

    #[test]
    fn degree_weights_on_the_fly() {
        // d2 = [5, 1], [-2, 3], [0, -12], [-3, 3]; the largest norm is 12.
        let error = error_of(&[
            [0.0, 0.0],
            [1.0, 1.0],
            [7.0, 3.0],
            [11.0, 8.0],
            [15.0, 1.0],
            [16.0, -3.0],
        ]);
        assert_eq!(error, 0.125 * 5.0 * 4.0 * 12.0);
    }

    #[test]
    fn space_curve() {
        let curve = BezierCurve::<3>::from_rows(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 0.0, 3.0]])
            .unwrap();
        // d2 = [0, -2, 1]
        let expected = 0.125 * 2.0 * 5.0_f64.sqrt();
        assert!((linearization_error(&curve) - expected).abs() < 1e-15);
    }
}
