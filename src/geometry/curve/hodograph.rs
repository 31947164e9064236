use crate::math::VectorN;

use super::{de_casteljau, BezierCurve};

/// The derivative curve of a Bezier curve.
///
/// For a curve of degree `n` with control points `p[i]`, the hodograph has
/// degree `n - 1` and control vectors `n * (p[i + 1] - p[i])`. A line yields a
/// single constant vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Hodograph<const D: usize> {
    vectors: Vec<VectorN<D>>,
}

impl<const D: usize> Hodograph<D> {
    /// Builds the hodograph of `curve`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(curve: &BezierCurve<D>) -> Self {
        let degree = curve.degree() as f64;
        let vectors = curve
            .nodes()
            .windows(2)
            .map(|pair| (pair[1] - pair[0]) * degree)
            .collect();
        Self { vectors }
    }

    /// Returns the control vectors.
    #[must_use]
    pub fn control_vectors(&self) -> &[VectorN<D>] {
        &self.vectors
    }

    /// Evaluates the derivative at `s`.
    #[must_use]
    pub fn evaluate(&self, s: f64) -> VectorN<D> {
        de_casteljau(self.vectors.clone(), s)
    }
}

/// First derivative of `curve` at `s`.
#[must_use]
pub fn derivative<const D: usize>(curve: &BezierCurve<D>, s: f64) -> VectorN<D> {
    Hodograph::new(curve).evaluate(s)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Vector2;

    type Curve2 = BezierCurve<2>;

    #[test]
    fn line_derivative_is_constant() {
        let line = Curve2::from_rows(&[[0.0, 0.0], [1.0, 1.0]]).unwrap();
        let first = derivative(&line, 0.25);
        let second = derivative(&line, 0.75);
        assert_eq!(first, Vector2::new(1.0, 1.0));
        assert_eq!(first, second);
        assert_eq!(Hodograph::new(&line).control_vectors().len(), 1);
    }

    #[test]
    fn quadratic_derivative() {
        // B(s)  = [s(s + 4) / 4, s(8 - 7s) / 4]
        // B'(s) = [(2 + s) / 2, (4 - 7s) / 2]
        let curve = Curve2::from_rows(&[[0.0, 0.0], [0.5, 1.0], [1.25, 0.25]]).unwrap();
        for s in [0.0, 0.25, 0.5, 0.625, 0.875] {
            let d = derivative(&curve, s);
            assert_eq!(d, Vector2::new((2.0 + s) / 2.0, (4.0 - 7.0 * s) / 2.0));
        }
    }

    #[test]
    fn cubic_derivative() {
        // B'(s) = [3(1 + 2s - s^2) / 4, 3(5s^2 - 6s + 2) / 2]
        let curve =
            Curve2::from_rows(&[[0.0, 0.0], [0.25, 1.0], [0.75, 0.5], [1.25, 1.0]]).unwrap();
        for s in [0.125, 0.5, 0.75, 1.0, 1.125] {
            let d = curve.derivative(s);
            let x = 3.0 * (1.0 + 2.0 * s - s * s) / 4.0;
            let y = 3.0 * (5.0 * s * s - 6.0 * s + 2.0) / 2.0;
            assert!((d.x - x).abs() < 1e-14, "x'({s}) = {}", d.x);
            assert!((d.y - y).abs() < 1e-14, "y'({s}) = {}", d.y);
        }
    }

    #[test]
    fn hodograph_of_a_cubic_is_quadratic() {
        let curve =
            Curve2::from_rows(&[[0.0, 0.0], [1.0, 2.0], [3.0, 2.0], [4.0, 0.0]]).unwrap();
        let hodograph = Hodograph::new(&curve);
        assert_eq!(
            hodograph.control_vectors(),
            &[
                Vector2::new(3.0, 6.0),
                Vector2::new(6.0, 0.0),
                Vector2::new(3.0, -6.0)
            ]
        );
    }
}
