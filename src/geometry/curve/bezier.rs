use crate::error::{GeometryError, Result};
use crate::math::{PointN, VectorN};

use super::{de_casteljau, derivative};

/// A Bezier curve of dimension `D` defined by its control points.
///
/// The curve is immutable: subdivision returns new curves and never touches
/// the receiver. Degree is `nodes.len() - 1` and is at least 1.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierCurve<const D: usize> {
    nodes: Vec<PointN<D>>,
}

impl<const D: usize> BezierCurve<D> {
    /// Creates a curve from its control points.
    ///
    /// # Errors
    ///
    /// - `GeometryError::TooFewNodes` if fewer than 2 points are given
    /// - `GeometryError::NonFiniteCoordinate` if any coordinate is NaN or infinite
    pub fn new(nodes: Vec<PointN<D>>) -> Result<Self> {
        if nodes.len() < 2 {
            return Err(GeometryError::TooFewNodes(nodes.len()).into());
        }
        if let Some(index) = nodes
            .iter()
            .position(|p| p.iter().any(|c| !c.is_finite()))
        {
            return Err(GeometryError::NonFiniteCoordinate { index }.into());
        }
        Ok(Self { nodes })
    }

    /// Creates a curve from raw coordinate rows, one row per control point.
    ///
    /// # Errors
    ///
    /// - `GeometryError::DimensionMismatch` if a row does not have exactly `D` entries
    /// - any error from [`BezierCurve::new`]
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let nodes = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let row = row.as_ref();
                if row.len() == D {
                    Ok(PointN::<D>::from_slice(row))
                } else {
                    Err(GeometryError::DimensionMismatch {
                        index,
                        expected: D,
                        found: row.len(),
                    }
                    .into())
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(nodes)
    }

    /// Wraps nodes produced from an already valid curve.
    pub(crate) fn from_nodes_unchecked(nodes: Vec<PointN<D>>) -> Self {
        debug_assert!(nodes.len() >= 2);
        Self { nodes }
    }

    /// Returns the control points.
    #[must_use]
    pub fn nodes(&self) -> &[PointN<D>] {
        &self.nodes
    }

    /// Returns the polynomial degree.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Returns the spatial dimension.
    #[must_use]
    pub fn dimension(&self) -> usize {
        D
    }

    /// Returns the point at `s = 0`.
    #[must_use]
    pub fn start(&self) -> PointN<D> {
        self.nodes[0]
    }

    /// Returns the point at `s = 1`.
    #[must_use]
    pub fn end(&self) -> PointN<D> {
        self.nodes[self.nodes.len() - 1]
    }

    /// Evaluates the curve at `s` with de Casteljau's algorithm.
    ///
    /// Parameters outside `[0, 1]` extrapolate the polynomial.
    #[must_use]
    pub fn evaluate(&self, s: f64) -> PointN<D> {
        PointN::from(de_casteljau(self.coords(), s))
    }

    /// Evaluates the first derivative at `s`.
    #[must_use]
    pub fn derivative(&self, s: f64) -> VectorN<D> {
        derivative(self, s)
    }

    /// Splits the curve at `s` into two curves of the same degree.
    ///
    /// The first covers `[0, s]` and the second `[s, 1]`, each reparametrized
    /// onto `[0, 1]`.
    #[must_use]
    pub fn split_at(&self, s: f64) -> (Self, Self) {
        let r = 1.0 - s;
        let mut work = self.coords();
        let n = work.len();

        let mut left = Vec::with_capacity(n);
        let mut right = Vec::with_capacity(n);
        left.push(PointN::from(work[0]));
        right.push(PointN::from(work[n - 1]));

        for level in (1..n).rev() {
            for i in 0..level {
                work[i] = work[i] * r + work[i + 1] * s;
            }
            left.push(PointN::from(work[0]));
            right.push(PointN::from(work[level - 1]));
        }
        right.reverse();

        (
            Self::from_nodes_unchecked(left),
            Self::from_nodes_unchecked(right),
        )
    }

    /// Splits the curve at `s = 0.5`.
    #[must_use]
    pub fn subdivide(&self) -> (Self, Self) {
        self.split_at(0.5)
    }

    /// Largest absolute coordinate over all control points.
    #[must_use]
    pub fn max_abs_coordinate(&self) -> f64 {
        self.nodes
            .iter()
            .flat_map(|p| p.iter())
            .fold(0.0_f64, |acc, c| acc.max(c.abs()))
    }

    pub(crate) fn coords(&self) -> Vec<VectorN<D>> {
        self.nodes.iter().map(|p| p.coords).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::BezierError;
    use crate::math::Point2;

    type Curve2 = BezierCurve<2>;

    fn quadratic() -> Curve2 {
        Curve2::from_rows(&[[0.0, 0.0], [1.0, 1.0], [5.0, 6.0]]).unwrap()
    }

    #[test]
    fn degree_and_dimension() {
        let curve = quadratic();
        assert_eq!(curve.degree(), 2);
        assert_eq!(curve.dimension(), 2);

        let cubic = BezierCurve::<3>::from_rows(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [1.0, 1.0, 1.0],
        ])
        .unwrap();
        assert_eq!(cubic.degree(), 3);
        assert_eq!(cubic.dimension(), 3);
    }

    #[test]
    fn rejects_single_point() {
        let result = Curve2::from_rows(&[[1.0, 2.0]]);
        assert!(matches!(
            result,
            Err(BezierError::Geometry(GeometryError::TooFewNodes(1)))
        ));
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        let result = Curve2::from_rows(&[[0.0, 0.0], [f64::NAN, 1.0], [2.0, 0.0]]);
        assert!(matches!(
            result,
            Err(BezierError::Geometry(GeometryError::NonFiniteCoordinate {
                index: 1
            }))
        ));

        let result = Curve2::from_rows(&[[0.0, f64::INFINITY], [1.0, 1.0]]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_rows_of_the_wrong_dimension() {
        let rows = vec![vec![0.0, 0.0], vec![1.0, 1.0, 1.0]];
        let result = Curve2::from_rows(&rows);
        assert!(matches!(
            result,
            Err(BezierError::Geometry(GeometryError::DimensionMismatch {
                index: 1,
                expected: 2,
                found: 3,
            }))
        ));
    }

    #[test]
    fn evaluate_hits_endpoints() {
        let curve = quadratic();
        assert_eq!(curve.evaluate(0.0), Point2::new(0.0, 0.0));
        assert_eq!(curve.evaluate(1.0), Point2::new(5.0, 6.0));
        assert_eq!(curve.start(), Point2::new(0.0, 0.0));
        assert_eq!(curve.end(), Point2::new(5.0, 6.0));
    }

    #[test]
    fn evaluate_matches_bernstein_form() {
        // B(s) = 2s(1 - s) * (1, 1) + s^2 * (5, 6)
        let curve = quadratic();
        for s in [0.125, 0.3, 0.5, 0.9] {
            let expected = Point2::new(
                2.0 * s * (1.0 - s) + 5.0 * s * s,
                2.0 * s * (1.0 - s) + 6.0 * s * s,
            );
            assert_relative_eq!(curve.evaluate(s), expected, epsilon = 1e-14);
        }
    }

    #[test]
    fn evaluate_extrapolates() {
        let line = Curve2::from_rows(&[[0.0, 0.0], [2.0, 1.0]]).unwrap();
        assert_eq!(line.evaluate(-1.0), Point2::new(-2.0, -1.0));
        assert_eq!(line.evaluate(2.0), Point2::new(4.0, 2.0));

        let curve = quadratic();
        let s = 1.5;
        let expected = Point2::new(
            2.0 * s * (1.0 - s) + 5.0 * s * s,
            2.0 * s * (1.0 - s) + 6.0 * s * s,
        );
        assert_relative_eq!(curve.evaluate(s), expected, epsilon = 1e-12);
    }

    #[test]
    fn subdivide_quadratic_control_points() {
        let (left, right) = quadratic().subdivide();
        assert_eq!(
            left.nodes(),
            &[
                Point2::new(0.0, 0.0),
                Point2::new(0.5, 0.5),
                Point2::new(1.75, 2.0)
            ]
        );
        assert_eq!(
            right.nodes(),
            &[
                Point2::new(1.75, 2.0),
                Point2::new(3.0, 3.5),
                Point2::new(5.0, 6.0)
            ]
        );
    }

    #[test]
    fn subdivide_reproduces_the_parent_image() {
        let curve = Curve2::from_rows(&[[0.0, 0.0], [1.0, 3.0], [2.0, -1.0], [4.0, 2.0]]).unwrap();
        let (left, right) = curve.subdivide();
        for u in [0.0, 0.2, 0.5, 0.7, 1.0] {
            assert_relative_eq!(left.evaluate(u), curve.evaluate(0.5 * u), epsilon = 1e-14);
            assert_relative_eq!(
                right.evaluate(u),
                curve.evaluate(0.5 + 0.5 * u),
                epsilon = 1e-14
            );
        }
    }

    #[test]
    fn split_at_arbitrary_parameter() {
        let curve = Curve2::from_rows(&[[0.0, 0.0], [1.0, 3.0], [2.0, -1.0], [4.0, 2.0]]).unwrap();
        let (left, right) = curve.split_at(0.25);
        assert_eq!(left.degree(), 3);
        assert_eq!(right.degree(), 3);
        assert_relative_eq!(left.end(), curve.evaluate(0.25), epsilon = 1e-14);
        assert_relative_eq!(right.start(), curve.evaluate(0.25), epsilon = 1e-14);
        assert_relative_eq!(right.evaluate(0.5), curve.evaluate(0.625), epsilon = 1e-14);
    }

    #[test]
    fn subdivide_leaves_parent_untouched() {
        let curve = quadratic();
        let copy = curve.clone();
        let _ = curve.subdivide();
        assert_eq!(curve, copy);
    }

    #[test]
    fn max_abs_coordinate_scans_all_nodes() {
        let curve = Curve2::from_rows(&[[0.0, -7.5], [1.0, 3.0]]).unwrap();
        assert!((curve.max_abs_coordinate() - 7.5).abs() < f64::EPSILON);
    }
}
