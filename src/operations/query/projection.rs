use crate::geometry::BezierCurve;
use crate::math::PointN;

/// Steps shorter than this end the search.
const STEP_FLOOR: f64 = 4.0 * f64::EPSILON;

/// Finds the parameter of the point of `curve` nearest to `point`, searching
/// from `guess`.
///
/// Runs Gauss-Newton steps `t += (point - B(t)) . B'(t) / |B'(t)|^2` until the
/// step vanishes or `max_iterations` is reached. The result is not clamped to
/// `[0, 1]`; compare `curve.evaluate(t)` with `point` to decide whether the
/// point actually lies on the curve.
#[must_use]
pub fn project_point<const D: usize>(
    curve: &BezierCurve<D>,
    point: &PointN<D>,
    guess: f64,
    max_iterations: usize,
) -> f64 {
    let mut t = guess;
    for _ in 0..max_iterations {
        let tangent = curve.derivative(t);
        let speed_sq = tangent.norm_squared();
        if speed_sq <= f64::MIN_POSITIVE {
            break;
        }

        let step = (point - curve.evaluate(t)).dot(&tangent) / speed_sq;
        if !step.is_finite() {
            break;
        }
        t += step;
        if step.abs() <= STEP_FLOOR {
            break;
        }
    }
    t
}
