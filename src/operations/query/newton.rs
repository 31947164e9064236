use crate::error::{GeometryError, Result};
use crate::geometry::BezierCurve;
use crate::math::intersect_2d::solve_2x2;
use crate::math::{Matrix2, SINGULAR_TOLERANCE};

/// Performs one Newton-Raphson step towards a common point of two curves.
///
/// Solves `curve1(s) = curve2(t)` linearized at the current guess. When the
/// residual is already exactly zero the guess is returned unchanged. One call
/// performs one step; iterating to convergence is left to the caller.
///
/// # Errors
///
/// Returns `GeometryError::SingularJacobian` if the tangents at the guess are
/// (nearly) parallel or vanish.
pub fn newton_refine(
    s: f64,
    curve1: &BezierCurve<2>,
    t: f64,
    curve2: &BezierCurve<2>,
) -> Result<(f64, f64)> {
    newton_refine_with_tolerance(s, curve1, t, curve2, SINGULAR_TOLERANCE)
}

/// Same as [`newton_refine`] with an explicit relative singularity threshold.
///
/// # Errors
///
/// Returns `GeometryError::SingularJacobian` if
/// `|det J| <= singular_tolerance * |J col0| * |J col1|`.
pub fn newton_refine_with_tolerance(
    s: f64,
    curve1: &BezierCurve<2>,
    t: f64,
    curve2: &BezierCurve<2>,
    singular_tolerance: f64,
) -> Result<(f64, f64)> {
    let residual = curve1.evaluate(s) - curve2.evaluate(t);
    if residual.x == 0.0 && residual.y == 0.0 {
        return Ok((s, t));
    }

    let jacobian = Matrix2::from_columns(&[curve1.derivative(s), -curve2.derivative(t)]);
    let Some(delta) = solve_2x2(&jacobian, &(-residual), singular_tolerance) else {
        return Err(GeometryError::SingularJacobian {
            s,
            t,
            determinant: jacobian.determinant(),
        }
        .into());
    };

    Ok((s + delta.x, t + delta.y))
}
