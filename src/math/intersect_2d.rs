use super::{Matrix2, Point2, Vector2, SINGULAR_TOLERANCE, TOLERANCE};

/// Z component of the cross product of two planar vectors.
#[must_use]
pub fn cross_2d(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Solves `matrix * x = rhs` with Cramer's rule.
///
/// Returns `None` when `|det| <= tolerance * |col0| * |col1|`, i.e. when the
/// columns are (nearly) parallel or one of them vanishes.
#[must_use]
pub fn solve_2x2(matrix: &Matrix2, rhs: &Vector2, tolerance: f64) -> Option<Vector2> {
    let (a, b) = (matrix[(0, 0)], matrix[(0, 1)]);
    let (c, d) = (matrix[(1, 0)], matrix[(1, 1)]);
    let det = a * d - b * c;

    let scale = matrix.column(0).norm() * matrix.column(1).norm();
    if det.abs() <= tolerance * scale {
        return None;
    }

    Some(Vector2::new(
        (rhs.x * d - b * rhs.y) / det,
        (a * rhs.y - c * rhs.x) / det,
    ))
}

/// Intersects the infinite lines through two segments.
///
/// The first line is `start0 + s * (end0 - start0)` and the second is
/// `start1 + t * (end1 - start1)`. Returns `(s, t)` without restricting it to
/// `[0, 1]`, or `None` when the lines are parallel or a segment has zero length.
#[must_use]
pub fn segment_intersection(
    start0: &Point2,
    end0: &Point2,
    start1: &Point2,
    end1: &Point2,
) -> Option<(f64, f64)> {
    let d0 = end0 - start0;
    let d1 = end1 - start1;

    let cross = cross_2d(&d0, &d1);
    if cross.abs() <= SINGULAR_TOLERANCE * d0.norm() * d1.norm() {
        return None;
    }

    let delta = start1 - start0;
    let s = cross_2d(&delta, &d1) / cross;
    let t = cross_2d(&delta, &d0) / cross;
    Some((s, t))
}

/// Decides whether two parallel segments are genuinely separate.
///
/// Returns `true` when the segments lie on different lines, or on the same
/// line without sharing any point. Returns `false` when they overlap, even if
/// only at a single point.
#[must_use]
pub fn parallel_different(start0: &Point2, end0: &Point2, start1: &Point2, end1: &Point2) -> bool {
    let d0 = end0 - start0;
    let d1 = end1 - start1;

    if d0.norm_squared() == 0.0 {
        if d1.norm_squared() == 0.0 {
            return start0 != start1;
        }
        return parallel_different(start1, end1, start0, end0);
    }

    // Distance from `start1` to the first line.
    let offset = cross_2d(&d0, &(start1 - start0)).abs() / d0.norm();
    if offset > TOLERANCE {
        return true;
    }

    if d1.norm_squared() == 0.0 {
        let r = (start1 - start0).dot(&d0) / d0.norm_squared();
        return !(0.0..=1.0).contains(&r);
    }

    collinear_overlap(start0, end0, start1, end1).is_none()
}

/// Overlap of two collinear segments, in each segment's own parameter.
///
/// Returns `((s_lo, s_hi), (t_lo, t_hi))` with both ranges clamped to
/// `[0, 1]` and sorted. A single shared point yields a zero-width range.
/// The segments are assumed collinear; `None` means they are disjoint or one
/// of them has zero length.
#[must_use]
pub fn collinear_overlap(
    start0: &Point2,
    end0: &Point2,
    start1: &Point2,
    end1: &Point2,
) -> Option<((f64, f64), (f64, f64))> {
    let d0 = end0 - start0;
    let d1 = end1 - start1;
    let len0_sq = d0.norm_squared();
    let len1_sq = d1.norm_squared();
    if len0_sq == 0.0 || len1_sq == 0.0 {
        return None;
    }

    let r0 = (start1 - start0).dot(&d0) / len0_sq;
    let r1 = (end1 - start0).dot(&d0) / len0_sq;
    let s_lo = r0.min(r1).max(0.0);
    let s_hi = r0.max(r1).min(1.0);
    if s_lo > s_hi {
        return None;
    }

    let project = |s: f64| ((start0 + d0 * s) - start1).dot(&d1) / len1_sq;
    let u0 = project(s_lo).clamp(0.0, 1.0);
    let u1 = project(s_hi).clamp(0.0, 1.0);

    Some(((s_lo, s_hi), (u0.min(u1), u0.max(u1))))
}
