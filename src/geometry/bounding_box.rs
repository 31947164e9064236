use crate::math::intersect_2d::segment_intersection;
use crate::math::{Point2, PointN};

use super::curve::BezierCurve;

/// How two boxes (or a box and a segment) relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxIntersection {
    /// The interiors overlap.
    Intersection,
    /// The boxes touch along an edge or at a corner but do not overlap.
    Tangent,
    /// The boxes are separated.
    Disjoint,
}

/// An axis-aligned bounding box of dimension `D`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox<const D: usize> {
    /// Minimum corner of the bounding box.
    pub min: PointN<D>,
    /// Maximum corner of the bounding box.
    pub max: PointN<D>,
}

impl<const D: usize> BoundingBox<D> {
    /// Creates a box from its corners.
    #[must_use]
    pub fn new(min: PointN<D>, max: PointN<D>) -> Self {
        Self { min, max }
    }

    /// Computes the box enclosing a curve's control points.
    ///
    /// By the convex hull property the curve itself never leaves this box.
    #[must_use]
    pub fn from_curve(curve: &BezierCurve<D>) -> Self {
        let first = curve.start();
        let (min, max) = curve
            .nodes()
            .iter()
            .skip(1)
            .fold((first, first), |(mut min, mut max), p| {
                for axis in 0..D {
                    min[axis] = min[axis].min(p[axis]);
                    max[axis] = max[axis].max(p[axis]);
                }
                (min, max)
            });
        Self { min, max }
    }

    /// Classifies the relationship between two boxes.
    ///
    /// Boxes separated along any axis are disjoint. Otherwise, boxes whose
    /// edges coincide along some axis (one box's max equals the other's min)
    /// only touch and are tangent. Everything else intersects.
    #[must_use]
    pub fn classify(&self, other: &Self) -> BoxIntersection {
        let mut touching = false;
        for axis in 0..D {
            if self.max[axis] < other.min[axis] || other.max[axis] < self.min[axis] {
                return BoxIntersection::Disjoint;
            }
            if self.max[axis] == other.min[axis] || other.max[axis] == self.min[axis] {
                touching = true;
            }
        }

        if touching {
            BoxIntersection::Tangent
        } else {
            BoxIntersection::Intersection
        }
    }

    /// Strict overlap test: boxes that merely touch do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.classify(other) == BoxIntersection::Intersection
    }

    /// Whether `point` lies inside the box or on its boundary.
    #[must_use]
    pub fn contains(&self, point: &PointN<D>) -> bool {
        (0..D).all(|axis| self.min[axis] <= point[axis] && point[axis] <= self.max[axis])
    }
}

/// Bounding box of a curve's control points.
#[must_use]
pub fn bbox<const D: usize>(curve: &BezierCurve<D>) -> BoundingBox<D> {
    BoundingBox::from_curve(curve)
}

/// Classifies a planar box against the segment from `start` to `end`.
///
/// A segment with an endpoint in the box, or crossing one of its edges,
/// intersects it. A segment that only grazes a corner is tangent.
#[must_use]
pub fn bbox_line_intersect(bbox: &BoundingBox<2>, start: &Point2, end: &Point2) -> BoxIntersection {
    if bbox.contains(start) || bbox.contains(end) {
        return BoxIntersection::Intersection;
    }

    let corners = [
        Point2::new(bbox.min.x, bbox.min.y),
        Point2::new(bbox.max.x, bbox.min.y),
        Point2::new(bbox.max.x, bbox.max.y),
        Point2::new(bbox.min.x, bbox.max.y),
    ];

    let mut tangent = false;
    for i in 0..4 {
        let (c0, c1) = (&corners[i], &corners[(i + 1) % 4]);
        let Some((s, t)) = segment_intersection(start, end, c0, c1) else {
            continue;
        };
        if !(0.0..=1.0).contains(&s) || !(0.0..=1.0).contains(&t) {
            continue;
        }
        if t == 0.0 || t == 1.0 {
            tangent = true;
        } else {
            return BoxIntersection::Intersection;
        }
    }

    if tangent {
        BoxIntersection::Tangent
    } else {
        BoxIntersection::Disjoint
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    type Curve2 = BezierCurve<2>;

    fn unit_square_offset(dx: f64, dy: f64) -> Curve2 {
        Curve2::from_rows(&[
            [dx, dy],
            [1.0 + dx, dy],
            [1.0 + dx, 1.0 + dy],
            [dx, 1.0 + dy],
        ])
        .unwrap()
    }

    fn check(a: &Curve2, b: &Curve2) -> bool {
        let (box_a, box_b) = (bbox(a), bbox(b));
        let forward = box_a.intersects(&box_b);
        assert_eq!(forward, box_b.intersects(&box_a), "intersects is not symmetric");
        forward
    }

    #[test]
    fn box_of_control_points() {
        let curve = Curve2::from_rows(&[[1.0, 2.0], [-1.0, 5.0], [3.0, 0.5]]).unwrap();
        let b = bbox(&curve);
        assert_eq!(b.min, Point2::new(-1.0, 0.5));
        assert_eq!(b.max, Point2::new(3.0, 5.0));
    }

    #[test]
    fn overlapping_squares_intersect() {
        assert!(check(&unit_square_offset(0.0, 0.0), &unit_square_offset(0.5, 0.5)));
    }

    #[test]
    fn far_apart_squares_do_not_intersect() {
        let (a, b) = (unit_square_offset(0.0, 0.0), unit_square_offset(100.0, 100.0));
        assert!(!check(&a, &b));
        assert_eq!(bbox(&a).classify(&bbox(&b)), BoxIntersection::Disjoint);
    }

    #[test]
    fn squares_sharing_an_edge_do_not_intersect() {
        let (a, b) = (unit_square_offset(0.0, 0.0), unit_square_offset(1.0, 0.0));
        assert!(!check(&a, &b));
        assert_eq!(bbox(&a).classify(&bbox(&b)), BoxIntersection::Tangent);
    }

    #[test]
    fn squares_sharing_a_corner_do_not_intersect() {
        let (a, b) = (unit_square_offset(0.0, 0.0), unit_square_offset(1.0, 1.0));
        assert!(!check(&a, &b));
        assert_eq!(bbox(&a).classify(&bbox(&b)), BoxIntersection::Tangent);
    }

    #[test]
    fn almost_touching_squares_do_not_intersect() {
        let dx = 1.0 + f64::EPSILON;
        let (a, b) = (unit_square_offset(0.0, 0.0), unit_square_offset(dx, 0.0));
        assert!(!check(&a, &b));
        assert_eq!(bbox(&a).classify(&bbox(&b)), BoxIntersection::Disjoint);
    }

    #[test]
    fn flat_box_crossing_another_box_intersects() {
        let horizontal = Curve2::from_rows(&[[0.0, 0.0], [1.0, 0.0]]).unwrap();
        let vertical = Curve2::from_rows(&[[0.5, -1.0], [0.5, 1.0]]).unwrap();
        assert!(check(&horizontal, &vertical));
    }

    #[test]
    fn flat_boxes_on_the_same_line_touch() {
        let a = Curve2::from_rows(&[[0.0, 0.0], [2.0, 0.0]]).unwrap();
        let b = Curve2::from_rows(&[[1.0, 0.0], [3.0, 0.0]]).unwrap();
        assert_eq!(bbox(&a).classify(&bbox(&b)), BoxIntersection::Tangent);
    }

    #[test]
    fn three_dimensional_boxes() {
        let a = BezierCurve::<3>::from_rows(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]).unwrap();
        let b = BezierCurve::<3>::from_rows(&[[0.5, 0.5, 2.0], [1.5, 1.5, 3.0]]).unwrap();
        let c = BezierCurve::<3>::from_rows(&[[0.5, 0.5, 0.5], [1.5, 1.5, 3.0]]).unwrap();
        assert!(!bbox(&a).intersects(&bbox(&b)));
        assert!(bbox(&a).intersects(&bbox(&c)));
    }

    #[test]
    fn segment_through_box() {
        let b = BoundingBox::new(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0));
        let result = bbox_line_intersect(&b, &Point2::new(-1.0, 0.5), &Point2::new(2.0, 0.5));
        assert_eq!(result, BoxIntersection::Intersection);
    }

    #[test]
    fn segment_with_endpoint_inside_box() {
        let b = BoundingBox::new(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0));
        let result = bbox_line_intersect(&b, &Point2::new(0.5, 0.5), &Point2::new(3.0, 3.0));
        assert_eq!(result, BoxIntersection::Intersection);
    }

    #[test]
    fn segment_grazing_a_corner() {
        let b = BoundingBox::new(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0));
        let result = bbox_line_intersect(&b, &Point2::new(0.0, 2.0), &Point2::new(2.0, 0.0));
        assert_eq!(result, BoxIntersection::Tangent);
    }

    #[test]
    fn segment_missing_box() {
        let b = BoundingBox::new(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0));
        let result = bbox_line_intersect(&b, &Point2::new(2.0, 0.0), &Point2::new(3.0, 5.0));
        assert_eq!(result, BoxIntersection::Disjoint);
    }
}
