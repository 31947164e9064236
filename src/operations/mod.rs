pub mod intersection;
pub mod query;

pub use intersection::{intersect, CurveCurveIntersect, CurveIntersections, IntersectionParams};
