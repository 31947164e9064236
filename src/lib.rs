pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;

pub use error::{BezierError, Result};
pub use geometry::{BezierCurve, BoundingBox, BoxIntersection, ParamInterval};
pub use operations::intersection::{
    intersect, CurveCurveIntersect, CurveIntersections, IntersectionParams, IntersectionRoot,
    ParamRegion,
};
