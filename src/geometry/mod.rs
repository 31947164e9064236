pub mod bounding_box;
pub mod curve;

pub use bounding_box::{bbox, bbox_line_intersect, BoundingBox, BoxIntersection};
pub use curve::{derivative, BezierCurve, Hodograph, ParamInterval};
