pub mod intersect_2d;

/// Point of dimension `D`.
pub type PointN<const D: usize> = nalgebra::Point<f64, D>;

/// Vector of dimension `D`.
pub type VectorN<const D: usize> = nalgebra::SVector<f64, D>;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 2x2 matrix, used for Newton Jacobians.
pub type Matrix2 = nalgebra::Matrix2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Relative threshold under which a 2x2 determinant is treated as zero.
///
/// The determinant is compared against the product of the column norms, so
/// the test is independent of the curves' scale.
pub const SINGULAR_TOLERANCE: f64 = 1e-12;
