use thiserror::Error;

/// Top-level error type for the intersection kernel.
#[derive(Debug, Error)]
pub enum BezierError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("a curve needs at least 2 control points, got {0}")]
    TooFewNodes(usize),

    #[error("control point {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    #[error("control point {index} has {found} coordinates, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("singular jacobian at s = {s}, t = {t} (determinant {determinant})")]
    SingularJacobian { s: f64, t: f64, determinant: f64 },
}

/// Errors related to kernel operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`BezierError`].
pub type Result<T> = std::result::Result<T, BezierError>;
