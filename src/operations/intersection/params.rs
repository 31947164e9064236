use crate::error::{OperationError, Result};
use crate::math::SINGULAR_TOLERANCE;

/// Tolerances and budgets for curve-curve intersection.
///
/// Length tolerances (`linearization_tolerance`, `residual_tolerance`) are
/// relative: they are multiplied by the largest absolute control point
/// coordinate of the two curves (or 1, whichever is larger).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionParams {
    /// Segments whose linearization error is at or below this are treated as lines.
    pub linearization_tolerance: f64,
    /// Maximum number of subdivision rounds before a region is reported unresolved.
    pub max_subdivisions: usize,
    /// Maximum number of live candidate pairs in a single round.
    pub max_candidates: usize,
    /// Maximum number of Newton steps spent polishing one root.
    pub newton_iterations: usize,
    /// Roots closer than this in both parameters are merged.
    pub parameter_tolerance: f64,
    /// Slack allowed outside `[0, 1]` when accepting a parameter.
    pub parameter_wiggle: f64,
    /// Largest accepted distance between the two curve points of a root.
    pub residual_tolerance: f64,
    /// Relative determinant threshold under which a Jacobian is singular.
    pub singular_tolerance: f64,
    /// Coverage ratio between rounds at or above which a round counts as stagnant.
    pub stagnation_ratio: f64,
    /// Consecutive stagnant rounds that trigger the coincidence check.
    pub stagnation_rounds: usize,
    /// Rounds before which stagnation is not tracked.
    pub stagnation_min_depth: usize,
    /// A stagnant cluster is only checked for coincidence once its hull spans
    /// at least this many of its widest cells in both parameters.
    pub coincident_span_factor: f64,
    /// Cells sampled along a stagnant cluster to confirm that the curves
    /// really coincide there.
    pub coincidence_samples: usize,
    /// Root estimates this close in both parameters merge when the point
    /// between them is itself a root, which collapses tangential roots.
    pub tangent_merge_width: f64,
}

impl Default for IntersectionParams {
    fn default() -> Self {
        Self {
            linearization_tolerance: 0.5_f64.powi(22),
            max_subdivisions: 30,
            max_candidates: 4096,
            newton_iterations: 40,
            parameter_tolerance: 0.5_f64.powi(36),
            parameter_wiggle: 0.5_f64.powi(16),
            residual_tolerance: 1e-9,
            singular_tolerance: SINGULAR_TOLERANCE,
            stagnation_ratio: 0.875,
            stagnation_rounds: 5,
            stagnation_min_depth: 3,
            coincident_span_factor: 8.0,
            coincidence_samples: 9,
            tangent_merge_width: 0.5_f64.powi(20),
        }
    }
}

impl IntersectionParams {
    /// Checks that every tolerance is finite and positive and every budget non-zero.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let tolerances = [
            ("linearization_tolerance", self.linearization_tolerance),
            ("parameter_tolerance", self.parameter_tolerance),
            ("parameter_wiggle", self.parameter_wiggle),
            ("residual_tolerance", self.residual_tolerance),
            ("singular_tolerance", self.singular_tolerance),
            ("tangent_merge_width", self.tangent_merge_width),
        ];
        for (name, value) in tolerances {
            if !value.is_finite() || value <= 0.0 {
                return Err(OperationError::InvalidInput(format!(
                    "{name} must be finite and positive, got {value}"
                ))
                .into());
            }
        }

        if !(self.stagnation_ratio > 0.0 && self.stagnation_ratio <= 1.0) {
            return Err(OperationError::InvalidInput(format!(
                "stagnation_ratio must be in (0, 1], got {}",
                self.stagnation_ratio
            ))
            .into());
        }

        if !(self.coincident_span_factor.is_finite() && self.coincident_span_factor >= 1.0) {
            return Err(OperationError::InvalidInput(format!(
                "coincident_span_factor must be finite and at least 1, got {}",
                self.coincident_span_factor
            ))
            .into());
        }

        if self.coincidence_samples < 2 {
            return Err(OperationError::InvalidInput(format!(
                "coincidence_samples must be at least 2, got {}",
                self.coincidence_samples
            ))
            .into());
        }

        let budgets = [
            ("max_subdivisions", self.max_subdivisions),
            ("max_candidates", self.max_candidates),
            ("newton_iterations", self.newton_iterations),
            ("stagnation_rounds", self.stagnation_rounds),
        ];
        for (name, value) in budgets {
            if value == 0 {
                return Err(
                    OperationError::InvalidInput(format!("{name} must be non-zero")).into(),
                );
            }
        }

        Ok(())
    }
}
