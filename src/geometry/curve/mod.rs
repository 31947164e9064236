mod bezier;
mod hodograph;

pub use bezier::BezierCurve;
pub use hodograph::{derivative, Hodograph};

use crate::math::VectorN;

/// A closed sub-range of a curve's `[0, 1]` parameter domain.
///
/// Subdivided segments carry one of these so that local parameters can be
/// mapped back onto the curve they were cut from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamInterval {
    /// Start of the range.
    pub start: f64,
    /// End of the range.
    pub end: f64,
}

impl ParamInterval {
    /// The full parameter domain `[0, 1]`.
    pub const UNIT: Self = Self {
        start: 0.0,
        end: 1.0,
    };

    /// Creates a new interval.
    #[must_use]
    pub fn new(start: f64, end: f64) -> Self {
        debug_assert!(start <= end, "interval [{start}, {end}] is reversed");
        Self { start, end }
    }

    /// Returns `end - start`.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// Returns the centre of the interval.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.start + self.end)
    }

    /// Maps a parameter local to this interval (`0` at `start`, `1` at `end`)
    /// onto the enclosing domain.
    #[must_use]
    pub fn to_global(&self, local: f64) -> f64 {
        self.start + local * self.width()
    }

    /// Splits the interval at its midpoint.
    #[must_use]
    pub fn halves(&self) -> (Self, Self) {
        let mid = self.midpoint();
        (Self::new(self.start, mid), Self::new(mid, self.end))
    }

    /// Whether `value` lies in the interval widened by `wiggle` on both ends.
    #[must_use]
    pub fn contains(&self, value: f64, wiggle: f64) -> bool {
        value >= self.start - wiggle && value <= self.end + wiggle
    }

    /// Whether the two intervals overlap or share an endpoint.
    #[must_use]
    pub fn touches(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Smallest interval containing both.
    #[must_use]
    pub fn hull(&self, other: &Self) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// Blends control vectors down to a single value with de Casteljau's scheme.
///
/// `work` is consumed as scratch space. An empty input yields the zero vector.
pub(crate) fn de_casteljau<const D: usize>(mut work: Vec<VectorN<D>>, s: f64) -> VectorN<D> {
    let r = 1.0 - s;
    for level in (1..work.len()).rev() {
        for i in 0..level {
            work[i] = work[i] * r + work[i + 1] * s;
        }
    }
    work.first().copied().unwrap_or_else(VectorN::zeros)
}
