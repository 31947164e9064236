use crate::math::Point2;

use super::regions::ParamRegion;

/// A single point where the two curves meet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionRoot {
    /// Parameter on the first curve.
    pub s: f64,
    /// Parameter on the second curve.
    pub t: f64,
    /// The intersection point, evaluated on the first curve.
    pub point: Point2,
    /// Distance between `curve1(s)` and `curve2(t)`.
    pub residual: f64,
}

/// Everything a curve-curve intersection found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveIntersections {
    /// Isolated intersection points, sorted by `s` then `t`.
    pub roots: Vec<IntersectionRoot>,
    /// Parameter ranges over which the curves coincide.
    pub coincident: Vec<ParamRegion>,
    /// Ranges the search gave up on before deciding them.
    pub unresolved: Vec<ParamRegion>,
}

impl CurveIntersections {
    /// Assembles the final result.
    ///
    /// Roots inside a coincident region are part of the overlap and are
    /// dropped; the remaining roots are sorted by `s`, ties by `t`.
    pub(crate) fn new(
        roots: Vec<IntersectionRoot>,
        coincident: Vec<ParamRegion>,
        unresolved: Vec<ParamRegion>,
        wiggle: f64,
    ) -> Self {
        let mut roots: Vec<IntersectionRoot> = roots
            .into_iter()
            .filter(|root| {
                !coincident
                    .iter()
                    .any(|region| region.contains(root.s, root.t, wiggle))
            })
            .collect();
        sort_roots(&mut roots);

        Self {
            roots,
            coincident,
            unresolved,
        }
    }

    /// Whether the curves overlap along some stretch.
    #[must_use]
    pub fn is_coincident(&self) -> bool {
        !self.coincident.is_empty()
    }

    /// Whether every candidate region was decided.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Whether no intersection of any kind was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty() && self.coincident.is_empty() && self.unresolved.is_empty()
    }
}

/// Orders roots by ascending `s`, ties by ascending `t`.
pub(crate) fn sort_roots(roots: &mut [IntersectionRoot]) {
    roots.sort_by(|a, b| a.s.total_cmp(&b.s).then(a.t.total_cmp(&b.t)));
}
