mod candidate;
mod params;
mod regions;
mod result;

pub use params::IntersectionParams;
pub use regions::ParamRegion;
pub use result::{CurveIntersections, IntersectionRoot};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::geometry::{bbox_line_intersect, BezierCurve, BoxIntersection, ParamInterval};
use crate::math::intersect_2d::{collinear_overlap, parallel_different, segment_intersection};
use crate::math::Point2;
use crate::operations::query::{newton_refine_with_tolerance, project_point};

use candidate::{CandidatePair, Segment};
use regions::{connected_components, covered_length, merge_regions};
use result::sort_roots;

/// Newton polishing stops once a step moves neither parameter further than this.
const NEWTON_STEP_FLOOR: f64 = 4.0 * f64::EPSILON;

/// Finds all intersections of two planar Bezier curves.
///
/// # Algorithm
///
/// 1. Start from the pair of whole curves.
/// 2. Each round, discard pairs whose control-point boxes are disjoint and
///    subdivide every segment that is not yet flat.
/// 3. Pairs of flat segments are intersected as chords, then polished with
///    Newton steps on the input curves.
/// 4. Candidates that keep covering the same parameter ranges round after
///    round are checked against the curves; where the curves really coincide
///    the overlap is reported with its ends snapped to curve endpoints.
///    Candidates left at the depth limit are reported as unresolved.
/// 5. Roots are deduplicated and sorted by `s` then `t`.
#[derive(Debug)]
pub struct CurveCurveIntersect<'a> {
    curve1: &'a BezierCurve<2>,
    curve2: &'a BezierCurve<2>,
    params: IntersectionParams,
}

impl<'a> CurveCurveIntersect<'a> {
    /// Creates a new intersection operation with default parameters.
    #[must_use]
    pub fn new(curve1: &'a BezierCurve<2>, curve2: &'a BezierCurve<2>) -> Self {
        Self {
            curve1,
            curve2,
            params: IntersectionParams::default(),
        }
    }

    /// Replaces the tolerances and budgets.
    #[must_use]
    pub fn with_params(mut self, params: IntersectionParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the intersection.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the parameters are invalid.
    /// Geometric degeneracies are never errors; they are reported in the result.
    pub fn execute(&self) -> Result<CurveIntersections> {
        self.params.validate()?;
        Ok(Search::new(self.curve1, self.curve2, &self.params).run())
    }
}

/// Intersects two curves with default parameters.
///
/// # Errors
///
/// See [`CurveCurveIntersect::execute`].
pub fn intersect(
    curve1: &BezierCurve<2>,
    curve2: &BezierCurve<2>,
) -> Result<CurveIntersections> {
    CurveCurveIntersect::new(curve1, curve2).execute()
}

/// Outcome of examining one candidate pair.
enum Step {
    Rejected,
    Roots(Vec<IntersectionRoot>),
    Split(Vec<CandidatePair>),
    Overlap(ParamRegion),
}

/// Tracks how much of each curve the live candidates cover.
struct Stagnation {
    ratio: f64,
    rounds: usize,
    min_depth: usize,
    previous: Option<(f64, f64)>,
    streak: usize,
}

impl Stagnation {
    fn new(params: &IntersectionParams) -> Self {
        Self {
            ratio: params.stagnation_ratio,
            rounds: params.stagnation_rounds,
            min_depth: params.stagnation_min_depth,
            previous: None,
            streak: 0,
        }
    }

    /// Records a round; returns `true` once enough consecutive rounds failed
    /// to shrink the covered parameter ranges.
    fn observe(&mut self, depth: usize, candidates: &[CandidatePair]) -> bool {
        let coverage = (
            covered_length(candidates.iter().map(|c| c.first.interval)),
            covered_length(candidates.iter().map(|c| c.second.interval)),
        );
        let stagnant = depth >= self.min_depth
            && self.previous.is_some_and(|(s, t)| {
                coverage.0 >= self.ratio * s && coverage.1 >= self.ratio * t
            });
        self.previous = Some(coverage);
        self.streak = if stagnant { self.streak + 1 } else { 0 };
        self.streak >= self.rounds
    }

    fn reset(&mut self) {
        self.streak = 0;
    }
}

/// State shared by every round of one intersection.
struct Search<'a> {
    curve1: &'a BezierCurve<2>,
    curve2: &'a BezierCurve<2>,
    params: &'a IntersectionParams,
    flat_tolerance: f64,
    residual_limit: f64,
}

impl<'a> Search<'a> {
    fn new(
        curve1: &'a BezierCurve<2>,
        curve2: &'a BezierCurve<2>,
        params: &'a IntersectionParams,
    ) -> Self {
        let scale = curve1
            .max_abs_coordinate()
            .max(curve2.max_abs_coordinate())
            .max(1.0);
        Self {
            curve1,
            curve2,
            params,
            flat_tolerance: params.linearization_tolerance * scale,
            residual_limit: params.residual_tolerance * scale,
        }
    }

    fn run(&self) -> CurveIntersections {
        let mut frontier = vec![CandidatePair::new(
            Segment::whole(self.curve1),
            Segment::whole(self.curve2),
        )];
        let mut roots = Vec::new();
        let mut overlaps = Vec::new();
        let mut unresolved = Vec::new();
        let mut stagnation = Stagnation::new(self.params);
        let mut depth = 0;

        while !frontier.is_empty() {
            if depth >= self.params.max_subdivisions {
                warn!(
                    depth,
                    candidates = frontier.len(),
                    "subdivision limit reached, reporting unresolved regions"
                );
                unresolved = merge_regions(&regions_of(&frontier));
                break;
            }

            let mut next = Vec::new();
            for pair in frontier {
                match self.step(pair) {
                    Step::Rejected => {}
                    Step::Roots(found) => roots.extend(found),
                    Step::Split(children) => next.extend(children),
                    Step::Overlap(region) => overlaps.push(region),
                }
            }
            depth += 1;
            debug!(
                depth,
                candidates = next.len(),
                roots = roots.len(),
                "subdivision round"
            );

            if next.len() > self.params.max_candidates {
                warn!(
                    depth,
                    candidates = next.len(),
                    "candidate budget exceeded, reporting unresolved regions"
                );
                unresolved = merge_regions(&regions_of(&next));
                break;
            }

            if stagnation.observe(depth, &next) {
                let (coincident, rest) = self.extract_coincident(next);
                if !coincident.is_empty() {
                    info!(
                        depth,
                        regions = coincident.len(),
                        "candidates stopped shrinking, treating as coincident"
                    );
                }
                overlaps.extend(coincident);
                stagnation.reset();
                next = rest;
            }

            frontier = next;
        }

        let coincident = merge_regions(&overlaps);
        let roots = self.deduplicate(roots);
        CurveIntersections::new(roots, coincident, unresolved, self.params.parameter_wiggle)
    }

    fn step(&self, pair: CandidatePair) -> Step {
        let first_flat = pair.first.is_flat(self.flat_tolerance);
        let second_flat = pair.second.is_flat(self.flat_tolerance);

        match pair.first.bbox().classify(&pair.second.bbox()) {
            BoxIntersection::Disjoint => Step::Rejected,
            _ if first_flat && second_flat => self.intersect_chords(&pair),
            BoxIntersection::Tangent => match self.shared_endpoints(&pair) {
                Step::Rejected => self.subdivide(pair, first_flat, second_flat),
                found => found,
            },
            BoxIntersection::Intersection => self.subdivide(pair, first_flat, second_flat),
        }
    }

    /// Splits a pair that still has a curved segment. When the other segment
    /// is already flat, its chord must reach the curved segment's box first.
    fn subdivide(&self, pair: CandidatePair, first_flat: bool, second_flat: bool) -> Step {
        let line_check = if first_flat {
            let (start, end) = pair.first.chord();
            bbox_line_intersect(&pair.second.bbox(), &start, &end)
        } else if second_flat {
            let (start, end) = pair.second.chord();
            bbox_line_intersect(&pair.first.bbox(), &start, &end)
        } else {
            BoxIntersection::Intersection
        };

        if line_check == BoxIntersection::Disjoint {
            Step::Rejected
        } else {
            Step::Split(pair.split(self.flat_tolerance))
        }
    }

    /// Handles a pair of flat segments by intersecting their chords.
    fn intersect_chords(&self, pair: &CandidatePair) -> Step {
        let (a0, a1) = pair.first.chord();
        let (b0, b1) = pair.second.chord();
        let wiggle = self.params.parameter_wiggle;

        if let Some((ls, lt)) = segment_intersection(&a0, &a1, &b0, &b1) {
            if ParamInterval::UNIT.contains(ls, wiggle) && ParamInterval::UNIT.contains(lt, wiggle)
            {
                let s = pair.first.interval.to_global(ls);
                let t = pair.second.interval.to_global(lt);
                return self.root_step(s, t);
            }
            return self.polish_near(pair);
        }

        if parallel_different(&a0, &a1, &b0, &b1) {
            return self.polish_near(pair);
        }

        let Some(((s_lo, s_hi), (t_lo, t_hi))) = collinear_overlap(&a0, &a1, &b0, &b1) else {
            return self.polish_near(pair);
        };
        let region = ParamRegion::new(
            ParamInterval::new(
                pair.first.interval.to_global(s_lo),
                pair.first.interval.to_global(s_hi),
            ),
            ParamInterval::new(
                pair.second.interval.to_global(t_lo),
                pair.second.interval.to_global(t_hi),
            ),
        );

        let tolerance = self.params.parameter_tolerance;
        if region.s.width() <= tolerance && region.t.width() <= tolerance {
            self.root_step(region.s.midpoint(), region.t.midpoint())
        } else {
            Step::Overlap(region)
        }
    }

    /// Last attempt for flat segments whose chords miss each other: polish
    /// from the segment midpoints and keep the result only if it stays near
    /// the pair. This is what finds tangential contacts.
    fn polish_near(&self, pair: &CandidatePair) -> Step {
        let (first, second) = (pair.first.interval, pair.second.interval);
        match self.polish(first.midpoint(), second.midpoint()) {
            Some(root)
                if first.contains(root.s, first.width())
                    && second.contains(root.t, second.width()) =>
            {
                Step::Roots(vec![root])
            }
            _ => Step::Rejected,
        }
    }

    /// Touching boxes only matter if the segments share an exact endpoint.
    fn shared_endpoints(&self, pair: &CandidatePair) -> Step {
        let (a0, a1) = pair.first.chord();
        let (b0, b1) = pair.second.chord();
        let ends1 = [(a0, pair.first.interval.start), (a1, pair.first.interval.end)];
        let ends2 = [(b0, pair.second.interval.start), (b1, pair.second.interval.end)];

        let mut roots = Vec::new();
        for (p, s) in ends1 {
            for (q, t) in ends2 {
                if p == q {
                    roots.push(self.make_root(s, t));
                }
            }
        }

        if roots.is_empty() {
            Step::Rejected
        } else {
            Step::Roots(roots)
        }
    }

    fn root_step(&self, s: f64, t: f64) -> Step {
        self.polish(s, t)
            .map_or(Step::Rejected, |root| Step::Roots(vec![root]))
    }

    /// Runs Newton steps on the input curves and validates the result.
    ///
    /// A singular Jacobian ends the iteration but does not reject the
    /// estimate; the residual test decides.
    fn polish(&self, s: f64, t: f64) -> Option<IntersectionRoot> {
        let (mut s, mut t) = (s, t);
        for _ in 0..self.params.newton_iterations {
            let Ok((next_s, next_t)) = newton_refine_with_tolerance(
                s,
                self.curve1,
                t,
                self.curve2,
                self.params.singular_tolerance,
            ) else {
                break;
            };
            let moved = (next_s - s).abs().max((next_t - t).abs());
            s = next_s;
            t = next_t;
            if moved.is_nan() || moved <= NEWTON_STEP_FLOOR {
                break;
            }
        }

        let wiggle = self.params.parameter_wiggle;
        if !ParamInterval::UNIT.contains(s, wiggle) || !ParamInterval::UNIT.contains(t, wiggle) {
            return None;
        }

        let root = self.make_root(s.clamp(0.0, 1.0), t.clamp(0.0, 1.0));
        (root.residual <= self.residual_limit).then_some(root)
    }

    fn make_root(&self, s: f64, t: f64) -> IntersectionRoot {
        let point = self.curve1.evaluate(s);
        let residual = (point - self.curve2.evaluate(t)).norm();
        IntersectionRoot {
            s,
            t,
            point,
            residual,
        }
    }

    /// Splits off the connected components of live candidates along which the
    /// curves coincide. Every other candidate keeps searching.
    fn extract_coincident(
        &self,
        candidates: Vec<CandidatePair>,
    ) -> (Vec<ParamRegion>, Vec<CandidatePair>) {
        let regions = regions_of(&candidates);
        let mut slots: Vec<Option<CandidatePair>> = candidates.into_iter().map(Some).collect();
        let mut coincident = Vec::new();
        let mut rest = Vec::new();

        for component in connected_components(&regions) {
            let cells: Vec<ParamRegion> = component.iter().map(|&i| regions[i]).collect();
            if let Some(overlap) = self.confirm_overlap(&cells) {
                coincident.push(overlap);
            } else {
                rest.extend(component.iter().filter_map(|&i| slots[i].take()));
            }
        }

        (coincident, rest)
    }

    /// Checks a cluster of candidate cells against the curves themselves.
    ///
    /// The cluster must span many cells in both parameters, and points
    /// sampled along it must lie on both curves. The overlap is then rebuilt
    /// from its true ends: each end of a coincident stretch is an endpoint of
    /// one of the curves lying on the other.
    fn confirm_overlap(&self, cells: &[ParamRegion]) -> Option<ParamRegion> {
        let hull = cells.iter().copied().reduce(|acc, r| acc.hull(&r))?;
        let widest_s = cells.iter().map(|c| c.s.width()).fold(0.0_f64, f64::max);
        let widest_t = cells.iter().map(|c| c.t.width()).fold(0.0_f64, f64::max);
        let factor = self.params.coincident_span_factor;
        if hull.s.width() < factor * widest_s || hull.t.width() < factor * widest_t {
            return None;
        }

        let mut ordered = cells.to_vec();
        ordered.sort_by(|a, b| a.s.midpoint().total_cmp(&b.s.midpoint()));
        let last = ordered.len() - 1;
        let samples = self.params.coincidence_samples;
        for k in 0..samples {
            let cell = ordered[k * last / (samples - 1)];
            let (s, t) = (cell.s.midpoint(), cell.t.midpoint());
            if self.locate(self.curve2, &self.curve1.evaluate(s), t).is_none()
                || self.locate(self.curve1, &self.curve2.evaluate(t), s).is_none()
            {
                debug!(
                    s_start = hull.s.start,
                    s_end = hull.s.end,
                    "stagnant candidates are not coincident, continuing"
                );
                return None;
            }
        }

        let wiggle = self.params.parameter_wiggle;
        let slack = (2.0 * widest_s + wiggle, 2.0 * widest_t + wiggle);
        let forward = ordered[last].t.midpoint() >= ordered[0].t.midpoint();
        let (t_first, t_last) = if forward {
            (hull.t.start, hull.t.end)
        } else {
            (hull.t.end, hull.t.start)
        };
        let (t_end_first, t_end_last) = if forward { (0.0, 1.0) } else { (1.0, 0.0) };

        let (s_lo, t_at_lo) = self.overlap_end((0.0, t_end_first), (hull.s.start, t_first), slack)?;
        let (s_hi, t_at_hi) = self.overlap_end((1.0, t_end_last), (hull.s.end, t_last), slack)?;
        if s_hi <= s_lo {
            return None;
        }

        Some(ParamRegion::new(
            ParamInterval::new(s_lo, s_hi),
            ParamInterval::new(t_at_lo.min(t_at_hi), t_at_lo.max(t_at_hi)),
        ))
    }

    /// Locates one end of an overlap near the hull corner `near`.
    ///
    /// `ends` holds the curve endpoint parameters `(s, t)` that can bound the
    /// overlap on this side. The end is `curve1(ends.0)` when that point lies
    /// on `curve2`, otherwise `curve2(ends.1)` when it lies on `curve1`.
    fn overlap_end(
        &self,
        ends: (f64, f64),
        near: (f64, f64),
        slack: (f64, f64),
    ) -> Option<(f64, f64)> {
        let close = |value: f64, target: f64, limit: f64| (value - target).abs() <= limit;

        if close(ends.0, near.0, slack.0) {
            if let Some(t) = self.locate(self.curve2, &self.curve1.evaluate(ends.0), near.1) {
                if close(t, near.1, slack.1) {
                    return Some((ends.0, t.clamp(0.0, 1.0)));
                }
            }
        }

        if close(ends.1, near.1, slack.1) {
            if let Some(s) = self.locate(self.curve1, &self.curve2.evaluate(ends.1), near.0) {
                if close(s, near.0, slack.0) {
                    return Some((s.clamp(0.0, 1.0), ends.1));
                }
            }
        }

        None
    }

    /// Parameter of `point` on `curve`, if the point lies on it.
    fn locate(&self, curve: &BezierCurve<2>, point: &Point2, guess: f64) -> Option<f64> {
        let t = project_point(curve, point, guess, self.params.newton_iterations);
        ((curve.evaluate(t) - point).norm() <= self.residual_limit).then_some(t)
    }

    /// Merges roots that are the same point found from neighbouring
    /// candidates, keeping the smallest residual.
    fn deduplicate(&self, mut roots: Vec<IntersectionRoot>) -> Vec<IntersectionRoot> {
        sort_roots(&mut roots);
        let mut kept: Vec<IntersectionRoot> = Vec::with_capacity(roots.len());
        for root in roots {
            if let Some(existing) = kept.iter_mut().find(|k| self.same_root(k, &root)) {
                if root.residual < existing.residual {
                    *existing = root;
                }
            } else {
                kept.push(root);
            }
        }
        sort_roots(&mut kept);
        kept
    }

    /// Two estimates are one root when their parameters agree to
    /// `parameter_tolerance`. Tangential roots converge slowly, so estimates a
    /// little further apart also merge when the parameter midpoint between
    /// them is itself a root.
    fn same_root(&self, a: &IntersectionRoot, b: &IntersectionRoot) -> bool {
        let ds = (a.s - b.s).abs();
        let dt = (a.t - b.t).abs();
        let tolerance = self.params.parameter_tolerance;
        if ds < tolerance && dt < tolerance {
            return true;
        }
        let width = self.params.tangent_merge_width;
        if ds > width || dt > width {
            return false;
        }
        self.make_root(0.5 * (a.s + b.s), 0.5 * (a.t + b.t)).residual <= self.residual_limit
    }
}

fn regions_of(candidates: &[CandidatePair]) -> Vec<ParamRegion> {
    candidates.iter().map(CandidatePair::region).collect()
}
