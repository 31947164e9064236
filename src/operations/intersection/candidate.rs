use crate::geometry::{BezierCurve, BoundingBox, ParamInterval};
use crate::math::Point2;
use crate::operations::query::linearization_error;

use super::regions::ParamRegion;

/// A piece of one of the input curves, with the parameter range it covers.
#[derive(Debug, Clone)]
pub(crate) struct Segment {
    pub curve: BezierCurve<2>,
    pub interval: ParamInterval,
    pub error: f64,
}

impl Segment {
    pub fn new(curve: BezierCurve<2>, interval: ParamInterval) -> Self {
        let error = linearization_error(&curve);
        Self {
            curve,
            interval,
            error,
        }
    }

    pub fn whole(curve: &BezierCurve<2>) -> Self {
        Self::new(curve.clone(), ParamInterval::UNIT)
    }

    pub fn is_flat(&self, tolerance: f64) -> bool {
        self.error <= tolerance
    }

    pub fn bbox(&self) -> BoundingBox<2> {
        BoundingBox::from_curve(&self.curve)
    }

    pub fn chord(&self) -> (Point2, Point2) {
        (self.curve.start(), self.curve.end())
    }

    pub fn split(&self) -> (Self, Self) {
        let (left, right) = self.curve.subdivide();
        let (left_interval, right_interval) = self.interval.halves();
        (
            Self::new(left, left_interval),
            Self::new(right, right_interval),
        )
    }
}

/// Two segments whose intersection is still undecided.
#[derive(Debug, Clone)]
pub(crate) struct CandidatePair {
    pub first: Segment,
    pub second: Segment,
}

impl CandidatePair {
    pub fn new(first: Segment, second: Segment) -> Self {
        Self { first, second }
    }

    pub fn region(&self) -> ParamRegion {
        ParamRegion::new(self.first.interval, self.second.interval)
    }

    /// Subdivides every segment that is not yet flat and pairs up the pieces.
    ///
    /// The pieces of the segment with the wider interval vary slowest, so
    /// siblings stay adjacent in the next round.
    pub fn split(self, tolerance: f64) -> Vec<Self> {
        let pieces = |segment: Segment| {
            if segment.is_flat(tolerance) {
                vec![segment]
            } else {
                let (left, right) = segment.split();
                vec![left, right]
            }
        };

        let first_wider = self.first.interval.width() >= self.second.interval.width();
        let firsts = pieces(self.first);
        let seconds = pieces(self.second);

        let mut pairs = Vec::with_capacity(firsts.len() * seconds.len());
        if first_wider {
            for a in &firsts {
                for b in &seconds {
                    pairs.push(Self::new(a.clone(), b.clone()));
                }
            }
        } else {
            for b in &seconds {
                for a in &firsts {
                    pairs.push(Self::new(a.clone(), b.clone()));
                }
            }
        }
        pairs
    }
}
