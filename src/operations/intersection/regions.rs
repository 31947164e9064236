use crate::geometry::ParamInterval;

/// A rectangle in the `(s, t)` parameter plane of two curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRegion {
    /// Range on the first curve.
    pub s: ParamInterval,
    /// Range on the second curve.
    pub t: ParamInterval,
}

impl ParamRegion {
    /// Creates a new region.
    #[must_use]
    pub fn new(s: ParamInterval, t: ParamInterval) -> Self {
        Self { s, t }
    }

    /// Whether `(s, t)` lies in the region widened by `wiggle`.
    #[must_use]
    pub fn contains(&self, s: f64, t: f64, wiggle: f64) -> bool {
        self.s.contains(s, wiggle) && self.t.contains(t, wiggle)
    }

    /// Whether the regions overlap or share a boundary in both parameters.
    #[must_use]
    pub fn touches(&self, other: &Self) -> bool {
        self.s.touches(&other.s) && self.t.touches(&other.t)
    }

    /// Smallest region containing both.
    #[must_use]
    pub fn hull(&self, other: &Self) -> Self {
        Self::new(self.s.hull(&other.s), self.t.hull(&other.t))
    }
}

/// Union-find root lookup with path halving.
fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

/// Groups regions into connected components of the `touches` relation.
///
/// Each component is returned as a sorted list of indices into `regions`.
pub(crate) fn connected_components(regions: &[ParamRegion]) -> Vec<Vec<usize>> {
    let mut parent: Vec<usize> = (0..regions.len()).collect();

    for i in 0..regions.len() {
        for j in (i + 1)..regions.len() {
            if regions[i].touches(&regions[j]) {
                let (a, b) = (find(&mut parent, i), find(&mut parent, j));
                if a != b {
                    parent[a.max(b)] = a.min(b);
                }
            }
        }
    }

    let mut components: Vec<Vec<usize>> = Vec::new();
    let mut slot_of_root = vec![usize::MAX; regions.len()];
    for i in 0..regions.len() {
        let root = find(&mut parent, i);
        if slot_of_root[root] == usize::MAX {
            slot_of_root[root] = components.len();
            components.push(Vec::new());
        }
        components[slot_of_root[root]].push(i);
    }
    components
}

/// Replaces every connected component by its hull, sorted by `s` then `t`.
pub(crate) fn merge_regions(regions: &[ParamRegion]) -> Vec<ParamRegion> {
    let mut merged: Vec<ParamRegion> = connected_components(regions)
        .into_iter()
        .filter_map(|component| {
            component
                .iter()
                .map(|&i| regions[i])
                .reduce(|acc, r| acc.hull(&r))
        })
        .collect();
    merged.sort_by(|a, b| {
        a.s.start
            .total_cmp(&b.s.start)
            .then(a.t.start.total_cmp(&b.t.start))
    });
    merged
}

/// Total length covered by a set of intervals, counting overlaps once.
pub(crate) fn covered_length(intervals: impl Iterator<Item = ParamInterval>) -> f64 {
    let mut intervals: Vec<ParamInterval> = intervals.collect();
    intervals.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut total = 0.0;
    let mut current: Option<ParamInterval> = None;
    for interval in intervals {
        current = match current {
            Some(run) if run.touches(&interval) => Some(run.hull(&interval)),
            Some(run) => {
                total += run.width();
                Some(interval)
            }
            None => Some(interval),
        };
    }
    total + current.map_or(0.0, |run| run.width())
}
