use crate::geometry::{Rect, WallSegment};

/// Bounding-box prefilter for shape pairs.
pub(super) struct BroadPhase {
    bounds: Vec<Option<Rect>>,
}

impl BroadPhase {
    /// Builds one box per shape from its wall endpoints, grown by `margin`.
    pub(super) fn new(walls: &[Vec<WallSegment>], margin: f64) -> Self {
        let bounds = walls
            .iter()
            .map(|segs| {
                let pts: Vec<_> = segs.iter().flat_map(|s| [s.start, s.end]).collect();
                Rect::from_points(&pts).map(|r| r.expanded(margin))
            })
            .collect();
        Self { bounds }
    }

    /// Returns `false` only if shapes `i` and `j` cannot share a wall.
    pub(super) fn may_touch(&self, i: usize, j: usize) -> bool {
        match (&self.bounds[i], &self.bounds[j]) {
            (Some(a), Some(b)) => a.touches(b),
            _ => false,
        }
    }
}
