use std::collections::BTreeMap;

use crate::geometry::Rect;
use crate::math::{Point2, TOLERANCE};

/// A vertex of the coordinate grid, as `(x index, y index)`.
pub(super) type GridPoint = (usize, usize);

/// The distinct X and Y coordinates of a rectangle set, sorted ascending.
#[derive(Debug)]
pub(super) struct Grid {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Grid {
    pub(super) fn new(rects: &[Rect]) -> Self {
        let mut xs = Vec::with_capacity(rects.len() * 2);
        let mut ys = Vec::with_capacity(rects.len() * 2);
        for r in rects {
            xs.extend([r.min_x, r.max_x]);
            ys.extend([r.min_y, r.max_y]);
        }
        Self {
            xs: sorted_distinct(xs),
            ys: sorted_distinct(ys),
        }
    }

    pub(super) fn x_index(&self, x: f64) -> Option<usize> {
        nearest_index(&self.xs, x)
    }

    pub(super) fn y_index(&self, y: f64) -> Option<usize> {
        nearest_index(&self.ys, y)
    }

    pub(super) fn point(&self, (ix, iy): GridPoint) -> Point2 {
        Point2::new(self.xs[ix], self.ys[iy])
    }
}

fn sorted_distinct(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(f64::total_cmp);
    values.dedup_by(|a, b| (*a - *b).abs() < TOLERANCE);
    values
}

fn nearest_index(values: &[f64], v: f64) -> Option<usize> {
    let i = values.partition_point(|&x| x < v - TOLERANCE);
    values.get(i).filter(|&&x| (x - v).abs() < TOLERANCE).map(|_| i)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Axis {
    Horizontal,
    Vertical,
}

/// One grid step of a rectangle side.
///
/// Horizontal: row `fixed`, from column `step` to `step + 1`.
/// Vertical: column `fixed`, from row `step` to `step + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct UnitEdge {
    axis: Axis,
    fixed: usize,
    step: usize,
}

impl UnitEdge {
    /// Endpoints in increasing coordinate order.
    fn ends(self) -> (GridPoint, GridPoint) {
        match self.axis {
            Axis::Horizontal => ((self.step, self.fixed), (self.step + 1, self.fixed)),
            Axis::Vertical => ((self.fixed, self.step), (self.fixed, self.step + 1)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Tally {
    count: usize,
    /// Orientation of the first rectangle side that emitted the edge:
    /// `true` when it runs in increasing coordinate order.
    forward: bool,
}

/// Splits every rectangle side into grid steps and keeps the steps emitted an
/// odd number of times, oriented clockwise on screen (interior on the right).
///
/// A step shared by two adjoining rectangles is emitted twice and cancels.
/// Rectangles whose corners are not on the grid are skipped.
pub(super) fn boundary_edges(grid: &Grid, rects: &[Rect]) -> Vec<(GridPoint, GridPoint)> {
    let mut tally: BTreeMap<UnitEdge, Tally> = BTreeMap::new();
    let mut emit = |axis, fixed, steps: std::ops::Range<usize>, forward| {
        for step in steps {
            tally
                .entry(UnitEdge { axis, fixed, step })
                .and_modify(|t| t.count += 1)
                .or_insert(Tally { count: 1, forward });
        }
    };

    for r in rects {
        let (Some(x0), Some(x1), Some(y0), Some(y1)) = (
            grid.x_index(r.min_x),
            grid.x_index(r.max_x),
            grid.y_index(r.min_y),
            grid.y_index(r.max_y),
        ) else {
            continue;
        };
        emit(Axis::Horizontal, y0, x0..x1, true); // top, left to right
        emit(Axis::Vertical, x1, y0..y1, true); // right, downwards
        emit(Axis::Horizontal, y1, x0..x1, false); // bottom, right to left
        emit(Axis::Vertical, x0, y0..y1, false); // left, upwards
    }

    tally
        .into_iter()
        .filter(|(_, t)| t.count % 2 == 1)
        .map(|(edge, t)| {
            let (a, b) = edge.ends();
            if t.forward {
                (a, b)
            } else {
                (b, a)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_dedups_within_tolerance() {
        let rects = [
            Rect::new(0.0, 100.0, 0.0, 50.0),
            Rect::new(100.0 + 1e-12, 200.0, 0.0, 50.0),
        ];
        let grid = Grid::new(&rects);
        assert_eq!(grid.xs, vec![0.0, 100.0, 200.0]);
        assert_eq!(grid.x_index(100.0 + 1e-12), Some(1));
        assert_eq!(grid.x_index(150.0), None);
    }

    #[test]
    fn shared_side_cancels() {
        let rects = [Rect::new(0.0, 1.0, 0.0, 1.0), Rect::new(1.0, 2.0, 0.0, 1.0)];
        let grid = Grid::new(&rects);
        let edges = boundary_edges(&grid, &rects);
        // 2 top + 2 bottom + outer left + outer right.
        assert_eq!(edges.len(), 6);
        assert!(!edges.iter().any(|&(a, b)| a.0 == 1 && b.0 == 1));
    }

    #[test]
    fn long_side_is_split_at_grid_lines() {
        // The wide rectangle's top is split where the two small ones meet.
        let rects = [
            Rect::new(0.0, 2.0, 1.0, 2.0),
            Rect::new(0.0, 1.0, 0.0, 1.0),
            Rect::new(1.0, 2.0, 0.0, 1.0),
        ];
        let grid = Grid::new(&rects);
        let edges = boundary_edges(&grid, &rects);
        assert!(!edges.iter().any(|&(a, b)| a.1 == 1 && b.1 == 1));
        assert_eq!(edges.len(), 8);
    }
}
