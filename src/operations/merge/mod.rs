mod grid;
mod trace;

use tracing::{debug, warn};

use crate::error::{GeometryError, Result};
use crate::geometry::Rect;
use crate::math::polygon_2d::{remove_collinear, rotate_to_canonical_start, signed_area_2d};
use crate::math::Point2;

use grid::Grid;

/// Outline produced by [`MergeRectangles`].
///
/// Vertices run clockwise on screen starting from the topmost-leftmost
/// corner, with no three consecutive points collinear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedPolygon {
    pub vertices: Vec<Point2>,
}

impl MergedPolygon {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Enclosed area (always non-negative).
    #[must_use]
    pub fn area(&self) -> f64 {
        signed_area_2d(&self.vertices).abs()
    }
}

/// Merges axis-aligned rectangles into outline polygons.
///
/// Every rectangle side is cut at all X/Y coordinates of the input; sides
/// that two rectangles have in common cancel out and the rest form the
/// outline. This is exact for rectangles that tile a region edge to edge.
/// Overlapping rectangles are not a tiling: they may leave inner loops, and
/// identical ones cancel out entirely. The merge warns when it sees overlap.
pub struct MergeRectangles {
    rects: Vec<Rect>,
}

impl MergeRectangles {
    /// Creates a new merge operation.
    #[must_use]
    pub fn new(rects: Vec<Rect>) -> Self {
        Self { rects }
    }

    /// Executes the merge and returns the main outline.
    ///
    /// If the rectangles form several separate regions, the largest one is
    /// returned; see [`MergeRectangles::execute_all`] for all of them.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` if any coordinate is NaN or
    /// infinite.
    pub fn execute(&self) -> Result<MergedPolygon> {
        let mut outlines = self.execute_all()?;
        if outlines.len() > 1 {
            debug!(regions = outlines.len(), "merge produced several outlines, keeping the largest");
        }
        if outlines.is_empty() {
            return Ok(MergedPolygon::default());
        }
        let mut best = 0;
        for (i, poly) in outlines.iter().enumerate().skip(1) {
            if poly.area() > outlines[best].area() {
                best = i;
            }
        }
        Ok(outlines.swap_remove(best))
    }

    /// Executes the merge and returns every traced outline, ordered by their
    /// topmost-leftmost vertex.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` if any coordinate is NaN or
    /// infinite.
    pub fn execute_all(&self) -> Result<Vec<MergedPolygon>> {
        if !self.rects.iter().all(Rect::is_finite) {
            return Err(GeometryError::NonFinite("rectangle").into());
        }

        let rects: Vec<Rect> = self
            .rects
            .iter()
            .filter(|r| !r.is_degenerate())
            .copied()
            .collect();

        match rects.as_slice() {
            [] => return Ok(Vec::new()),
            [only] => {
                return Ok(vec![MergedPolygon {
                    vertices: only.corners().to_vec(),
                }])
            }
            _ => {}
        }

        let overlapping = rects
            .iter()
            .enumerate()
            .map(|(i, a)| rects[i + 1..].iter().filter(|b| a.overlaps(b)).count())
            .sum::<usize>();
        if overlapping > 0 {
            warn!(pairs = overlapping, "rectangles overlap; shared area cancels out of the outline");
        }

        let grid = Grid::new(&rects);
        let edges = grid::boundary_edges(&grid, &rects);
        let outlines: Vec<MergedPolygon> = trace::trace_loops(&edges)
            .into_iter()
            .map(|ring| {
                let pts: Vec<Point2> = ring.into_iter().map(|gp| grid.point(gp)).collect();
                MergedPolygon {
                    vertices: rotate_to_canonical_start(&remove_collinear(&pts)),
                }
            })
            .filter(|p| p.len() >= 3)
            .collect();

        debug!(
            rectangles = rects.len(),
            boundary_edges = edges.len(),
            outlines = outlines.len(),
            "rectangles merged"
        );
        Ok(outlines)
    }
}

/// Merges rectangles into their main outline.
///
/// # Errors
///
/// Returns `GeometryError::NonFinite` if any coordinate is NaN or infinite.
pub fn merge_rectangles(rects: &[Rect]) -> Result<MergedPolygon> {
    MergeRectangles::new(rects.to_vec()).execute()
}
