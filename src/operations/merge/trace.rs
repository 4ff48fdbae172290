use std::collections::BTreeMap;

use super::grid::GridPoint;

/// Compass heading of an axis-aligned grid step, in screen-clockwise order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    East,
    South,
    West,
    North,
}

impl Heading {
    fn of(from: GridPoint, to: GridPoint) -> Self {
        if to.0 > from.0 {
            Self::East
        } else if to.0 < from.0 {
            Self::West
        } else if to.1 > from.1 {
            Self::South
        } else {
            Self::North
        }
    }

    fn rank(self) -> u8 {
        match self {
            Self::East => 0,
            Self::South => 1,
            Self::West => 2,
            Self::North => 3,
        }
    }

    /// Preference when leaving a vertex: right turn, straight, left turn,
    /// reversal. Lower is better.
    fn turn_cost(self, next: Self) -> u8 {
        (self.rank() + 5 - next.rank()) % 4
    }
}

/// Chains directed boundary edges into closed loops.
///
/// Loops are started from the unused edge whose start is topmost, then
/// leftmost. Where several edges leave a vertex (rectangles touching only at
/// a corner) the tightest right turn is taken, which keeps each loop simple.
/// Chains that fail to close are dropped.
pub(super) fn trace_loops(edges: &[(GridPoint, GridPoint)]) -> Vec<Vec<GridPoint>> {
    // start point -> list of edge indices leaving it.
    let mut adjacency: BTreeMap<GridPoint, Vec<usize>> = BTreeMap::new();
    for (idx, &(s, _)) in edges.iter().enumerate() {
        adjacency.entry(s).or_default().push(idx);
    }

    let mut used = vec![false; edges.len()];
    let mut loops = Vec::new();

    while let Some(start_idx) = find_start_edge(edges, &used) {
        if let Some(ring) = trace_one_loop(start_idx, edges, &adjacency, &mut used) {
            loops.push(ring);
        }
    }
    loops
}

/// Finds the next unused edge starting from the point with lowest y (then x).
fn find_start_edge(edges: &[(GridPoint, GridPoint)], used: &[bool]) -> Option<usize> {
    edges
        .iter()
        .enumerate()
        .filter(|&(i, _)| !used[i])
        .min_by_key(|&(_, &((x, y), _))| (y, x))
        .map(|(i, _)| i)
}

/// Walks one loop from `start_idx`, returning its vertices if it closes.
fn trace_one_loop(
    start_idx: usize,
    edges: &[(GridPoint, GridPoint)],
    adjacency: &BTreeMap<GridPoint, Vec<usize>>,
    used: &mut [bool],
) -> Option<Vec<GridPoint>> {
    let origin = edges[start_idx].0;
    let mut ring = Vec::new();
    let mut current = start_idx;

    loop {
        used[current] = true;
        let (s, e) = edges[current];
        ring.push(s);
        if e == origin {
            return Some(ring);
        }
        current = pick_next_edge(e, Heading::of(s, e), edges, adjacency, used)?;
    }
}

/// Picks the unused edge leaving `node` with the lowest turn cost.
fn pick_next_edge(
    node: GridPoint,
    incoming: Heading,
    edges: &[(GridPoint, GridPoint)],
    adjacency: &BTreeMap<GridPoint, Vec<usize>>,
    used: &[bool],
) -> Option<usize> {
    adjacency
        .get(&node)?
        .iter()
        .copied()
        .filter(|&i| !used[i])
        .min_by_key(|&i| incoming.turn_cost(Heading::of(edges[i].0, edges[i].1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_costs() {
        assert_eq!(Heading::South.turn_cost(Heading::West), 0);
        assert_eq!(Heading::South.turn_cost(Heading::South), 1);
        assert_eq!(Heading::South.turn_cost(Heading::East), 2);
        assert_eq!(Heading::South.turn_cost(Heading::North), 3);
        assert_eq!(Heading::North.turn_cost(Heading::East), 0);
    }

    #[test]
    fn simple_square_trace() {
        let edges = vec![
            ((1, 0), (1, 1)),
            ((0, 0), (1, 0)),
            ((0, 1), (0, 0)),
            ((1, 1), (0, 1)),
        ];
        let loops = trace_loops(&edges);
        assert_eq!(loops, vec![vec![(0, 0), (1, 0), (1, 1), (0, 1)]]);
    }

    #[test]
    fn corner_touching_squares_stay_separate() {
        let edges = vec![
            ((0, 0), (1, 0)),
            ((1, 0), (1, 1)),
            ((1, 1), (0, 1)),
            ((0, 1), (0, 0)),
            ((1, 1), (2, 1)),
            ((2, 1), (2, 2)),
            ((2, 2), (1, 2)),
            ((1, 2), (1, 1)),
        ];
        let loops = trace_loops(&edges);
        assert_eq!(loops.len(), 2);
        assert!(loops.iter().all(|l| l.len() == 4));
    }

    #[test]
    fn open_chain_is_dropped() {
        let edges = vec![((0, 0), (1, 0)), ((1, 0), (1, 1))];
        assert!(trace_loops(&edges).is_empty());
    }
}
