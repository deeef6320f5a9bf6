use brickgrid_core::{CellId, Grid, NeighbourData, Point};

use crate::distance::staggered;

/// A shortest-path search over a [`Grid`]'s cell graph.
///
/// Implementations write their per-search state into the cells' scratch
/// records, so a grid supports one search at a time.
pub trait Pathfinder {
    /// Path from `source` to `target`, both included, or an empty `Vec` if
    /// the target is unreachable.
    fn find_path(&mut self, grid: &mut Grid, source: CellId, target: CellId) -> Vec<CellId>;

    /// Reset every cell's search scratch.
    fn clear_search_state(&mut self, grid: &mut Grid) {
        grid.clear_search_state();
    }
}

/// Heuristic estimate of the hop count between two plane positions.
pub trait Estimator {
    /// Must never overestimate the true hop count (admissible).
    fn estimate(&self, from: Point, to: Point) -> i32;
}

impl Estimator for NeighbourData {
    #[inline]
    fn estimate(&self, from: Point, to: Point) -> i32 {
        staggered(self, from, to)
    }
}
