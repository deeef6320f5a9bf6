use std::collections::BinaryHeap;

use brickgrid_core::{CellId, Grid};

use crate::traits::{Estimator, Pathfinder};

/// Reference into the open set, ordered for use in `BinaryHeap`.
///
/// Lowest `f` pops first; ties go to the lower `h`, then to the entry
/// pushed earliest.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct NodeRef {
    id: CellId,
    f: i32,
    h: i32,
    seq: u64,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A* search over a [`Grid`] with unit edge costs.
///
/// `g`, `h`, `f` and parents live in the cells' scratch records. `AStar`
/// itself only keeps the open/closed bookkeeping, which it reuses across
/// searches.
#[derive(Debug, Default)]
pub struct AStar {
    limit: Option<usize>,
    open: BinaryHeap<NodeRef>,
    in_open: Vec<bool>,
    closed: Vec<bool>,
    seq: u64,
    expanded: usize,
    // scratch buffer for neighbour queries
    nbuf: Vec<CellId>,
}

impl AStar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give up after expanding `limit` cells.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Number of cells expanded by the last search.
    #[inline]
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Search with an explicit heuristic.
    ///
    /// Returns the path from `source` to `target` inclusive, or an empty
    /// `Vec` when the target cannot be reached. The caller guarantees both
    /// cells are walkable, which [`Grid`] point assignment already enforces.
    pub fn find_path_with<E: Estimator>(
        &mut self,
        grid: &mut Grid,
        source: CellId,
        target: CellId,
        estimator: &E,
    ) -> Vec<CellId> {
        grid.clear_search_state();
        let (Some(src), Some(dst)) = (grid.cell(source), grid.cell(target)) else {
            return Vec::new();
        };
        let target_pos = dst.pos();
        let h = estimator.estimate(src.pos(), target_pos);
        self.reset(grid.len());

        grid.set_search(source, 0, h, None);
        self.push(source, h, h);

        let mut nbuf = std::mem::take(&mut self.nbuf);

        let found = 'search: loop {
            let Some(current) = self.open.pop() else {
                break 'search false;
            };
            let ci = current.id;

            // Skip entries superseded by a cheaper push.
            if !self.in_open[ci.index()] || current.f != grid[ci].search().f {
                continue;
            }

            if ci == target {
                break 'search true;
            }

            if self.limit.is_some_and(|limit| self.expanded >= limit) {
                log::warn!("search gave up after expanding {} cells", self.expanded);
                break 'search false;
            }

            self.in_open[ci.index()] = false;
            self.closed[ci.index()] = true;
            self.expanded += 1;

            let g = grid[ci].search().g + 1;
            nbuf.clear();
            nbuf.extend(grid.neighbours(ci));

            for &ni in nbuf.iter() {
                let n = &grid[ni];
                if !n.is_walkable() || self.closed[ni.index()] {
                    continue;
                }
                if g >= n.search().g {
                    continue;
                }
                let h = estimator.estimate(n.pos(), target_pos);
                grid.set_search(ni, g, h, Some(ci));
                self.push(ni, g + h, h);
            }
        };

        self.nbuf = nbuf;

        if !found {
            log::debug!(
                "no path from {:?} to {:?} ({} cells expanded)",
                source,
                target,
                self.expanded
            );
            return Vec::new();
        }

        let path = reconstruct(grid, target);
        log::debug!(
            "path from {:?} to {:?}: {} cells, {} expanded",
            source,
            target,
            path.len(),
            self.expanded
        );
        path
    }

    fn reset(&mut self, len: usize) {
        self.open.clear();
        self.in_open.clear();
        self.in_open.resize(len, false);
        self.closed.clear();
        self.closed.resize(len, false);
        self.seq = 0;
        self.expanded = 0;
    }

    fn push(&mut self, id: CellId, f: i32, h: i32) {
        self.in_open[id.index()] = true;
        self.open.push(NodeRef {
            id,
            f,
            h,
            seq: self.seq,
        });
        self.seq += 1;
    }
}

impl Pathfinder for AStar {
    fn find_path(&mut self, grid: &mut Grid, source: CellId, target: CellId) -> Vec<CellId> {
        let nd = grid.neighbour_data();
        self.find_path_with(grid, source, target, &nd)
    }

    fn clear_search_state(&mut self, grid: &mut Grid) {
        grid.clear_search_state();
        self.open.clear();
        self.expanded = 0;
    }
}

/// Follow parents back from `target` and return the path source-first.
///
/// A parent chain longer than the grid means the scratch is corrupt.
fn reconstruct(grid: &Grid, target: CellId) -> Vec<CellId> {
    let mut path = Vec::new();
    let mut cur = Some(target);
    while let Some(id) = cur {
        if path.len() >= grid.len() {
            log::error!("parent chain from {target:?} does not terminate");
            return Vec::new();
        }
        path.push(id);
        cur = grid[id].search().parent;
    }
    path.reverse();
    path
}
