//! The [`Grid`] type — every [`Cell`] keyed by plane position, with their
//! staggered adjacency.
//!
//! Cells live in an arena and are addressed by [`CellId`]. Resizing never
//! drops a cell: cells outside the new extent are deactivated and come back
//! with the same id when the grid grows again.

use std::collections::HashMap;
use std::ops::Index;

use rand::Rng;

use crate::cell::{Cell, CellId, CellKind};
use crate::events::Event;
use crate::geom::{LogicalPos, Point};
use crate::neighbour::NeighbourData;

// ---------------------------------------------------------------------------
// GridConfig
// ---------------------------------------------------------------------------

/// Configuration for creating a [`Grid`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    pub neighbours: NeighbourData,
    /// Probability in `[0, 1]` that a generated cell is walkable.
    pub walkable_chance: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            neighbours: NeighbourData::default(),
            walkable_chance: 0.75,
        }
    }
}

impl GridConfig {
    /// Set the neighbour offsets (builder).
    ///
    /// Offsets that fail [`NeighbourData::is_valid`] are ignored.
    pub fn with_neighbours(mut self, neighbours: NeighbourData) -> Self {
        if neighbours.is_valid() {
            self.neighbours = neighbours;
        } else {
            log::warn!("ignoring invalid neighbour offsets {neighbours:?}");
        }
        self
    }

    /// Set the walkable probability (builder). Clamped to `[0, 1]`.
    pub fn with_walkable_chance(mut self, chance: f64) -> Self {
        self.walkable_chance = chance.clamp(0.0, 1.0);
        self
    }
}

/// Which end of the path a point assignment targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointRole {
    Start,
    End,
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A staggered-column grid of cells.
#[derive(Clone, Debug)]
pub struct Grid {
    config: GridConfig,
    cells: Vec<Cell>,
    index: HashMap<Point, CellId>,
    rows: i32,
    columns: i32,
    start: Option<CellId>,
    end: Option<CellId>,
}

impl Grid {
    /// Create an empty grid. Call [`generate`](Self::generate) to fill it.
    ///
    /// Invalid neighbour offsets (e.g. from a deserialized config) fall back
    /// to the defaults.
    pub fn new(mut config: GridConfig) -> Self {
        if !config.neighbours.is_valid() {
            log::warn!(
                "invalid neighbour offsets {:?}, using defaults",
                config.neighbours
            );
            config.neighbours = NeighbourData::default();
        }
        config.walkable_chance = config.walkable_chance.clamp(0.0, 1.0);
        Self {
            config,
            cells: Vec::new(),
            index: HashMap::new(),
            rows: 0,
            columns: 0,
            start: None,
            end: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    #[inline]
    pub fn neighbour_data(&self) -> NeighbourData {
        self.config.neighbours
    }

    /// Change the walkable probability used by later generations.
    pub fn set_walkable_chance(&mut self, chance: f64) {
        self.config.walkable_chance = chance.clamp(0.0, 1.0);
    }

    /// Logical size as `(rows, columns)`.
    #[inline]
    pub fn size(&self) -> (i32, i32) {
        (self.rows, self.columns)
    }

    /// Number of cells ever created, active or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.0)
    }

    /// Iterator over every cell id, active or not.
    pub fn ids(&self) -> impl Iterator<Item = CellId> + use<> {
        (0..self.cells.len()).map(CellId)
    }

    /// Iterator over the ids of active cells.
    pub fn active_cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_active())
            .map(|(i, _)| CellId(i))
    }

    /// Active neighbours of `id`. Empty for an unknown id.
    pub fn neighbours(&self, id: CellId) -> impl Iterator<Item = CellId> + '_ {
        self.cells
            .get(id.0)
            .map(Cell::neighbour_ids)
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(|n| self.cells[n.0].is_active())
    }

    /// The cell at plane position `pos`, active or not.
    #[inline]
    pub fn cell_at(&self, pos: Point) -> Option<CellId> {
        self.index.get(&pos).copied()
    }

    /// The active cell nearest to a continuous world position, if the
    /// position falls on the grid.
    pub fn cell_at_world(&self, x: f32, y: f32) -> Option<CellId> {
        let pos = self.config.neighbours.snap(x, y);
        self.cell_at(pos).filter(|id| self.cells[id.0].is_active())
    }

    /// Logical (row, column) of a cell.
    pub fn grid_size_of(&self, id: CellId) -> Option<LogicalPos> {
        let cell = self.cells.get(id.0)?;
        Some(self.config.neighbours.to_logical(cell.pos()))
    }

    /// Current source cell.
    #[inline]
    pub fn start(&self) -> Option<CellId> {
        self.start
    }

    /// Current target cell.
    #[inline]
    pub fn end(&self) -> Option<CellId> {
        self.end
    }

    /// Centre of the plane extent covered by the active grid.
    pub fn plane_center(&self) -> (f32, f32) {
        let last_column = (self.columns - 1).max(0);
        let last_row = (self.rows - 1).max(0);
        let last = self.config.neighbours.to_plane(last_column, last_row);
        (last.x as f32 / 2.0, last.y as f32 / 2.0)
    }

    // -----------------------------------------------------------------------
    // Generation
    // -----------------------------------------------------------------------

    /// Resize the grid to `rows` × `columns` and re-roll every cell.
    ///
    /// Any source/target is cleared first. Cells outside the new extent are
    /// deactivated, existing cells inside it are reactivated and
    /// reclassified, and only positions that never had a cell get a new one,
    /// linked to every existing cell one offset away.
    pub fn generate(&mut self, rows: i32, columns: i32, rng: &mut impl Rng) -> Event {
        let rows = rows.max(0);
        let columns = columns.max(0);
        self.clear_points();

        let nd = self.config.neighbours;
        let (mut created, mut reused, mut deactivated) = (0usize, 0usize, 0usize);

        for column in 0..columns.max(self.columns) {
            for row in 0..rows.max(self.rows) {
                let pos = nd.to_plane(column, row);
                let existing = self.cell_at(pos);

                if column >= columns || row >= rows {
                    // Slots outside both extents never had a cell.
                    if let Some(id) = existing {
                        self.cells[id.0].deactivate();
                        deactivated += 1;
                    }
                    continue;
                }

                let walkable = rng.random::<f64>() < self.config.walkable_chance;
                match existing {
                    Some(id) => {
                        self.cells[id.0].setup(walkable);
                        reused += 1;
                    }
                    None => {
                        let id = CellId(self.cells.len());
                        self.cells.push(Cell::new(pos, walkable));
                        self.index.insert(pos, id);
                        self.link(id);
                        created += 1;
                    }
                }
            }
        }

        self.rows = rows;
        self.columns = columns;
        log::debug!(
            "generated {rows}x{columns} grid: {created} created, {reused} reused, {deactivated} deactivated"
        );

        Event::GridGenerated { rows, columns }
    }

    /// Link `id` with every existing cell one offset away, both ways.
    fn link(&mut self, id: CellId) {
        let pos = self.cells[id.0].pos();
        for offset in self.config.neighbours.offsets() {
            let Some(n) = self.cell_at(pos + offset) else {
                continue;
            };
            if n == id {
                continue;
            }
            self.cells[id.0].add_neighbour(n);
            self.cells[n.0].add_neighbour(id);
        }
    }

    /// Switch to new neighbour offsets.
    ///
    /// Every cell keeps its id and logical coordinates but moves to its new
    /// plane position; adjacency is rebuilt from scratch. Returns `false`
    /// and changes nothing if `neighbours` is not valid.
    pub fn set_neighbour_data(&mut self, neighbours: NeighbourData) -> bool {
        if !neighbours.is_valid() {
            log::warn!("refusing invalid neighbour offsets {neighbours:?}");
            return false;
        }
        let old = self.config.neighbours;
        self.config.neighbours = neighbours;
        self.index.clear();

        for (i, cell) in self.cells.iter_mut().enumerate() {
            let l = old.to_logical(cell.pos());
            let pos = neighbours.to_plane(l.column, l.row);
            cell.set_pos(pos);
            cell.clear_neighbours();
            self.index.insert(pos, CellId(i));
        }
        for id in self.ids() {
            self.link(id);
        }
        log::debug!("re-keyed {} cells for {:?}", self.cells.len(), neighbours);
        true
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Make a single cell walkable or blocked.
    ///
    /// Refused (returns `false`) for inactive cells and for the current
    /// source/target.
    pub fn set_walkable(&mut self, id: CellId, walkable: bool) -> bool {
        let Some(cell) = self.cells.get_mut(id.0) else {
            return false;
        };
        if !cell.is_active() || cell.is_point_role() {
            return false;
        }
        cell.classify(if walkable {
            CellKind::Walkable
        } else {
            CellKind::NonWalkable
        })
    }

    /// Make `id` the source. See [`assign_point`](Self::assign_point).
    pub fn set_start_point(&mut self, id: CellId) -> Option<Event> {
        self.assign_point(id, PointRole::Start)
    }

    /// Make `id` the target. See [`assign_point`](Self::assign_point).
    pub fn set_end_point(&mut self, id: CellId) -> Option<Event> {
        self.assign_point(id, PointRole::End)
    }

    /// Move the source or target to `id`.
    ///
    /// A cell that already holds either role, or is not walkable, is
    /// ignored and `None` is returned. Otherwise the previous holder of the
    /// role is cleared and [`Event::PointsChanged`] is returned.
    pub fn assign_point(&mut self, id: CellId, role: PointRole) -> Option<Event> {
        let cell = self.cells.get(id.0)?;
        if cell.is_point_role() || !cell.is_walkable() {
            log::trace!("ignored {role:?} point at {}", cell.pos());
            return None;
        }

        let slot = match role {
            PointRole::Start => &mut self.start,
            PointRole::End => &mut self.end,
        };
        if let Some(prev) = slot.replace(id) {
            self.cells[prev.0].clear_point_role();
        }
        let cell = &mut self.cells[id.0];
        match role {
            PointRole::Start => cell.set_source(),
            PointRole::End => cell.set_target(),
        };
        log::trace!("{role:?} point set to {}", cell.pos());

        Some(Event::PointsChanged {
            source: self.start,
            target: self.end,
        })
    }

    fn clear_points(&mut self) {
        for id in [self.start.take(), self.end.take()].into_iter().flatten() {
            self.cells[id.0].clear_point_role();
        }
    }

    // -----------------------------------------------------------------------
    // Search scratch
    // -----------------------------------------------------------------------

    /// Reset the search scratch of every cell.
    pub fn clear_search_state(&mut self) {
        for cell in &mut self.cells {
            cell.reset_search();
        }
    }

    /// Record a search step on `id`. See [`Cell::set_search`].
    #[inline]
    pub fn set_search(&mut self, id: CellId, g: i32, h: i32, parent: Option<CellId>) {
        self.cells[id.0].set_search(g, h, parent);
    }
}

impl Index<CellId> for Grid {
    type Output = Cell;

    #[inline]
    fn index(&self, id: CellId) -> &Cell {
        &self.cells[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn open_grid(rows: i32, columns: i32) -> Grid {
        let mut g = Grid::new(GridConfig::default().with_walkable_chance(1.0));
        g.generate(rows, columns, &mut rand::rng());
        g
    }

    fn assert_adjacency(grid: &Grid) {
        let offsets = grid.neighbour_data().offsets();
        for a in grid.active_cells() {
            let na: Vec<CellId> = grid.neighbours(a).collect();
            for &b in &na {
                assert!(grid[b].is_active());
                assert!(grid.neighbours(b).any(|x| x == a), "{a:?} -> {b:?} not symmetric");
            }
            for o in offsets {
                if let Some(b) = grid.cell_at(grid[a].pos() + o) {
                    if grid[b].is_active() {
                        assert!(na.contains(&b), "{a:?} missing neighbour {b:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn generate_fills_extent() {
        let mut g = Grid::new(GridConfig::default().with_walkable_chance(1.0));
        let ev = g.generate(4, 3, &mut rand::rng());
        assert_eq!(ev, Event::GridGenerated { rows: 4, columns: 3 });
        assert_eq!(g.size(), (4, 3));
        assert_eq!(g.len(), 12);
        assert!(g.active_cells().all(|id| g[id].is_walkable()));
        for column in 0..3 {
            for row in 0..4 {
                let id = g.cell_at(g.neighbour_data().to_plane(column, row)).unwrap();
                assert_eq!(g.grid_size_of(id), Some(LogicalPos::new(row, column)));
            }
        }
    }

    #[test]
    fn zero_chance_blocks_everything() {
        let mut g = Grid::new(GridConfig::default().with_walkable_chance(0.0));
        g.generate(3, 3, &mut rand::rng());
        assert!(g.active_cells().all(|id| !g[id].is_walkable()));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let config = GridConfig::default().with_walkable_chance(0.5);
        let mut a = Grid::new(config);
        let mut b = Grid::new(config);
        a.generate(6, 6, &mut StdRng::seed_from_u64(7));
        b.generate(6, 6, &mut StdRng::seed_from_u64(7));
        let kinds = |g: &Grid| g.ids().map(|id| g[id].kind()).collect::<Vec<_>>();
        assert_eq!(kinds(&a), kinds(&b));
    }

    #[test]
    fn neighbour_counts() {
        let g = open_grid(3, 3);
        let nd = g.neighbour_data();
        let centre = g.cell_at(nd.to_plane(1, 1)).unwrap();
        assert_eq!(g.neighbours(centre).count(), 6);
        let corner = g.cell_at(nd.to_plane(0, 0)).unwrap();
        let mut got: Vec<Point> = g.neighbours(corner).map(|n| g[n].pos()).collect();
        got.sort_by_key(|p| (p.x, p.y));
        assert_eq!(got, vec![Point::new(0, 2), Point::new(1, 1)]);
    }

    #[test]
    fn adjacency_symmetric_and_complete() {
        assert_adjacency(&open_grid(5, 7));
        let wide = NeighbourData::new(4, Point::new(3, 2));
        let mut g = Grid::new(GridConfig::default().with_neighbours(wide));
        g.generate(6, 4, &mut StdRng::seed_from_u64(1));
        assert_adjacency(&g);
    }

    #[test]
    fn shrink_then_grow_reuses_cells() {
        let mut g = open_grid(5, 5);
        let before: Vec<(CellId, Point)> = g.ids().map(|id| (id, g[id].pos())).collect();

        g.generate(3, 3, &mut rand::rng());
        assert_eq!(g.len(), 25);
        assert_eq!(g.active_cells().count(), 9);
        for id in g.ids() {
            let l = g.grid_size_of(id).unwrap();
            assert_eq!(g[id].is_active(), l.row < 3 && l.column < 3);
        }
        assert_adjacency(&g);

        g.generate(5, 5, &mut rand::rng());
        assert_eq!(g.len(), 25);
        assert_eq!(g.active_cells().count(), 25);
        let after: Vec<(CellId, Point)> = g.ids().map(|id| (id, g[id].pos())).collect();
        assert_eq!(before, after);
        assert_adjacency(&g);
    }

    #[test]
    fn reshaping_skips_missing_slots() {
        let mut g = open_grid(5, 2);
        // Fewer rows but more columns: slots at columns 2.. and rows 2..5
        // never existed.
        g.generate(2, 5, &mut rand::rng());
        assert_eq!(g.active_cells().count(), 10);
        assert_eq!(g.len(), 10 + 6);
        assert_adjacency(&g);
    }

    #[test]
    fn inactive_cells_are_not_walkable_or_found() {
        let mut g = open_grid(4, 4);
        let nd = g.neighbour_data();
        let far = g.cell_at(nd.to_plane(3, 3)).unwrap();
        g.generate(2, 2, &mut rand::rng());
        assert!(!g[far].is_walkable());
        let p = g[far].pos();
        assert_eq!(g.cell_at_world(p.x as f32, p.y as f32), None);
        assert!(g.set_start_point(far).is_none());
    }

    #[test]
    fn start_and_end_assignment() {
        let mut g = open_grid(3, 3);
        let a = CellId(0);
        let b = CellId(4);
        let c = CellId(8);

        assert_eq!(
            g.set_start_point(a),
            Some(Event::PointsChanged {
                source: Some(a),
                target: None
            })
        );
        assert_eq!(g[a].kind(), CellKind::Source);

        // Same cell cannot also be the target.
        assert_eq!(g.set_end_point(a), None);
        assert_eq!(g[a].kind(), CellKind::Source);
        assert_eq!(g.end(), None);

        assert_eq!(
            g.set_end_point(b),
            Some(Event::PointsChanged {
                source: Some(a),
                target: Some(b)
            })
        );

        // Moving the start clears the old one.
        g.set_start_point(c).unwrap();
        assert_eq!(g[a].kind(), CellKind::Walkable);
        assert_eq!(g[c].kind(), CellKind::Source);
        assert_eq!(g.start(), Some(c));
        assert_eq!(g.end(), Some(b));

        // Re-selecting the current start is ignored too.
        assert_eq!(g.set_start_point(c), None);
    }

    #[test]
    fn blocked_cells_cannot_be_points() {
        let mut g = open_grid(3, 3);
        let id = CellId(2);
        assert!(g.set_walkable(id, false));
        assert_eq!(g.set_start_point(id), None);
        assert_eq!(g.set_end_point(id), None);
        assert_eq!(g.assign_point(CellId(999), PointRole::Start), None);
    }

    #[test]
    fn point_cells_cannot_be_blocked() {
        let mut g = open_grid(3, 3);
        g.set_start_point(CellId(1)).unwrap();
        assert!(!g.set_walkable(CellId(1), false));
        assert_eq!(g[CellId(1)].kind(), CellKind::Source);
    }

    #[test]
    fn generate_clears_points() {
        let mut g = open_grid(3, 3);
        g.set_start_point(CellId(0)).unwrap();
        g.set_end_point(CellId(1)).unwrap();
        g.generate(3, 3, &mut rand::rng());
        assert_eq!((g.start(), g.end()), (None, None));
        assert!(g.active_cells().all(|id| !g[id].is_point_role()));
    }

    #[test]
    fn world_lookup() {
        let g = open_grid(3, 3);
        let id = g.cell_at_world(0.9, 3.2).unwrap();
        assert_eq!(g[id].pos(), Point::new(1, 3));
        assert_eq!(g.grid_size_of(id), Some(LogicalPos::new(1, 1)));
        assert_eq!(g.cell_at_world(-5.0, 0.0), None);
    }

    #[test]
    fn plane_center_of_extent() {
        let g = open_grid(3, 4);
        // Last cell: column 3 (lifted by 1), row 2 -> (3, 5).
        assert_eq!(g.plane_center(), (1.5, 2.5));
        assert_eq!(Grid::new(GridConfig::default()).plane_center(), (0.0, 0.0));
    }

    #[test]
    fn changing_offsets_rekeys_cells() {
        let mut g = open_grid(4, 4);
        let logical: Vec<LogicalPos> = g.ids().map(|id| g.grid_size_of(id).unwrap()).collect();

        let wide = NeighbourData::new(4, Point::new(3, 2));
        assert!(g.set_neighbour_data(wide));
        assert_eq!(g.neighbour_data(), wide);
        for (id, l) in g.ids().zip(logical) {
            assert_eq!(g[id].pos(), wide.to_plane(l.column, l.row));
            assert_eq!(g.grid_size_of(id), Some(l));
            assert_eq!(g.cell_at(g[id].pos()), Some(id));
        }
        assert_adjacency(&g);
    }

    #[test]
    fn invalid_offsets_refused() {
        let flat = NeighbourData::new(0, Point::new(1, 1));
        let c = GridConfig::default().with_neighbours(flat);
        assert_eq!(c.neighbours, NeighbourData::default());

        let mut g = open_grid(3, 3);
        let before: Vec<Point> = g.ids().map(|id| g[id].pos()).collect();
        assert!(!g.set_neighbour_data(NeighbourData::new(2, Point::new(0, 1))));
        assert_eq!(g.neighbour_data(), NeighbourData::default());
        assert!(g.ids().map(|id| g[id].pos()).eq(before));

        // Built directly, bypassing the builder.
        let raw = GridConfig {
            neighbours: flat,
            walkable_chance: 0.5,
        };
        assert_eq!(Grid::new(raw).neighbour_data(), NeighbourData::default());
    }

    #[test]
    fn unknown_id_has_no_neighbours() {
        let g = open_grid(2, 2);
        assert_eq!(g.neighbours(CellId(g.len())).count(), 0);
        assert_eq!(Grid::new(GridConfig::default()).neighbours(CellId(0)).count(), 0);
    }

    #[test]
    fn search_scratch_reset() {
        let mut g = open_grid(2, 2);
        g.set_search(CellId(1), 2, 3, Some(CellId(0)));
        assert_eq!(g[CellId(1)].search().f, 5);
        g.clear_search_state();
        g.clear_search_state();
        assert!(g.ids().all(|id| *g[id].search() == Default::default()));
    }

    #[test]
    fn config_builders_clamp() {
        let c = GridConfig::default().with_walkable_chance(3.0);
        assert_eq!(c.walkable_chance, 1.0);
        let mut g = Grid::new(c);
        g.set_walkable_chance(-1.0);
        assert_eq!(g.config().walkable_chance, 0.0);
    }
}
