//! [`Planner`] — keeps a grid, its current path and the pathfinder together,
//! re-planning whenever the points or the cells change.
//!
//! Every notification is published on an `mpsc` channel so presentation
//! code (camera, readouts, path markers) can consume them on its own
//! schedule.

use std::sync::mpsc::Sender;

use brickgrid_core::{CellId, Event, Grid, LogicalPos, NeighbourData, PointRole};
use rand::Rng;

use crate::astar::AStar;
use crate::traits::Pathfinder;

/// Drives a [`Grid`] and a [`Pathfinder`] from user actions.
pub struct Planner<P: Pathfinder = AStar> {
    grid: Grid,
    pathfinder: P,
    path: Vec<CellId>,
    events: Sender<Event>,
}

impl<P: Pathfinder> Planner<P> {
    /// Create a planner publishing its notifications on `events`.
    pub fn new(grid: Grid, pathfinder: P, events: Sender<Event>) -> Self {
        Self {
            grid,
            pathfinder,
            path: Vec::new(),
            events,
        }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn pathfinder(&self) -> &P {
        &self.pathfinder
    }

    /// The last computed path, source first. Empty when there is none.
    #[inline]
    pub fn path(&self) -> &[CellId] {
        &self.path
    }

    /// Regenerate the grid at `rows` × `columns`.
    ///
    /// Drops the current path and both points.
    pub fn generate(&mut self, rows: i32, columns: i32, rng: &mut impl Rng) {
        self.path.clear();
        self.pathfinder.clear_search_state(&mut self.grid);
        let ev = self.grid.generate(rows, columns, rng);
        self.publish(ev);
    }

    /// Switch the grid to new neighbour offsets and re-plan.
    ///
    /// Invalid offsets are refused and nothing is published.
    pub fn set_neighbour_data(&mut self, neighbours: NeighbourData) -> bool {
        if !self.grid.set_neighbour_data(neighbours) {
            return false;
        }
        self.replan();
        true
    }

    pub fn set_start(&mut self, id: CellId) -> bool {
        self.set_point(id, PointRole::Start)
    }

    pub fn set_end(&mut self, id: CellId) -> bool {
        self.set_point(id, PointRole::End)
    }

    /// Move the start or end point to `id`.
    ///
    /// Returns `false` if the grid refused the cell. Otherwise publishes
    /// [`Event::PointsChanged`] and, once both points exist,
    /// [`Event::PathComputed`].
    pub fn set_point(&mut self, id: CellId, role: PointRole) -> bool {
        let Some(ev) = self.grid.assign_point(id, role) else {
            return false;
        };
        let ready = ev.has_both_points();
        self.publish(ev);
        if ready {
            self.replan();
        }
        true
    }

    /// Pointer selection: pick the cell under world position `(x, y)`.
    ///
    /// Positions off the grid are ignored.
    pub fn select_at(&mut self, x: f32, y: f32, role: PointRole) -> bool {
        match self.grid.cell_at_world(x, y) {
            Some(id) => self.set_point(id, role),
            None => false,
        }
    }

    /// Flip a cell between walkable and blocked, then re-plan.
    ///
    /// Points and inactive cells cannot be toggled.
    pub fn toggle_walkable(&mut self, id: CellId) -> bool {
        let Some(cell) = self.grid.cell(id) else {
            return false;
        };
        let walkable = !cell.is_walkable();
        if !self.grid.set_walkable(id, walkable) {
            return false;
        }
        self.replan();
        true
    }

    /// Logical positions of the source and target, for readouts.
    pub fn point_positions(&self) -> (Option<LogicalPos>, Option<LogicalPos>) {
        let pos = |id: Option<CellId>| id.and_then(|id| self.grid.grid_size_of(id));
        (pos(self.grid.start()), pos(self.grid.end()))
    }

    /// Search again if both points are set.
    fn replan(&mut self) {
        let (Some(source), Some(target)) = (self.grid.start(), self.grid.end()) else {
            self.path.clear();
            return;
        };
        self.path = self.pathfinder.find_path(&mut self.grid, source, target);
        // The start cell is not a move.
        let hops = self.path.len().checked_sub(1);
        self.publish(Event::PathComputed { hops });
    }

    fn publish(&self, ev: Event) {
        // No receiver just means nobody is listening.
        self.events.send(ev).ok();
    }
}
