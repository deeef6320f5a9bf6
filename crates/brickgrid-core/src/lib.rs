//! **brickgrid-core** — staggered-column grid topology.
//!
//! This crate provides the grid model the *brickgrid* path planner searches:
//! plane/logical geometry for the "brick wall" layout, cells with their
//! classification and search scratch, incremental grid generation, and the
//! notifications raised for presentation collaborators.

pub mod cell;
pub mod events;
pub mod geom;
pub mod grid;
pub mod neighbour;

pub use cell::{Cell, CellId, CellKind, SearchData, UNREACHED};
pub use events::Event;
pub use geom::{LogicalPos, Point};
pub use grid::{Grid, GridConfig, PointRole};
pub use neighbour::NeighbourData;
