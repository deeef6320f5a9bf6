//! A* pathfinding over staggered-column grids.
//!
//! - [`AStar`] — shortest path between two cells of a
//!   [`Grid`](brickgrid_core::Grid), unit cost per move, using the
//!   [`staggered`] heuristic.
//! - [`Planner`] — owns a grid and a pathfinder, re-plans on every point or
//!   cell change and publishes [`Event`](brickgrid_core::Event)s.
//!
//! # Trait hierarchy
//!
//! | Trait | Role |
//! |---|---|
//! | [`Pathfinder`] | Search entry points used by [`Planner`] |
//! | [`Estimator`] | Admissible hop-count heuristic used by [`AStar`] |

mod astar;
mod distance;
mod planner;
mod traits;

pub use astar::AStar;
pub use distance::staggered;
pub use planner::Planner;
pub use traits::{Estimator, Pathfinder};
