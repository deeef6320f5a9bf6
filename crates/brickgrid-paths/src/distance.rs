use brickgrid_core::{NeighbourData, Point};

/// Hop-count estimate between two plane positions on a staggered grid,
/// ignoring obstacles.
///
/// Each column crossed costs one diagonal step, and those steps can absorb
/// up to `diagonal_offset.y` of vertical distance each. Whatever vertical
/// distance is left takes vertical steps.
#[inline]
pub fn staggered(nd: &NeighbourData, a: Point, b: Point) -> i32 {
    let delta = (a - b).abs();
    let diagonal_steps = delta.x / nd.diagonal_offset.x;
    let reach = diagonal_steps * nd.diagonal_offset.y;
    if delta.y < reach {
        diagonal_steps
    } else {
        diagonal_steps + (delta.y - reach) / nd.vertical_offset
    }
}
