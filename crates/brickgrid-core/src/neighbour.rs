//! Staggered-column ("brick wall") geometry.
//!
//! Columns are laid out `diagonal_offset.x` apart on the plane. Every odd
//! column is lifted by `diagonal_offset.y`, and cells within a column are
//! `vertical_offset` apart. Each cell therefore touches six others: the two
//! above and below it in its own column, and two in each adjacent column.

use crate::geom::{LogicalPos, Point};

/// Offsets describing the six neighbour directions of the layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeighbourData {
    /// Distance between two cells of the same column.
    pub vertical_offset: i32,
    /// Step to the upper-right neighbour. The other diagonal steps mirror it.
    pub diagonal_offset: Point,
}

impl Default for NeighbourData {
    fn default() -> Self {
        Self {
            vertical_offset: 2,
            diagonal_offset: Point::new(1, 1),
        }
    }
}

impl NeighbourData {
    /// Create neighbour data from a vertical step and a diagonal step.
    ///
    /// All components must be strictly positive (see
    /// [`is_valid`](Self::is_valid)). Diagonal steps only land on other cells
    /// when `diagonal_offset.y * 2 == vertical_offset`.
    pub const fn new(vertical_offset: i32, diagonal_offset: Point) -> Self {
        Self {
            vertical_offset,
            diagonal_offset,
        }
    }

    /// Whether every component is strictly positive.
    ///
    /// The geometry divides by `vertical_offset` and `diagonal_offset.x`;
    /// [`Grid`](crate::Grid) refuses offsets that fail this check.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.vertical_offset > 0 && self.diagonal_offset.x > 0 && self.diagonal_offset.y > 0
    }

    /// The six direction vectors: up, down, then the four diagonals.
    pub fn offsets(&self) -> [Point; 6] {
        let v = self.vertical_offset;
        let d = self.diagonal_offset;
        [
            Point::new(0, v),
            Point::new(0, -v),
            Point::new(d.x, d.y),
            Point::new(d.x, -d.y),
            Point::new(-d.x, d.y),
            Point::new(-d.x, -d.y),
        ]
    }

    /// Vertical lift applied to every cell of logical column `column`.
    #[inline]
    pub fn column_lift(&self, column: i32) -> i32 {
        if column % 2 == 0 { 0 } else { self.diagonal_offset.y }
    }

    /// Map a logical (column, row) to its plane position.
    #[inline]
    pub fn to_plane(&self, column: i32, row: i32) -> Point {
        Point::new(
            column * self.diagonal_offset.x,
            self.column_lift(column) + row * self.vertical_offset,
        )
    }

    /// Map a plane position back to its logical (row, column).
    ///
    /// Exact inverse of [`to_plane`](Self::to_plane) for every position it
    /// produces.
    #[inline]
    pub fn to_logical(&self, plane: Point) -> LogicalPos {
        let column = plane.x / self.diagonal_offset.x;
        let row = (plane.y - self.column_lift(column)) / self.vertical_offset;
        LogicalPos::new(row, column)
    }

    /// Snap a continuous world position (e.g. a pointer) to the plane
    /// position of the nearest cell slot.
    ///
    /// The returned point need not belong to an existing cell; look it up in
    /// the grid.
    pub fn snap(&self, x: f32, y: f32) -> Point {
        let column_size = self.diagonal_offset.x;
        let px = snap_to(x.round() as i32, column_size);
        let lift = self.column_lift(px / column_size);
        let py = snap_to((y - lift as f32).round() as i32, self.vertical_offset) + lift;
        Point::new(px, py)
    }
}

/// Round `position` to the nearest multiple of `size`.
#[inline]
fn snap_to(position: i32, size: i32) -> i32 {
    let p = position + size / 2;
    p - p % size
}
