//! Notifications raised by the grid and the path planner: [`Event`].
//!
//! Producers return these as values; whoever drives them decides how to
//! deliver them (the planner in `brickgrid-paths` pushes them into an
//! `mpsc` channel).

use crate::cell::CellId;

/// A notification for presentation collaborators.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// The grid was (re)generated with the given logical size.
    GridGenerated { rows: i32, columns: i32 },
    /// The source or target changed. Either side may be unset.
    PointsChanged {
        source: Option<CellId>,
        target: Option<CellId>,
    },
    /// A search finished. `hops` is the number of moves on the found path,
    /// or `None` when the target is unreachable.
    PathComputed { hops: Option<usize> },
}

impl Event {
    /// Whether a search can run after this notification.
    pub fn has_both_points(&self) -> bool {
        matches!(
            self,
            Self::PointsChanged {
                source: Some(_),
                target: Some(_),
            }
        )
    }
}
