//! The [`Cell`] type — one node of the grid graph.
//!
//! Besides its classification and neighbour set, every cell carries the
//! scratch record ([`SearchData`]) an A* search writes into. Only one search
//! may run over a grid at a time; the scratch is reset at the start of each.

use crate::geom::Point;

/// Index of a cell inside its [`Grid`](crate::Grid).
///
/// Ids are stable for the lifetime of the grid: regeneration reuses cells
/// instead of replacing them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellId(pub usize);

impl CellId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Classification of a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellKind {
    #[default]
    Walkable,
    NonWalkable,
    /// Start point of the search.
    Source,
    /// End point of the search.
    Target,
}

impl CellKind {
    /// Whether this is one of the two point roles.
    #[inline]
    pub const fn is_point_role(self) -> bool {
        matches!(self, Self::Source | Self::Target)
    }

    /// The other point role, if `self` is one.
    #[inline]
    pub const fn opposite(self) -> Option<Self> {
        match self {
            Self::Source => Some(Self::Target),
            Self::Target => Some(Self::Source),
            _ => None,
        }
    }
}

/// Sentinel for "not reached yet" in [`SearchData`].
pub const UNREACHED: i32 = i32::MAX;

/// Per-search scratch: cost so far, estimate, their sum and the predecessor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchData {
    pub g: i32,
    pub h: i32,
    pub f: i32,
    pub parent: Option<CellId>,
}

impl Default for SearchData {
    fn default() -> Self {
        Self {
            g: UNREACHED,
            h: UNREACHED,
            f: UNREACHED,
            parent: None,
        }
    }
}

/// A grid node.
#[derive(Clone, Debug)]
pub struct Cell {
    pos: Point,
    kind: CellKind,
    active: bool,
    neighbours: Vec<CellId>,
    search: SearchData,
}

impl Cell {
    /// Create an active cell at plane position `pos`.
    pub fn new(pos: Point, walkable: bool) -> Self {
        Self {
            pos,
            kind: if walkable {
                CellKind::Walkable
            } else {
                CellKind::NonWalkable
            },
            active: true,
            neighbours: Vec::with_capacity(6),
            search: SearchData::default(),
        }
    }

    /// Plane position; the cell's identity within its grid.
    #[inline]
    pub fn pos(&self) -> Point {
        self.pos
    }

    #[inline]
    pub fn kind(&self) -> CellKind {
        self.kind
    }

    /// Whether the cell is part of the current grid extent.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Set the classification.
    ///
    /// A Source cannot be turned into a Target (or the reverse) directly;
    /// [`clear_point_role`](Self::clear_point_role) must come first. Returns
    /// whether the classification was applied.
    pub fn classify(&mut self, kind: CellKind) -> bool {
        if self.kind.opposite() == Some(kind) {
            return false;
        }
        self.kind = kind;
        true
    }

    /// Mark this cell as the search source. Refused if it is the target.
    ///
    /// Walkability is the grid's concern and is not checked here.
    pub fn set_source(&mut self) -> bool {
        self.classify(CellKind::Source)
    }

    /// Mark this cell as the search target. Refused if it is the source.
    pub fn set_target(&mut self) -> bool {
        self.classify(CellKind::Target)
    }

    /// Drop a Source/Target role, leaving a plain walkable cell.
    pub fn clear_point_role(&mut self) {
        if self.kind.is_point_role() {
            self.kind = CellKind::Walkable;
        }
    }

    /// Record `id` as a neighbour. Adding it twice is a no-op.
    pub fn add_neighbour(&mut self, id: CellId) {
        if !self.neighbours.contains(&id) {
            self.neighbours.push(id);
        }
    }

    /// Every recorded neighbour, including inactive ones.
    #[inline]
    pub fn neighbour_ids(&self) -> &[CellId] {
        &self.neighbours
    }

    pub(crate) fn clear_neighbours(&mut self) {
        self.neighbours.clear();
    }

    /// Not blocked and inside the current grid extent.
    #[inline]
    pub fn is_walkable(&self) -> bool {
        self.kind != CellKind::NonWalkable && self.active
    }

    #[inline]
    pub fn is_point_role(&self) -> bool {
        self.kind.is_point_role()
    }

    #[inline]
    pub fn search(&self) -> &SearchData {
        &self.search
    }

    /// Forget everything a previous search wrote.
    #[inline]
    pub fn reset_search(&mut self) {
        self.search = SearchData::default();
    }

    /// Store a search step; `f` is derived as `g + h`.
    #[inline]
    pub fn set_search(&mut self, g: i32, h: i32, parent: Option<CellId>) {
        self.search = SearchData {
            g,
            h,
            f: g.saturating_add(h),
            parent,
        };
    }

    /// Bring the cell (back) into the grid with a fresh classification.
    pub(crate) fn setup(&mut self, walkable: bool) {
        self.kind = if walkable {
            CellKind::Walkable
        } else {
            CellKind::NonWalkable
        };
        self.active = true;
        self.reset_search();
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }

    pub(crate) fn set_pos(&mut self, pos: Point) {
        self.pos = pos;
    }
}
