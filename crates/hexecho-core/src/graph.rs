#![forbid(unsafe_code)]

//! Adjacency ("dual") graph over hex cells.
//!
//! Every cell has exactly six neighbors computed from a per-parity offset
//! table. Odd rows are shifted half a cell to the right, so their neighbor
//! offsets are the mirror image of the even-row ones. Both axes wrap.
//!
//! The table is built once per grid configuration and never patched: a resize
//! builds a fresh [`HexGraph`].
//!
//! # Invariants
//!
//! 1. `are_neighbors(a, b) == are_neighbors(b, a)`.
//! 2. `neighbors_of(c)` holds six distinct cells, none equal to `c`.

use crate::coord::{CellCoord, GridDims};

/// Neighbor offsets `(d_row, d_col)` for even rows.
pub const EVEN_ROW_OFFSETS: [(i32, i32); 6] = [(-1, -1), (-1, 0), (0, -1), (0, 1), (1, -1), (1, 0)];

/// Neighbor offsets `(d_row, d_col)` for odd (half-offset) rows.
pub const ODD_ROW_OFFSETS: [(i32, i32); 6] = [(-1, 0), (-1, 1), (0, -1), (0, 1), (1, 0), (1, 1)];

/// Offset table for the row parity of `cell`.
#[inline]
#[must_use]
pub fn offsets_for(cell: CellCoord) -> &'static [(i32, i32); 6] {
    if cell.is_odd_row() {
        &ODD_ROW_OFFSETS
    } else {
        &EVEN_ROW_OFFSETS
    }
}

/// Static adjacency table indexed by [`GridDims::index_of`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexGraph {
    dims: GridDims,
    neighbors: Vec<[CellCoord; 6]>,
}

impl HexGraph {
    /// Build the adjacency table for `dims`.
    #[must_use]
    pub fn new(dims: GridDims) -> Self {
        let neighbors = dims
            .iter()
            .map(|cell| {
                let offsets = offsets_for(cell);
                std::array::from_fn(|k| {
                    let (d_row, d_col) = offsets[k];
                    dims.wrap(cell, d_row, d_col)
                })
            })
            .collect();
        Self { dims, neighbors }
    }

    #[inline]
    #[must_use]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// The six neighbors of `cell`, in offset-table order.
    #[inline]
    #[must_use]
    pub fn neighbors_of(&self, cell: CellCoord) -> &[CellCoord; 6] {
        &self.neighbors[self.dims.index_of(cell)]
    }

    /// Whether `a` and `b` share an edge.
    #[inline]
    #[must_use]
    pub fn are_neighbors(&self, a: CellCoord, b: CellCoord) -> bool {
        self.neighbors_of(a).contains(&b)
    }

    /// The ring of six neighbors around `center`, ordered so that each entry is
    /// adjacent to the next (and the last to the first).
    #[must_use]
    pub fn ring_around(&self, center: CellCoord) -> [CellCoord; 6] {
        // Offset-table indices walked clockwise: up-left, up-right, right,
        // down-right, down-left, left.
        const RING_ORDER: [usize; 6] = [0, 1, 3, 5, 4, 2];
        let around = self.neighbors_of(center);
        RING_ORDER.map(|k| around[k])
    }
}
