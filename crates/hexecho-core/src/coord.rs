#![forbid(unsafe_code)]

//! Cell coordinates and grid dimensions.
//!
//! Cells are addressed by `(row, col)` on a row-parity-offset hex grid. Per-cell
//! storage everywhere in hexecho is a flat `Vec` indexed by
//! [`GridDims::index_of`] (`row * cols + col`).
//!
//! # Invariants
//!
//! 1. `rows` is even and at least 4; `cols` is at least 3.
//! 2. `index_of` and `coord_at` are inverse bijections over `0..len()`.

use std::fmt;

/// Smallest supported row count.
pub const MIN_ROWS: u16 = 4;

/// Smallest supported column count.
pub const MIN_COLS: u16 = 3;

/// A cell position on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CellCoord {
    pub row: u16,
    pub col: u16,
}

impl CellCoord {
    #[inline]
    #[must_use]
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }

    /// Whether this cell sits on an odd (half-offset) row.
    #[inline]
    #[must_use]
    pub const fn is_odd_row(self) -> bool {
        self.row % 2 == 1
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl From<(u16, u16)> for CellCoord {
    fn from((row, col): (u16, u16)) -> Self {
        Self::new(row, col)
    }
}

/// Validated grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridDims {
    rows: u16,
    cols: u16,
}

impl GridDims {
    /// Validate and create grid dimensions.
    ///
    /// The offset layout only closes into a torus when the row count is even:
    /// wrapping must pair rows of opposite parity or adjacency stops being
    /// symmetric.
    pub fn new(rows: u16, cols: u16) -> Result<Self, GridError> {
        if rows < MIN_ROWS {
            return Err(GridError::TooFewRows(rows));
        }
        if rows % 2 != 0 {
            return Err(GridError::OddRows(rows));
        }
        if cols < MIN_COLS {
            return Err(GridError::TooFewCols(cols));
        }
        Ok(Self { rows, cols })
    }

    #[inline]
    #[must_use]
    pub const fn rows(self) -> u16 {
        self.rows
    }

    #[inline]
    #[must_use]
    pub const fn cols(self) -> u16 {
        self.cols
    }

    /// Total number of cells.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Always false: validated grids are never empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        false
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, cell: CellCoord) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Dense index of `cell`. The cell must be in range.
    #[inline]
    #[must_use]
    pub fn index_of(self, cell: CellCoord) -> usize {
        debug_assert!(self.contains(cell), "{cell} outside {self}");
        cell.row as usize * self.cols as usize + cell.col as usize
    }

    /// Inverse of [`index_of`](Self::index_of).
    #[inline]
    #[must_use]
    pub fn coord_at(self, index: usize) -> CellCoord {
        debug_assert!(index < self.len());
        let cols = self.cols as usize;
        CellCoord::new((index / cols) as u16, (index % cols) as u16)
    }

    /// Wrap a signed offset from `cell` onto the torus.
    #[inline]
    #[must_use]
    pub fn wrap(self, cell: CellCoord, d_row: i32, d_col: i32) -> CellCoord {
        let rows = i32::from(self.rows);
        let cols = i32::from(self.cols);
        let row = (i32::from(cell.row) + d_row).rem_euclid(rows);
        let col = (i32::from(cell.col) + d_col).rem_euclid(cols);
        CellCoord::new(row as u16, col as u16)
    }

    /// All coordinates in row-major order.
    pub fn iter(self) -> impl Iterator<Item = CellCoord> {
        (0..self.len()).map(move |i| self.coord_at(i))
    }
}

impl Default for GridDims {
    fn default() -> Self {
        Self { rows: 8, cols: 32 }
    }
}

impl fmt::Display for GridDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Rejected grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    TooFewRows(u16),
    OddRows(u16),
    TooFewCols(u16),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewRows(n) => write!(f, "grid needs at least {MIN_ROWS} rows, got {n}"),
            Self::OddRows(n) => write!(f, "grid row count must be even, got {n}"),
            Self::TooFewCols(n) => write!(f, "grid needs at least {MIN_COLS} columns, got {n}"),
        }
    }
}

impl std::error::Error for GridError {}
