#![forbid(unsafe_code)]

//! Pixel layout and point-to-cell resolution.
//!
//! Cells are pointy-top hexagons packed in offset rows: odd rows shift right by
//! a quarter of the horizontal pitch times two (half a cell), and rows overlap
//! vertically by a quarter of the diameter. The layout is fitted to a canvas so
//! the whole grid plus padding is visible.
//!
//! # Failure Modes
//!
//! - Points outside every hit circle resolve to `None`.
//! - A degenerate canvas (smaller than the padding) yields a zero diameter; no
//!   point then resolves to a cell.

use std::fmt;

use crate::coord::{CellCoord, GridDims};

use crate::debug;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Default canvas padding in pixels.
pub const DEFAULT_PADDING: f64 = 40.0;

/// A canvas position in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Fraction of the cell radius that counts as a hit, in `(0, 1]`.
///
/// Values below 1 leave a dead zone near cell borders so a drag along an edge
/// does not flicker between two cells.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Sensitivity(f64);

impl Sensitivity {
    pub fn new(value: f64) -> Result<Self, SensitivityError> {
        if value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(SensitivityError(value))
        }
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self(0.8)
    }
}

/// Sensitivity outside `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensitivityError(pub f64);

impl fmt::Display for SensitivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "selection sensitivity must be in (0, 1], got {}", self.0)
    }
}

impl std::error::Error for SensitivityError {}

/// Cell centers and hit testing for one canvas size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexLayout {
    dims: GridDims,
    padding: f64,
    diameter: f64,
}

impl HexLayout {
    /// Fit `dims` into a `width` x `height` canvas with `padding` on each side.
    #[must_use]
    pub fn fit(dims: GridDims, width: f64, height: f64, padding: f64) -> Self {
        let horizontal = (width - 2.0 * padding) / (f64::from(dims.cols()) + 0.5);
        let vertical = (height - 2.0 * padding) / (f64::from(dims.rows()) * 0.75 + 0.25);
        let diameter = (horizontal * 2.0 / SQRT_3).min(vertical).max(0.0);
        debug!(%dims, width, height, diameter, "hex layout fitted");
        Self {
            dims,
            padding,
            diameter,
        }
    }

    #[inline]
    #[must_use]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    #[inline]
    #[must_use]
    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    /// Horizontal distance between neighboring centers in a row.
    #[inline]
    fn col_pitch(&self) -> f64 {
        self.diameter * SQRT_3 / 2.0
    }

    /// Vertical distance between row centers.
    #[inline]
    fn row_pitch(&self) -> f64 {
        self.diameter * 0.75
    }

    /// Pixel center of `cell`.
    #[must_use]
    pub fn center_of(&self, cell: CellCoord) -> Point {
        let shift = if cell.is_odd_row() {
            self.col_pitch() / 2.0
        } else {
            0.0
        };
        Point::new(
            self.padding + f64::from(cell.col) * self.col_pitch() + shift,
            self.padding + f64::from(cell.row) * self.row_pitch(),
        )
    }

    /// The cell whose hit circle (`radius * sensitivity`) contains `point`.
    ///
    /// Only the 3x3 block around the estimated row and column is searched;
    /// the grid does not wrap on screen.
    #[must_use]
    pub fn cell_at(&self, point: Point, sensitivity: Sensitivity) -> Option<CellCoord> {
        if self.diameter <= 0.0 {
            return None;
        }
        let threshold = self.diameter / 2.0 * sensitivity.get();
        let col = ((point.x - self.padding) / self.col_pitch()).floor() as i64;
        let row = ((point.y - self.padding) / self.row_pitch()).floor() as i64;

        let max_row = i64::from(self.dims.rows()) - 1;
        let max_col = i64::from(self.dims.cols()) - 1;
        for r in (row - 1).max(0)..=(row + 1).min(max_row) {
            for c in (col - 1).max(0)..=(col + 1).min(max_col) {
                let cell = CellCoord::new(r as u16, c as u16);
                if self.center_of(cell).distance(point) <= threshold {
                    return Some(cell);
                }
            }
        }
        None
    }
}
